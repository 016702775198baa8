//! Tests for importing values, collections and typed functions.

extern crate mathns;

use std::cell::RefCell;
use std::rc::Rc;

use mathns::runner::ds::domain::{BigNumber, Complex, Fraction, Matrix, Unit};
use mathns::runner::ds::error::{Error, Result};
use mathns::runner::ds::function::Function;
use mathns::runner::ds::value::Value;
use mathns::runner::import::{Host, HostConfig, ImportArgument, ImportOptions, ImportUnit};
use mathns::runner::namespace::Namespace;

fn object(entries: Vec<(&str, Value)>) -> ImportUnit {
    ImportUnit::object(entries)
}

fn number(value: &Value) -> f64 {
    value.as_f64().expect("expected a number")
}

fn add2() -> Value {
    Function::closure("add2", |_this, args| {
        Ok(Value::float(args.iter().map(number).sum()))
    })
    .into_value()
}

fn number_identity(_this: &Value, args: Vec<Value>) -> Result<Value> {
    Ok(args.into_iter().next().unwrap_or(Value::Undefined))
}

fn string_length(_this: &Value, args: Vec<Value>) -> Result<Value> {
    match args.first() {
        Some(Value::String(s)) => Ok(Value::integer(s.len() as i64)),
        _ => Ok(Value::Undefined),
    }
}

fn typed(name: &str, signature: &str, f: fn(&Value, Vec<Value>) -> Result<Value>) -> Value {
    Function::native(name, f).with_signature(signature).into_value()
}

// ============================================================================
// Plain values
// ============================================================================

mod value_tests {
    use super::*;

    #[test]
    fn test_import_object_of_values() {
        let host = Host::new();
        host.import(
            object(vec![("myvalue", Value::integer(42)), ("hello", Value::string("hi"))]),
            None,
        )
        .unwrap();
        assert_eq!(host.get("myvalue").unwrap(), Some(Value::integer(42)));
        assert_eq!(host.get("hello").unwrap(), Some(Value::string("hi")));
        assert!(host.expression_scope().contains("myvalue"));
    }

    #[test]
    fn test_import_sequence_of_objects() {
        let host = Host::new();
        host.import(
            ImportUnit::sequence(vec![
                object(vec![("two", Value::integer(2))]),
                object(vec![("three", Value::integer(3))]),
            ]),
            None,
        )
        .unwrap();
        assert_eq!(host.get("two").unwrap(), Some(Value::integer(2)));
        assert_eq!(host.get("three").unwrap(), Some(Value::integer(3)));
    }

    #[test]
    fn test_nested_objects_are_flattened() {
        let host = Host::new();
        host.import(
            ImportUnit::object(vec![(
                "group",
                ImportUnit::object(vec![("inner", Value::Boolean(true))]),
            )]),
            None,
        )
        .unwrap();
        assert_eq!(host.get("inner").unwrap(), Some(Value::Boolean(true)));
        assert!(!host.namespace().contains("group"));
    }

    #[test]
    fn test_domain_values_are_supported() {
        let host = Host::new();
        let matrix = Matrix::new(vec![vec![Value::integer(1), Value::integer(2)]]);
        host.import(
            object(vec![
                ("big", Value::BigNumber(BigNumber::parse("123456789012345678901234567890.5").unwrap())),
                ("z", Value::Complex(Complex::new(1.0, -1.0))),
                ("half", Value::Fraction(Fraction::new(2, 4).unwrap())),
                ("meter", Value::Unit(Unit::new(Some(1.0), "m"))),
                ("m", Value::Matrix(matrix)),
                ("list", Value::Array(vec![Value::Null])),
                ("nothing", Value::Null),
            ]),
            None,
        )
        .unwrap();
        assert_eq!(host.namespace().len(), 8);
        assert!(host.get("z").unwrap().unwrap().is_complex());
        assert!(host.get("half").unwrap().unwrap().is_fraction());
    }

    #[test]
    fn test_bare_value_is_unsupported() {
        let host = Host::new();
        assert_eq!(
            host.import(Value::integer(1), None),
            Err(Error::UnsupportedType("number".to_string()))
        );
    }

    #[test]
    fn test_scope_value_is_unsupported() {
        let host = Host::new();
        let result = host.import(object(vec![("ns", Value::Scope(Namespace::new()))]), None);
        assert!(matches!(result, Err(Error::UnsupportedType(_))));
        assert!(!host.namespace().contains("ns"));
    }

    #[test]
    fn test_unsupported_value_dropped_when_silent() {
        let host = Host::new();
        host.import(
            ImportUnit::sequence(vec![
                ImportUnit::from(Value::integer(1)),
                object(vec![("kept", Value::integer(2))]),
            ]),
            Some(ImportOptions::new().silent()),
        )
        .unwrap();
        assert_eq!(host.get("kept").unwrap(), Some(Value::integer(2)));
    }
}

// ============================================================================
// Duplicates, override and silent mode
// ============================================================================

mod conflict_tests {
    use super::*;

    fn add3() -> Value {
        Function::closure("add3", |_this, args| {
            if args.len() != 3 {
                return Err(Error::Type("add3 takes three arguments".to_string()));
            }
            Ok(Value::float(args.iter().map(number).sum()))
        })
        .into_value()
    }

    #[test]
    fn test_duplicate_name_keeps_first() {
        let host = Host::new();
        host.import(object(vec![("add2", add2())]), None).unwrap();
        assert_eq!(
            host.import(object(vec![("add2", add3())]), None),
            Err(Error::DuplicateName("add2".to_string()))
        );
        let result = host
            .call("add2", vec![Value::integer(2), Value::integer(3)])
            .unwrap();
        assert_eq!(result, Value::float(5.0));
    }

    #[test]
    fn test_override_replaces() {
        let host = Host::new();
        host.import(object(vec![("add2", add2())]), None).unwrap();
        let replacement = add3();
        host.import(
            object(vec![("add2", replacement.clone())]),
            Some(ImportOptions::new().overriding()),
        )
        .unwrap();
        assert_eq!(host.get("add2").unwrap(), Some(replacement));
        let result = host
            .call(
                "add2",
                vec![Value::integer(2), Value::integer(3), Value::integer(4)],
            )
            .unwrap();
        assert_eq!(result, Value::float(9.0));
        assert!(host
            .call("add2", vec![Value::integer(2), Value::integer(3)])
            .is_err());
    }

    #[test]
    fn test_silent_skips_conflict_and_continues() {
        let host = Host::new();
        host.import(object(vec![("a", Value::integer(1))]), None).unwrap();
        host.import(
            object(vec![("a", Value::integer(10)), ("b", Value::integer(20))]),
            Some(ImportOptions::new().silent()),
        )
        .unwrap();
        assert_eq!(host.get("a").unwrap(), Some(Value::integer(1)));
        assert_eq!(host.get("b").unwrap(), Some(Value::integer(20)));
    }

    #[test]
    fn test_error_stops_batch_but_keeps_earlier_entries() {
        let host = Host::new();
        host.import(object(vec![("b", Value::integer(1))]), None).unwrap();
        let result = host.import(
            object(vec![
                ("a", Value::integer(1)),
                ("b", Value::integer(2)),
                ("c", Value::integer(3)),
            ]),
            None,
        );
        assert_eq!(result, Err(Error::DuplicateName("b".to_string())));
        assert!(host.namespace().contains("a"));
        assert!(!host.namespace().contains("c"));
    }

    #[test]
    fn test_same_name_twice_in_one_batch() {
        let host = Host::new();
        let result = host.import(
            ImportUnit::sequence(vec![
                object(vec![("x", Value::integer(1))]),
                object(vec![("x", Value::integer(2))]),
            ]),
            None,
        );
        assert_eq!(result, Err(Error::ImportedTwice("x".to_string())));
        assert!(!host.namespace().contains("x"));
    }

    #[test]
    fn test_identical_entry_twice_in_one_batch() {
        let host = Host::new();
        host.import(
            ImportUnit::sequence(vec![
                object(vec![("x", Value::integer(1))]),
                object(vec![("x", Value::integer(1))]),
            ]),
            None,
        )
        .unwrap();
        assert_eq!(host.get("x").unwrap(), Some(Value::integer(1)));
    }

    #[test]
    fn test_undefined_entry_counts_as_free() {
        let host = Host::new();
        host.import(object(vec![("u", Value::Undefined)]), None).unwrap();
        host.import(object(vec![("u", Value::integer(7))]), None).unwrap();
        assert_eq!(host.get("u").unwrap(), Some(Value::integer(7)));
    }

    #[test]
    fn test_valueless_unit_needs_override() {
        let host = Host::with_config(HostConfig::new().with_valueless_units(&["cm"]));
        assert_eq!(
            host.import(object(vec![("cm", Value::float(0.01))]), None),
            Err(Error::DuplicateName("cm".to_string()))
        );
        host.import(
            object(vec![("cm", Value::float(0.01))]),
            Some(ImportOptions::new().overriding()),
        )
        .unwrap();
        assert_eq!(host.get("cm").unwrap(), Some(Value::float(0.01)));
    }

    #[test]
    fn test_config_defaults_apply_without_options() {
        let config = HostConfig::parse("[import]\nsilent = true\n").unwrap();
        let host = Host::with_config(config);
        host.import(object(vec![("a", Value::integer(1))]), None).unwrap();
        host.import(object(vec![("a", Value::integer(2))]), None).unwrap();
        assert_eq!(host.get("a").unwrap(), Some(Value::integer(1)));
    }
}

// ============================================================================
// Typed functions
// ============================================================================

mod typed_tests {
    use super::*;

    #[test]
    fn test_single_signature_is_lifted() {
        let host = Host::new();
        host.import(
            object(vec![("f", typed("f", "number", number_identity))]),
            None,
        )
        .unwrap();
        let f = host.get("f").unwrap().unwrap();
        let f = f.as_function().unwrap();
        assert!(f.is_typed());
        assert_eq!(f.name(), "f");
    }

    #[test]
    fn test_merge_keeps_both_signatures() {
        let host = Host::new();
        host.import(
            object(vec![("f", typed("f", "number", number_identity))]),
            None,
        )
        .unwrap();
        host.import(
            object(vec![("f", typed("f", "string", string_length))]),
            None,
        )
        .unwrap();

        let f = host.get("f").unwrap().unwrap();
        let signatures: Vec<String> = f
            .as_function()
            .unwrap()
            .as_typed()
            .unwrap()
            .signatures()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(signatures, vec!["number".to_string(), "string".to_string()]);
        assert_eq!(
            host.call("f", vec![Value::integer(4)]).unwrap(),
            Value::integer(4)
        );
        assert_eq!(
            host.call("f", vec![Value::string("abc")]).unwrap(),
            Value::integer(3)
        );
    }

    #[test]
    fn test_merged_specific_signature_is_reachable() {
        fn general(_this: &Value, _args: Vec<Value>) -> Result<Value> {
            Ok(Value::string("any"))
        }
        let host = Host::new();
        host.import(object(vec![("f", typed("f", "any", general))]), None)
            .unwrap();
        host.import(
            object(vec![("f", typed("f", "number", number_identity))]),
            None,
        )
        .unwrap();
        assert_eq!(
            host.call("f", vec![Value::integer(1)]).unwrap(),
            Value::integer(1)
        );
        assert_eq!(
            host.call("f", vec![Value::Boolean(true)]).unwrap(),
            Value::string("any")
        );
    }

    #[test]
    fn test_override_drops_old_signatures() {
        let host = Host::new();
        host.import(
            object(vec![("f", typed("f", "number", number_identity))]),
            None,
        )
        .unwrap();
        host.import(
            object(vec![("f", typed("g", "string", string_length))]),
            Some(ImportOptions::new().overriding()),
        )
        .unwrap();

        let f = host.get("f").unwrap().unwrap();
        let f = f.as_function().unwrap();
        assert_eq!(f.name(), "f");
        assert_eq!(f.as_typed().unwrap().len(), 1);
        assert!(matches!(
            host.call("f", vec![Value::integer(4)]),
            Err(Error::NoMatchingSignature { .. })
        ));
    }

    #[test]
    fn test_invalid_signature_is_rejected() {
        let host = Host::new();
        let result = host.import(
            object(vec![("f", typed("f", "...number, string", number_identity))]),
            None,
        );
        assert!(matches!(result, Err(Error::InvalidSignature { .. })));
    }
}

// ============================================================================
// Expression scope and transforms
// ============================================================================

mod expression_tests {
    use super::*;

    #[test]
    fn test_unsafe_names_are_hidden() {
        let host = Host::new();
        host.import(
            object(vec![
                ("chain", add2()),
                ("json", Value::string("{}")),
                ("docs", Value::Null),
                ("safe", Value::integer(1)),
            ]),
            None,
        )
        .unwrap();
        let scope = host.expression_scope();
        assert!(host.namespace().contains("chain"));
        assert!(!scope.contains("chain"));
        assert!(!scope.contains("json"));
        assert!(!scope.contains("docs"));
        assert!(scope.contains("safe"));
        assert!(!scope.contains("expression"));
    }

    #[test]
    fn test_transform_is_exposed_instead_of_value() {
        let host = Host::new();
        let transform = Function::native("map", number_identity);
        let map = Function::closure("map", |_this, _args| Ok(Value::string("raw")))
            .with_transform(transform)
            .into_value();
        host.import(object(vec![("map", map.clone())]), None).unwrap();

        assert_eq!(host.get("map").unwrap(), Some(map.clone()));
        let exposed = host.expression_scope().get("map").unwrap().unwrap();
        assert_ne!(exposed, map);
        assert_eq!(Some(exposed), host.transforms().get("map").unwrap());
    }

    #[test]
    fn test_stale_transform_is_removed() {
        let host = Host::new();
        let map = Function::closure("map", |_this, _args| Ok(Value::Null))
            .with_transform(Function::native("map", number_identity))
            .into_value();
        host.import(object(vec![("map", map)]), None).unwrap();
        assert!(host.transforms().contains("map"));

        host.import(
            object(vec![("map", Value::integer(3))]),
            Some(ImportOptions::new().overriding()),
        )
        .unwrap();
        assert!(!host.transforms().contains("map"));
        assert_eq!(
            host.expression_scope().get("map").unwrap(),
            Some(Value::integer(3))
        );
    }
}

// ============================================================================
// Wrapping
// ============================================================================

mod wrap_tests {
    use super::*;

    #[test]
    fn test_wrapped_function_sees_primitives() {
        let host = Host::new();
        let echo = Function::closure("echo", |this, args| {
            assert!(this.as_scope().is_some());
            Ok(Value::Array(args))
        })
        .into_value();
        host.import(
            object(vec![("echo", echo)]),
            Some(ImportOptions::new().wrapped()),
        )
        .unwrap();

        let result = host
            .call(
                "echo",
                vec![
                    Value::Fraction(Fraction::new(1, 2).unwrap()),
                    Value::Complex(Complex::new(2.0, 3.0)),
                    Value::integer(1),
                ],
            )
            .unwrap();
        assert_eq!(
            result,
            Value::Array(vec![
                Value::float(0.5),
                Value::string(Complex::new(2.0, 3.0).to_string()),
                Value::integer(1),
            ])
        );
    }

    #[test]
    fn test_wrapped_function_keeps_transform() {
        let host = Host::new();
        let f = Function::native("f", number_identity)
            .with_transform(Function::native("f", string_length))
            .into_value();
        host.import(object(vec![("f", f)]), Some(ImportOptions::new().wrapped()))
            .unwrap();
        assert!(host.transforms().contains("f"));
    }
}

// ============================================================================
// Events
// ============================================================================

mod event_tests {
    use super::*;

    #[test]
    fn test_listener_sees_each_entry_in_order() {
        let host = Host::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        host.on_import(move |event| {
            let value = event.resolve().unwrap();
            log.borrow_mut().push((event.name.clone(), value));
        });
        host.import(
            object(vec![("a", Value::integer(1)), ("b", Value::integer(2))]),
            None,
        )
        .unwrap();
        assert_eq!(
            *seen.borrow(),
            vec![
                ("a".to_string(), Value::integer(1)),
                ("b".to_string(), Value::integer(2)),
            ]
        );
    }

    #[test]
    fn test_no_event_for_rejected_entry() {
        let host = Host::new();
        host.import(object(vec![("a", Value::integer(1))]), None).unwrap();
        let count = Rc::new(RefCell::new(0));
        let counter = count.clone();
        host.on_import(move |_| *counter.borrow_mut() += 1);
        host.import(
            object(vec![("a", Value::integer(2))]),
            Some(ImportOptions::new().silent()),
        )
        .unwrap();
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_removed_listener_is_not_called() {
        let host = Host::new();
        let count = Rc::new(RefCell::new(0));
        let counter = count.clone();
        let id = host.on_import(move |_| *counter.borrow_mut() += 1);
        assert_eq!(host.listener_count(), 1);
        assert!(host.off_import(id));
        assert!(!host.off_import(id));
        host.import(object(vec![("a", Value::integer(1))]), None).unwrap();
        assert_eq!(*count.borrow(), 0);
    }
}

// ============================================================================
// Dynamic arguments
// ============================================================================

mod argument_tests {
    use super::*;

    #[test]
    fn test_import_args_arity() {
        let host = Host::new();
        assert_eq!(
            host.import_args(vec![]),
            Err(Error::Arity {
                function: "import".to_string(),
                count: 0,
                min: 1,
                max: 2
            })
        );
        let unit = ImportArgument::Unit(object(vec![("a", Value::integer(1))]));
        let options = ImportArgument::Options(ImportOptions::new());
        assert!(matches!(
            host.import_args(vec![unit.clone(), options.clone(), options]),
            Err(Error::Arity { count: 3, .. })
        ));
    }

    #[test]
    fn test_import_args_with_options() {
        let host = Host::new();
        host.import_args(vec![ImportArgument::Unit(object(vec![("a", Value::integer(1))]))])
            .unwrap();
        host.import_args(vec![
            ImportArgument::Unit(object(vec![("a", Value::integer(2))])),
            ImportArgument::Options(ImportOptions::new().overriding()),
        ])
        .unwrap();
        assert_eq!(host.get("a").unwrap(), Some(Value::integer(2)));
    }

    #[test]
    fn test_import_args_wrong_order() {
        let host = Host::new();
        let result = host.import_args(vec![
            ImportArgument::Options(ImportOptions::new()),
            ImportArgument::Unit(object(vec![("a", Value::integer(1))])),
        ]);
        assert!(matches!(result, Err(Error::Type(_))));
    }
}
