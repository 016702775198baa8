//! Typed arithmetic functions.

use crate::runner::ds::error::{Error, Result};
use crate::runner::ds::function::{Function, NativeFn};
use crate::runner::ds::value::{NumberType, Value};
use crate::runner::import::Factory;
use crate::runner::typed::tag_signature;

const NUMBER_PAIR: &str = "number, number";

pub fn factories() -> Vec<Factory> {
    vec![
        binary("add", add_numbers),
        binary("subtract", subtract_numbers),
        binary("multiply", multiply_numbers),
        Factory::new("sum", &[], |_| {
            let f = Function::native("sum", sum_numbers).into_ref();
            Ok(Value::Function(tag_signature("sum", vec![("...number", f)])?))
        }),
    ]
}

fn binary(name: &'static str, f: NativeFn) -> Factory {
    Factory::new(name, &[], move |_| {
        let implementation = Function::native(name, f).into_ref();
        Ok(Value::Function(tag_signature(name, vec![(NUMBER_PAIR, implementation)])?))
    })
}

fn number_pair(args: &[Value]) -> Result<(NumberType, NumberType)> {
    match args {
        [Value::Number(a), Value::Number(b)] => Ok((*a, *b)),
        _ => Err(Error::Type("expected two numbers".to_string())),
    }
}

fn combine(
    args: Vec<Value>,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value> {
    let result = match number_pair(&args)? {
        (NumberType::Integer(a), NumberType::Integer(b)) => match int_op(a, b) {
            Some(n) => NumberType::Integer(n),
            None => NumberType::Float(float_op(a as f64, b as f64)),
        },
        (a, b) => NumberType::Float(float_op(a.as_f64(), b.as_f64())),
    };
    Ok(Value::Number(result))
}

fn add_numbers(_this: &Value, args: Vec<Value>) -> Result<Value> {
    combine(args, i64::checked_add, |a, b| a + b)
}

fn subtract_numbers(_this: &Value, args: Vec<Value>) -> Result<Value> {
    combine(args, i64::checked_sub, |a, b| a - b)
}

fn multiply_numbers(_this: &Value, args: Vec<Value>) -> Result<Value> {
    combine(args, i64::checked_mul, |a, b| a * b)
}

fn sum_numbers(this: &Value, args: Vec<Value>) -> Result<Value> {
    let mut args = args.into_iter();
    let mut total = args.next().unwrap_or(Value::integer(0));
    for arg in args {
        total = add_numbers(this, vec![total, arg])?;
    }
    Ok(total)
}
