use std::fmt;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

use crate::runner::ds::domain::{fraction_primitive, BigNumber, Complex, Fraction, Matrix, Unit};
use crate::runner::ds::function::FunctionRef;
use crate::runner::namespace::Namespace;

pub const TYPE_STR_UNDEFINED: &str = "undefined";
pub const TYPE_STR_NULL: &str = "null";
pub const TYPE_STR_BOOLEAN: &str = "boolean";
pub const TYPE_STR_NUMBER: &str = "number";
pub const TYPE_STR_STRING: &str = "string";
pub const TYPE_STR_BIG_NUMBER: &str = "BigNumber";
pub const TYPE_STR_COMPLEX: &str = "Complex";
pub const TYPE_STR_FRACTION: &str = "Fraction";
pub const TYPE_STR_UNIT: &str = "Unit";
pub const TYPE_STR_MATRIX: &str = "Matrix";
pub const TYPE_STR_ARRAY: &str = "Array";
pub const TYPE_STR_FUNCTION: &str = "function";
pub const TYPE_STR_NAMESPACE: &str = "Namespace";

#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Boolean(bool),
    Number(NumberType),
    String(String),
    BigNumber(BigNumber),
    Complex(Complex),
    Fraction(Fraction),
    Unit(Unit),
    Matrix(Matrix),
    Array(Vec<Value>),
    Function(FunctionRef),
    Scope(Namespace),
}

impl Value {
    pub fn integer(i: i64) -> Self {
        Value::Number(NumberType::Integer(i))
    }

    pub fn float(f: f64) -> Self {
        Value::Number(NumberType::Float(f))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// Type name as used in typed-function signatures.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => TYPE_STR_UNDEFINED,
            Value::Null => TYPE_STR_NULL,
            Value::Boolean(_) => TYPE_STR_BOOLEAN,
            Value::Number(_) => TYPE_STR_NUMBER,
            Value::String(_) => TYPE_STR_STRING,
            Value::BigNumber(_) => TYPE_STR_BIG_NUMBER,
            Value::Complex(_) => TYPE_STR_COMPLEX,
            Value::Fraction(_) => TYPE_STR_FRACTION,
            Value::Unit(_) => TYPE_STR_UNIT,
            Value::Matrix(_) => TYPE_STR_MATRIX,
            Value::Array(_) => TYPE_STR_ARRAY,
            Value::Function(_) => TYPE_STR_FUNCTION,
            Value::Scope(_) => TYPE_STR_NAMESPACE,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Value::Unit(_))
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, Value::Complex(_))
    }

    pub fn is_big_number(&self) -> bool {
        matches!(self, Value::BigNumber(_))
    }

    pub fn is_fraction(&self) -> bool {
        matches!(self, Value::Fraction(_))
    }

    pub fn is_matrix(&self) -> bool {
        matches!(self, Value::Matrix(_))
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// Whether the value may be stored directly in a namespace by an import.
    ///
    /// Scopes are excluded: they are created by path resolution, never imported.
    pub fn is_supported_type(&self) -> bool {
        match self {
            Value::Undefined
            | Value::Null
            | Value::Boolean(_)
            | Value::Number(_)
            | Value::String(_)
            | Value::Array(_)
            | Value::Function(_) => true,
            _ => {
                self.is_unit()
                    || self.is_complex()
                    || self.is_big_number()
                    || self.is_fraction()
                    || self.is_matrix()
            }
        }
    }

    pub fn as_function(&self) -> Option<&FunctionRef> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_scope(&self) -> Option<&Namespace> {
        match self {
            Value::Scope(ns) => Some(ns),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    /// The transform attached to a callable, if any.
    pub fn transform(&self) -> Option<FunctionRef> {
        self.as_function().and_then(|f| f.transform())
    }

    /// Reduces a value to its primitive form, the way a wrapped function sees its arguments.
    pub fn to_primitive(&self) -> Value {
        match self {
            Value::BigNumber(b) => Value::String(b.to_string()),
            Value::Complex(c) => Value::String(c.to_string()),
            Value::Fraction(f) => fraction_primitive(f),
            Value::Unit(u) => Value::String(u.to_string()),
            Value::Matrix(m) => m.to_array(),
            other => other.clone(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "{}", TYPE_STR_UNDEFINED),
            Value::Null => write!(f, "{}", TYPE_STR_NULL),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::BigNumber(b) => write!(f, "{}", b),
            Value::Complex(c) => write!(f, "{}", c),
            Value::Fraction(fr) => write!(f, "{}", fr),
            Value::Unit(u) => write!(f, "{}", u),
            Value::Matrix(m) => write!(f, "{}", m),
            Value::Array(items) => {
                let items: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Value::Function(func) => write!(f, "function {}", func.name()),
            Value::Scope(ns) => write!(f, "Namespace({})", ns.path()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Value::Undefined"),
            Value::Null => write!(f, "Value::Null"),
            Value::Boolean(b) => write!(f, "Value::Boolean({})", b),
            Value::Number(n) => write!(f, "Value::Number({:?})", n),
            Value::String(s) => write!(f, "Value::String({:?})", s),
            Value::BigNumber(b) => write!(f, "Value::BigNumber({})", b),
            Value::Complex(c) => write!(f, "Value::Complex({})", c),
            Value::Fraction(fr) => write!(f, "Value::Fraction({})", fr),
            Value::Unit(u) => write!(f, "Value::Unit({})", u),
            Value::Matrix(m) => write!(f, "Value::Matrix({})", m),
            Value::Array(items) => write!(f, "Value::Array({:?})", items),
            Value::Function(func) => write!(f, "Value::Function({})", func.name()),
            Value::Scope(ns) => write!(f, "Value::Scope({:?})", ns.path()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::BigNumber(a), Value::BigNumber(b)) => a == b,
            (Value::Complex(a), Value::Complex(b)) => a == b,
            (Value::Fraction(a), Value::Fraction(b)) => a == b,
            (Value::Unit(a), Value::Unit(b)) => a == b,
            (Value::Matrix(a), Value::Matrix(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Scope(a), Value::Scope(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::float(f)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::integer(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<FunctionRef> for Value {
    fn from(f: FunctionRef) -> Self {
        Value::Function(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberType {
    Integer(i64),
    Float(f64),
}

impl NumberType {
    pub fn as_f64(&self) -> f64 {
        match self {
            NumberType::Integer(i) => *i as f64,
            NumberType::Float(f) => *f,
        }
    }
}

impl Display for NumberType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            NumberType::Integer(i) => write!(f, "{}", i),
            NumberType::Float(nf) => write!(f, "{}", nf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_types() {
        assert!(Value::Null.is_supported_type());
        assert!(Value::integer(2).is_supported_type());
        assert!(Value::Complex(Complex::new(1.0, 2.0)).is_supported_type());
        assert!(Value::Unit(Unit::new(None, "cm")).is_supported_type());
        assert!(!Value::Scope(Namespace::new()).is_supported_type());
    }

    #[test]
    fn test_primitive_of_matrix_is_nested_array() {
        let m = Matrix::new(vec![
            vec![Value::integer(1), Value::integer(2)],
            vec![Value::integer(3), Value::integer(4)],
        ]);
        assert_eq!(
            Value::Matrix(m).to_primitive(),
            Value::Array(vec![
                Value::Array(vec![Value::integer(1), Value::integer(2)]),
                Value::Array(vec![Value::integer(3), Value::integer(4)]),
            ])
        );
    }

    #[test]
    fn test_primitive_of_fraction_is_number() {
        let half = Fraction::new(2, 4).map(Value::Fraction);
        assert_eq!(half.map(|v| v.to_primitive()), Some(Value::float(0.5)));
        let whole = Fraction::new(-6, -3).map(Value::Fraction);
        assert_eq!(whole.map(|v| v.to_primitive()), Some(Value::integer(2)));
    }

    #[test]
    fn test_primitive_of_big_number_is_string() {
        let big = BigNumber::parse("12345678901234567890.5").map(Value::BigNumber);
        assert_eq!(
            big.map(|v| v.to_primitive()),
            Some(Value::string("12345678901234567890.5"))
        );
        assert!(BigNumber::parse("12a").is_none());
    }
}
