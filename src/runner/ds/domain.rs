//! Numeric and structured domain values.
//!
//! These types are owned by other parts of the engine; the import layer only
//! needs to recognize them and, for wrapped functions, reduce them to a
//! primitive value.

use std::fmt;
use std::fmt::{Display, Formatter};

use crate::runner::ds::value::{NumberType, Value};

/// Arbitrary-precision decimal, kept in its textual form.
#[derive(Debug, Clone, PartialEq)]
pub struct BigNumber {
    digits: String,
}

impl BigNumber {
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        let unsigned = trimmed.strip_prefix('-').unwrap_or(trimmed);
        let mut seen_dot = false;
        let valid = !unsigned.is_empty()
            && unsigned.chars().all(|c| {
                if c == '.' && !seen_dot {
                    seen_dot = true;
                    true
                } else {
                    c.is_ascii_digit()
                }
            });
        if valid {
            Some(BigNumber {
                digits: trimmed.to_string(),
            })
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.digits
    }
}

impl Display for BigNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.digits)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Complex { re, im }
    }
}

impl Display for Complex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.im < 0.0 {
            write!(f, "{} - {}i", self.re, -self.im)
        } else {
            write!(f, "{} + {}i", self.re, self.im)
        }
    }
}

/// Rational number, always stored reduced with a positive denominator.
#[derive(Debug, Clone, PartialEq)]
pub struct Fraction {
    numerator: i64,
    denominator: i64,
}

impl Fraction {
    /// `None` for a zero denominator or when the reduced form does not fit in `i64`.
    pub fn new(numerator: i64, denominator: i64) -> Option<Self> {
        if denominator == 0 {
            return None;
        }
        let divisor = gcd(numerator.unsigned_abs(), denominator.unsigned_abs()).max(1);
        let sign: i128 = if denominator < 0 { -1 } else { 1 };
        let reduce = |n: i64| i64::try_from(sign * i128::from(n) / i128::from(divisor)).ok();
        Some(Fraction {
            numerator: reduce(numerator)?,
            denominator: reduce(denominator)?,
        })
    }

    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    pub fn to_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

impl Display for Fraction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Physical quantity. A unit without a value (e.g. plain `cm`) is "valueless".
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub value: Option<f64>,
    pub name: String,
}

impl Unit {
    pub fn new(value: Option<f64>, name: impl Into<String>) -> Self {
        Unit {
            value,
            name: name.into(),
        }
    }

    pub fn is_valueless(&self) -> bool {
        self.value.is_none()
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(v) => write!(f, "{} {}", v, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Dense row-major matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: Vec<Vec<Value>>,
}

impl Matrix {
    pub fn new(rows: Vec<Vec<Value>>) -> Self {
        Matrix { rows }
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn size(&self) -> (usize, usize) {
        (
            self.rows.len(),
            self.rows.first().map(|r| r.len()).unwrap_or(0),
        )
    }

    /// Nested arrays holding the primitive form of every element.
    pub fn to_array(&self) -> Value {
        Value::Array(
            self.rows
                .iter()
                .map(|row| Value::Array(row.iter().map(Value::to_primitive).collect()))
                .collect(),
        )
    }
}

impl Display for Matrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let rows: Vec<String> = self
            .rows
            .iter()
            .map(|row| {
                let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
                format!("[{}]", cells.join(", "))
            })
            .collect();
        write!(f, "[{}]", rows.join(", "))
    }
}

pub(crate) fn fraction_primitive(fraction: &Fraction) -> Value {
    if fraction.denominator() == 1 {
        Value::Number(NumberType::Integer(fraction.numerator()))
    } else {
        Value::Number(NumberType::Float(fraction.to_f64()))
    }
}
