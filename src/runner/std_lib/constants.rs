//! Mathematical constants.

use std::f64::consts;

use crate::runner::ds::domain::Complex;
use crate::runner::ds::value::Value;
use crate::runner::import::Factory;

pub fn factories() -> Vec<Factory> {
    vec![
        Factory::new("pi", &[], |_| Ok(Value::float(consts::PI))),
        Factory::new("e", &[], |_| Ok(Value::float(consts::E))),
        Factory::new("tau", &["pi"], |deps| Ok(Value::float(2.0 * deps.number("pi")?))),
        Factory::new("i", &[], |_| Ok(Value::Complex(Complex::new(0.0, 1.0)))),
    ]
}
