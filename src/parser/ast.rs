use std::fmt;
use std::fmt::{Display, Formatter};

/// Type name that accepts every argument.
pub const ANY_TYPE: &str = "any";

/// One parameter of a signature: a union of accepted type names, optionally variadic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub types: Vec<String>,
    pub rest: bool,
}

impl Param {
    pub fn new(types: Vec<String>, rest: bool) -> Self {
        Param { types, rest }
    }

    pub fn accepts(&self, type_name: &str) -> bool {
        self.types
            .iter()
            .any(|t| t == ANY_TYPE || t == type_name)
    }

    /// How loosely this parameter matches `type_name`: 0 for an exact type,
    /// 1 for a member of a union, 2 for `any`.
    pub fn distance(&self, type_name: &str) -> Option<u8> {
        if self.types.iter().any(|t| t == type_name) {
            Some(if self.types.len() == 1 { 0 } else { 1 })
        } else if self.types.iter().any(|t| t == ANY_TYPE) {
            Some(2)
        } else {
            None
        }
    }
}

impl Display for Param {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.rest {
            write!(f, "...")?;
        }
        write!(f, "{}", self.types.join(" | "))
    }
}

/// Parsed form of a signature string such as `"number, ...number"`.
///
/// The `Display` output is the normalized text used as the key of a signature
/// in a typed function, so `"number,number"` and `"number, number"` collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<Param>,
}

impl Signature {
    pub fn new(params: Vec<Param>) -> Self {
        Signature { params }
    }

    pub fn is_variadic(&self) -> bool {
        self.params.last().map(|p| p.rest).unwrap_or(false)
    }

    /// Checks whether arguments with the given type names can be passed to this signature.
    pub fn accepts(&self, arg_types: &[&str]) -> bool {
        let mut idx = 0;
        for param in &self.params {
            if param.rest {
                let remaining = &arg_types[idx.min(arg_types.len())..];
                return !remaining.is_empty() && remaining.iter().all(|t| param.accepts(t));
            }
            match arg_types.get(idx) {
                Some(t) if param.accepts(t) => idx += 1,
                _ => return false,
            }
        }
        idx == arg_types.len()
    }

    /// Per-argument match distances, or `None` if the arguments are not accepted.
    ///
    /// Lower is more specific. Comparing the keys of two accepting signatures
    /// picks the one with the tighter parameter at the first position where
    /// they differ, and a fixed signature over a variadic one on a tie.
    pub fn specificity(&self, arg_types: &[&str]) -> Option<(Vec<u8>, bool)> {
        if !self.accepts(arg_types) {
            return None;
        }
        let mut distances = Vec::with_capacity(arg_types.len());
        let mut params = self.params.iter();
        let mut current = params.next();
        for t in arg_types {
            let param = current?;
            distances.push(param.distance(t)?);
            if !param.rest {
                current = params.next();
            }
        }
        Some((distances, self.is_variadic()))
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", params.join(", "))
    }
}
