use indexmap::IndexMap;

use crate::parser::ast::Signature;
use crate::parser::SignatureParser;
use crate::runner::ds::error::{Error, Result};
use crate::runner::ds::function::FunctionRef;
use crate::runner::ds::value::Value;

/// One signature of a typed function and the callable that implements it.
#[derive(Clone)]
pub struct Implementation {
    signature: Signature,
    function: FunctionRef,
}

impl Implementation {
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn function(&self) -> &FunctionRef {
        &self.function
    }
}

/// A function that dispatches among named signatures by argument types.
///
/// Signatures are keyed by their normalized text. Adding a signature that is
/// already present replaces its implementation in place.
#[derive(Clone)]
pub struct TypedFunction {
    name: String,
    implementations: IndexMap<String, Implementation>,
}

impl TypedFunction {
    pub fn new(name: impl Into<String>) -> Self {
        TypedFunction {
            name: name.into(),
            implementations: IndexMap::new(),
        }
    }

    /// Add an implementation for the given signature string.
    pub fn with_signature(mut self, signature: &str, function: FunctionRef) -> Result<Self> {
        self.add_signature(signature, function)?;
        Ok(self)
    }

    pub fn add_signature(&mut self, signature: &str, function: FunctionRef) -> Result<()> {
        let parsed = parse_signature(signature)?;
        self.implementations.insert(
            parsed.to_string(),
            Implementation {
                signature: parsed,
                function,
            },
        );
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized signature strings in declaration order.
    pub fn signatures(&self) -> impl Iterator<Item = &str> {
        self.implementations.keys().map(|k| k.as_str())
    }

    pub fn has_signature(&self, signature: &str) -> bool {
        parse_signature(signature)
            .map(|s| self.implementations.contains_key(&s.to_string()))
            .unwrap_or(false)
    }

    pub fn implementation(&self, signature: &str) -> Option<&Implementation> {
        parse_signature(signature)
            .ok()
            .and_then(|s| self.implementations.get(&s.to_string()))
    }

    pub fn len(&self) -> usize {
        self.implementations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.implementations.is_empty()
    }

    /// Same signatures under another name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        TypedFunction {
            name: name.into(),
            implementations: self.implementations.clone(),
        }
    }

    /// Union of both signature sets; `other` wins where a signature exists in both.
    pub fn merged(&self, other: &TypedFunction) -> Self {
        let name = if self.name.is_empty() {
            other.name.clone()
        } else {
            self.name.clone()
        };
        let mut implementations = self.implementations.clone();
        for (key, implementation) in &other.implementations {
            implementations.insert(key.clone(), implementation.clone());
        }
        TypedFunction {
            name,
            implementations,
        }
    }

    /// Call the most specific implementation whose signature accepts the argument types.
    ///
    /// Exact types beat unions, unions beat `any` and fixed parameters beat
    /// rest parameters. Equally specific signatures resolve in declaration order.
    pub fn dispatch(&self, this: &Value, args: Vec<Value>) -> Result<Value> {
        let arg_types: Vec<&str> = args.iter().map(|a| a.type_name()).collect();
        let best = self
            .implementations
            .values()
            .filter_map(|i| i.signature.specificity(&arg_types).map(|key| (key, i)))
            .min_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, i)| i);
        match best {
            Some(implementation) => implementation.function.call(this, args),
            None => Err(Error::NoMatchingSignature {
                function: self.name.clone(),
                arguments: arg_types.join(", "),
            }),
        }
    }
}

fn parse_signature(signature: &str) -> Result<Signature> {
    SignatureParser::parse_signature(signature).map_err(|e| Error::InvalidSignature {
        signature: signature.to_string(),
        reason: e.to_string(),
    })
}
