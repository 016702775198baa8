//! Callable values stored in a namespace.

use std::fmt;
use std::rc::Rc;

use crate::runner::ds::error::{Error, Result};
use crate::runner::ds::value::Value;
use crate::runner::typed::TypedFunction;

/// Function signature for compiled-in implementations.
/// Native functions receive the receiver (`this`) and the arguments.
pub type NativeFn = fn(this: &Value, args: Vec<Value>) -> Result<Value>;

/// Function signature for implementations that capture state.
pub type ClosureFn = Rc<dyn Fn(&Value, Vec<Value>) -> Result<Value>>;

pub type FunctionRef = Rc<Function>;

pub enum FunctionBody {
    /// Direct function pointer.
    Native(NativeFn),

    /// Boxed closure, used by wrappers and extensions that capture state.
    Closure(ClosureFn),

    /// Dispatches among several signatures by argument types.
    Typed(TypedFunction),
}

pub struct Function {
    name: String,
    body: FunctionBody,
    /// Single declared signature; lifted into a typed function when imported.
    signature: Option<String>,
    /// Alternate implementation used inside the expression evaluator.
    transform: Option<FunctionRef>,
}

impl Function {
    pub fn native(name: impl Into<String>, f: NativeFn) -> Self {
        Function::from_body(name, FunctionBody::Native(f))
    }

    pub fn closure<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value, Vec<Value>) -> Result<Value> + 'static,
    {
        Function::from_body(name, FunctionBody::Closure(Rc::new(f)))
    }

    pub fn typed(typed: TypedFunction) -> Self {
        Function::from_body(typed.name().to_string(), FunctionBody::Typed(typed))
    }

    fn from_body(name: impl Into<String>, body: FunctionBody) -> Self {
        Function {
            name: name.into(),
            body,
            signature: None,
            transform: None,
        }
    }

    /// Declare the single signature this function implements.
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    /// Attach a transform.
    pub fn with_transform(mut self, transform: Function) -> Self {
        self.transform = Some(Rc::new(transform));
        self
    }

    pub fn with_transform_ref(mut self, transform: FunctionRef) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn transform(&self) -> Option<FunctionRef> {
        self.transform.clone()
    }

    pub fn body(&self) -> &FunctionBody {
        &self.body
    }

    pub fn as_typed(&self) -> Option<&TypedFunction> {
        match &self.body {
            FunctionBody::Typed(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_typed(&self) -> bool {
        self.as_typed().is_some()
    }

    /// Execute this function.
    pub fn call(&self, this: &Value, args: Vec<Value>) -> Result<Value> {
        match &self.body {
            FunctionBody::Native(f) => f(this, args),
            FunctionBody::Closure(f) => f(this, args),
            FunctionBody::Typed(t) => t.dispatch(this, args),
        }
    }

    pub fn into_ref(self) -> FunctionRef {
        Rc::new(self)
    }

    pub fn into_value(self) -> Value {
        Value::Function(Rc::new(self))
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.body {
            FunctionBody::Native(_) => "native",
            FunctionBody::Closure(_) => "closure",
            FunctionBody::Typed(_) => "typed",
        };
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("kind", &kind)
            .field("signature", &self.signature)
            .field("has_transform", &self.transform.is_some())
            .finish()
    }
}

/// Calls `value` if it is a function, otherwise reports it as not callable.
pub fn call_value(name: &str, value: &Value, this: &Value, args: Vec<Value>) -> Result<Value> {
    match value {
        Value::Function(f) => f.call(this, args),
        _ => Err(Error::NotCallable(name.to_string())),
    }
}
