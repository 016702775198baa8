use thiserror::Error;

/// Errors raised while importing into, resolving from, or calling through a namespace.
///
/// The type is `Clone` because a lazily bound entry that fails to resolve keeps
/// its error and reports it again on every later read.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("wrong number of arguments in function {function} ({count} provided, {min}-{max} expected)")]
    Arity {
        function: String,
        count: usize,
        min: usize,
        max: usize,
    },

    #[error("cannot import \"{0}\": already exists")]
    DuplicateName(String),

    #[error("cannot import \"{0}\" twice")]
    ImportedTwice(String),

    #[error("factory, object, or array expected, got {0}")]
    UnsupportedType(String),

    #[error("transforms cannot be attached to factory functions (\"{0}\"); create a separate function for it with path \"expression.transform\"")]
    IllegalTransformAttachment(String),

    #[error("cyclic resolution of \"{0}\"")]
    CyclicResolution(String),

    #[error("factory name should not contain a nested path: \"{0}\"")]
    NestedFactoryName(String),

    #[error("factory name cannot be empty")]
    EmptyFactoryName,

    #[error("dependency \"{dependency}\" of factory \"{factory}\" should not contain a nested path")]
    InvalidDependency { factory: String, dependency: String },

    #[error("factory \"{factory}\" requires \"{dependency}\" which is not defined")]
    MissingDependency { factory: String, dependency: String },

    #[error("cannot open scope \"{path}\": \"{segment}\" is bound to a value")]
    PathConflict { path: String, segment: String },

    #[error("namespace for \"{0}\" no longer exists")]
    Detached(String),

    #[error("invalid signature \"{signature}\": {reason}")]
    InvalidSignature { signature: String, reason: String },

    #[error("no signature of \"{function}\" accepts ({arguments})")]
    NoMatchingSignature { function: String, arguments: String },

    #[error("{0} is not a function")]
    NotCallable(String),

    #[error("{0} is not defined")]
    NotDefined(String),

    #[error("type error: {0}")]
    Type(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Conditions that `silent` imports swallow instead of reporting.
    pub fn is_silenceable(&self) -> bool {
        matches!(
            self,
            Error::DuplicateName(_) | Error::ImportedTwice(_) | Error::UnsupportedType(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
