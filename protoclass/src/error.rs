use thiserror::Error;

/// Errors raised while resolving or invoking members of an instance.
///
/// `extend` itself never fails; everything here comes from method
/// dispatch or from code running inside user-supplied methods.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassError {
    /// Lookup walked the whole delegation chain without finding `name`.
    #[error("missing member `{name}` on instance of {class}")]
    MissingMember { name: String, class: String },

    #[error("member `{name}` of {class} is not callable")]
    NotCallable { name: String, class: String },

    #[error("{method}: expected {expected} arguments, got {got}")]
    Arity {
        method: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("type error: expected {expected}, got {got}")]
    Type { expected: &'static str, got: String },

    /// Raised by user code through [`ClassError::raise`].
    #[error("{0}")]
    Raised(String),
}

impl ClassError {
    pub fn raise(message: impl Into<String>) -> Self {
        Self::Raised(message.into())
    }
}

pub type Result<T> = std::result::Result<T, ClassError>;
