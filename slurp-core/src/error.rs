// slurp-core - Error types for the evaluator
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Error types for analysis and evaluation.

use slurp_value::Incomparable;

/// Result type for analysis and evaluation.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while analyzing or evaluating a form.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Symbol not bound in any frame up to and including the root
    #[error("Unable to resolve symbol: {0}")]
    NotFound(String),

    /// Qualified lookup or bind against a namespace that does not exist
    #[error("No such namespace: {0}")]
    NamespaceNotFound(String),

    /// Bind attempted with an empty or whitespace-only name
    #[error("Invalid binding name: '{0}'")]
    InvalidName(String),

    /// Call target is not an invokable value
    #[error("Cannot invoke '{target}': value of type '{type_name}' is not invokable")]
    NotInvokable {
        target: String,
        type_name: &'static str,
    },

    /// No arity of a function accepts the argument count
    #[error("Wrong number of arguments ({got}) passed to '{name}': expected {expected}")]
    Arity {
        name: String,
        expected: String,
        got: usize,
    },

    /// Malformed special form
    #[error("Invalid '{form}' form: {message}")]
    SpecialForm { form: &'static str, message: String },

    #[error(transparent)]
    Incomparable(#[from] Incomparable),

    /// Evaluation or analysis recursed past the configured depth
    #[error("Stack overflow: maximum eval depth ({0}) exceeded")]
    DepthExceeded(usize),

    /// Macro expansion kept producing macro calls
    #[error("Macro expansion of {form} did not settle within {limit} steps")]
    ExpansionLimit { form: String, limit: usize },

    /// The host refused to start a `go` thread
    #[error("Unable to spawn go task: {0}")]
    Spawn(String),

    /// Failure reported by a native function
    #[error("{0}")]
    Eval(String),

    /// Internal error - invariant violation
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a malformed special form error.
    pub fn syntax(form: &'static str, message: impl Into<String>) -> Self {
        Error::SpecialForm {
            form,
            message: message.into(),
        }
    }

    /// Create a general evaluation error, as raised by native functions.
    pub fn eval(message: impl Into<String>) -> Self {
        Error::Eval(message.into())
    }

    /// True for both unresolved symbols and missing namespaces.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::NamespaceNotFound(_))
    }
}
