//! Error types for agentwire.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for agentwire operations.
///
/// Each variant maps to a specific exit code. `NotFound` is mostly used
/// internally: callers either swallow it (nothing to remove) or escalate it
/// to `ValidationError` (nothing to attach to).
#[derive(Error, Debug)]
pub enum AgentwireError {
    /// User provided invalid arguments, or an I/O or config problem occurred.
    #[error("{0}")]
    UserError(String),

    /// The requested framework name is not one of the supported adapters.
    #[error("unsupported framework '{name}' (supported: {supported})")]
    UnsupportedFramework { name: String, supported: String },

    /// The entrypoint is not syntactically valid Python.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A required structural element (agent, task, binding site) is absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A project-level structural invariant is violated.
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// A proposed rewrite would have produced invalid source.
    #[error("Rewrite rejected: {0}")]
    MutationError(String),
}

impl AgentwireError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            AgentwireError::UserError(_) => exit_codes::USER_ERROR,
            AgentwireError::UnsupportedFramework { .. } => exit_codes::USER_ERROR,
            AgentwireError::NotFound(_) => exit_codes::USER_ERROR,
            AgentwireError::ValidationError(_) => exit_codes::VALIDATION_FAILURE,
            AgentwireError::ParseError(_) => exit_codes::PARSE_FAILURE,
            AgentwireError::MutationError(_) => exit_codes::MUTATION_FAILURE,
        }
    }

    /// Escalate a `NotFound` into a `ValidationError` with extra context.
    ///
    /// Other variants pass through untouched.
    pub fn escalate_not_found(self, context: impl FnOnce(&str) -> String) -> Self {
        match self {
            AgentwireError::NotFound(msg) => AgentwireError::ValidationError(context(&msg)),
            other => other,
        }
    }
}

/// Result type alias for agentwire operations.
pub type Result<T> = std::result::Result<T, AgentwireError>;
