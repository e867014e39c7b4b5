//! Error types for difference construction and answer propagation.
//!
//! All errors are strongly typed using thiserror. The boundary between
//! errors and rejections matters here: an answer that merely fails a
//! constraint is *rejected* (a `false` or an empty answer, never an
//! `Err`), while a structurally malformed input, such as a type-bound
//! variable where an instance is required, is an error.

use thiserror::Error;

use crate::graph::GraphError;
use crate::var::Var;

/// Top-level error type.
///
/// This enum encompasses all possible errors that can occur when
/// constructing or applying a semantic difference.
#[derive(Debug, Error)]
pub enum SubsumeError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Variable {var} is bound to a {found} where a {expected} is required")]
    BindingKind {
        var: Var,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Conflicting {field} requirements for {var}: {left} vs {right}")]
    ConflictingRequirement {
        var: Var,
        field: &'static str,
        left: String,
        right: String,
    },

    #[error("Cannot merge definitions of {left} and {right}: variables differ")]
    MismatchedVariables {
        left: Var,
        right: Var,
    },

    #[error("Duplicate definition for variable {var}")]
    DuplicateDefinition {
        var: Var,
    },

    #[error("Invalid predicate: {reason}")]
    InvalidPredicate {
        reason: String,
    },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl SubsumeError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error came from the graph layer.
    #[must_use]
    pub const fn is_graph(&self) -> bool {
        matches!(self, Self::Graph(_))
    }

    /// Returns true if this error reports a binding-kind mismatch.
    #[must_use]
    pub const fn is_binding_kind(&self) -> bool {
        matches!(self, Self::BindingKind { .. })
    }

    /// Returns true if this error reports an unsatisfiable merge.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::ConflictingRequirement { .. } | Self::MismatchedVariables { .. }
        )
    }

    /// Returns true if this is an internal error.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }
}

/// Result type alias for difference operations.
pub type SubsumeResult<T> = Result<T, SubsumeError>;
