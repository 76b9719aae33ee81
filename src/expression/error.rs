//! Error types for expression evaluation.

use crate::operator::Arity;
use crate::value::{BaseType, Cardinality};
use thiserror::Error;

/// Broad classification of an [`ExpressionError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Operand count outside the operator's bounds
    Arity,
    /// Operand cardinality or base type rejected, or a non-expression given
    Type,
    /// Malformed declared attributes or expression tree
    Configuration,
    /// Custom operator reference not found
    Lookup,
    /// Failure while computing a result
    Evaluation,
    /// Configured evaluation limits exceeded
    Limit,
}

/// Errors that can occur during expression evaluation
#[derive(Error, Debug)]
pub enum ExpressionError {
    #[error("The '{operator}' operator takes {expected} operand(s), {actual} given")]
    Arity {
        operator: &'static str,
        expected: Arity,
        actual: usize,
    },

    #[error("The '{operator}' operator does not accept operand {position} with cardinality {found}")]
    WrongCardinality {
        operator: &'static str,
        position: usize,
        found: Cardinality,
    },

    #[error("The '{operator}' operator does not accept operand {position} with base type {found}")]
    WrongBaseType {
        operator: &'static str,
        position: usize,
        found: BaseType,
    },

    #[error(
        "The '{operator}' operator requires operands of a single base type, \
         operand {position} is {found} while {expected} was expected"
    )]
    MixedBaseTypes {
        operator: &'static str,
        position: usize,
        expected: BaseType,
        found: BaseType,
    },

    #[error(
        "The '{operator}' operator requires operands of the same cardinality, \
         operand {position} is {found} while {expected} was expected"
    )]
    MixedCardinalities {
        operator: &'static str,
        position: usize,
        expected: Cardinality,
        found: Cardinality,
    },

    #[error("Only expressions can be evaluated, '{component}' given")]
    NotAnExpression { component: String },

    #[error("Only custom operators with a 'class' attribute value can be processed")]
    MissingImplementationReference,

    #[error("No custom operator implementation found for class '{class}'")]
    UnknownImplementation { class: String },

    #[error("Invalid attribute for the '{operator}' operator: {message}")]
    InvalidAttribute {
        operator: &'static str,
        message: String,
    },

    #[error("Invalid expression tree: {message}")]
    InvalidTree { message: String },

    #[error("The '{operator}' operator failed: {message}")]
    Evaluation {
        operator: &'static str,
        message: String,
    },

    #[error("Custom operator '{class}' failed: {source}")]
    Custom {
        class: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Expression tree exceeds the maximum {limit} of {max}")]
    LimitExceeded { limit: &'static str, max: usize },
}

impl ExpressionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExpressionError::Arity { .. } => ErrorKind::Arity,
            ExpressionError::WrongCardinality { .. }
            | ExpressionError::WrongBaseType { .. }
            | ExpressionError::MixedBaseTypes { .. }
            | ExpressionError::MixedCardinalities { .. }
            | ExpressionError::NotAnExpression { .. } => ErrorKind::Type,
            ExpressionError::MissingImplementationReference
            | ExpressionError::InvalidAttribute { .. }
            | ExpressionError::InvalidTree { .. } => ErrorKind::Configuration,
            ExpressionError::UnknownImplementation { .. } => ErrorKind::Lookup,
            ExpressionError::Evaluation { .. } | ExpressionError::Custom { .. } => {
                ErrorKind::Evaluation
            }
            ExpressionError::LimitExceeded { .. } => ErrorKind::Limit,
        }
    }
}

/// Result type for expression operations
pub type ExpressionResult<T> = Result<T, ExpressionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExpressionError::Arity {
            operator: "gt",
            expected: Arity::exactly(2),
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "The 'gt' operator takes exactly 2 operand(s), 3 given"
        );

        let err = ExpressionError::WrongBaseType {
            operator: "or",
            position: 0,
            found: BaseType::Point,
        };
        assert_eq!(
            err.to_string(),
            "The 'or' operator does not accept operand 0 with base type point"
        );

        let err = ExpressionError::UnknownImplementation {
            class: "org.qtism.test.Unknown".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No custom operator implementation found for class 'org.qtism.test.Unknown'"
        );

        let err = ExpressionError::MissingImplementationReference;
        assert_eq!(
            err.to_string(),
            "Only custom operators with a 'class' attribute value can be processed"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            ExpressionError::WrongCardinality {
                operator: "gt",
                position: 1,
                found: Cardinality::Record,
            }
            .kind(),
            ErrorKind::Type
        );
        assert_eq!(
            ExpressionError::NotAnExpression {
                component: "itemSessionControl".to_string()
            }
            .kind(),
            ErrorKind::Type
        );
        assert_eq!(
            ExpressionError::MissingImplementationReference.kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            ExpressionError::UnknownImplementation {
                class: "x".to_string()
            }
            .kind(),
            ErrorKind::Lookup
        );
        assert_eq!(
            ExpressionError::LimitExceeded {
                limit: "depth",
                max: 3
            }
            .kind(),
            ErrorKind::Limit
        );
    }
}
