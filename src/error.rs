//! Error types for query execution.

use crate::access::DataType;
use thiserror::Error;

/// Errors that can occur while validating or executing an operator tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    #[error("Unknown column: {name}")]
    UnknownColumn { name: String },

    #[error("Type mismatch in {context}: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: DataType,
        actual: DataType,
        context: String,
    },

    #[error("Duplicate column: {name}")]
    DuplicateColumn { name: String },

    #[error("Column index {index} out of range for schema with {len} columns")]
    OutOfRange { index: usize, len: usize },

    #[error("Illegal state: {0}")]
    IllegalState(String),

    #[error("Row source error: {0}")]
    Source(String),
}

impl ExecutionError {
    pub fn unknown_column(name: impl Into<String>) -> Self {
        ExecutionError::UnknownColumn { name: name.into() }
    }

    pub fn type_mismatch(expected: DataType, actual: DataType, context: impl Into<String>) -> Self {
        ExecutionError::TypeMismatch {
            expected,
            actual,
            context: context.into(),
        }
    }

    pub fn illegal_state(message: impl Into<String>) -> Self {
        ExecutionError::IllegalState(message.into())
    }
}

/// Result type for execution operations.
pub type ExecutionResult<T> = Result<T, ExecutionError>;
