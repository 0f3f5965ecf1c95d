pub mod access;
pub mod error;
pub mod executor;
pub mod expression;
pub mod source;

pub use error::{ExecutionError, ExecutionResult};
