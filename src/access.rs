//! Access layer for typed values, schemas and rows.
//!
//! This module provides the data model every operator and expression works on:
//!
//! - **DataType**: The closed set of scalar types
//! - **Value**: A scalar tagged with exactly one DataType
//! - **Schema**: Named, ordered, uniquely named columns with an O(1) name index
//! - **Row**: A name to value mapping shaped by one schema at a time
//!
//! Nothing here performs implicit coercion. Reading a value as the wrong type
//! fails with `ExecutionError::TypeMismatch`.

pub mod row;
pub mod schema;
pub mod value;

pub use row::Row;
pub use schema::{Column, Schema, SchemaRef};
pub use value::{DataType, Value};
