//! Expression evaluation framework for query execution.
//!
//! This module provides:
//! - Expression tree representation (literals, column variables, operators)
//! - Static type inference and validation against a schema
//! - Evaluation against rows
//!
//! Every node follows the same two-method contract: `eval(row)` produces a
//! value and `static_type(schema)` predicts its type. Trees are validated once
//! against the schema they will run under before any row is evaluated.

pub mod eval;
pub mod expr;
pub mod operator;
pub mod type_checker;

pub use eval::{evaluate_expression, ExpressionEvaluator};
pub use expr::Expression;
pub use operator::{BinaryOperator, UnaryOperator};
pub use type_checker::{type_check_expression, validate_filter_predicate, TypeChecker};
