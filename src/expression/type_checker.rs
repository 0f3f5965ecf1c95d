//! Type checking for expressions.
//!
//! This is the validation pass operators run once at `open()`: every variable
//! must resolve in the schema and every operator's operand types must agree.

use crate::access::{Column, DataType, Schema};
use crate::error::{ExecutionError, ExecutionResult};
use crate::expression::Expression;

/// Type checker for expressions
pub struct TypeChecker<'a> {
    /// Schema defining the types of input columns
    schema: &'a Schema,
}

impl<'a> TypeChecker<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Type check an expression and return its output type
    pub fn check(&self, expr: &Expression) -> ExecutionResult<DataType> {
        match expr {
            Expression::Literal(value) => Ok(value.data_type()),

            Expression::Variable(name) => Ok(self.schema.column_by_name(name)?.data_type),

            Expression::BinaryOp { op, left, right } => {
                let left_type = self.check(left)?;
                let right_type = self.check(right)?;

                match op.output_type(left_type, right_type) {
                    Some(output_type) => Ok(output_type),
                    None if op.is_comparison() => Err(ExecutionError::type_mismatch(
                        left_type,
                        right_type,
                        format!("operator {}", op),
                    )),
                    None => {
                        let actual = if left_type != DataType::Boolean {
                            left_type
                        } else {
                            right_type
                        };
                        Err(ExecutionError::type_mismatch(
                            DataType::Boolean,
                            actual,
                            format!("operator {}", op),
                        ))
                    }
                }
            }

            Expression::UnaryOp { op, operand } => {
                let operand_type = self.check(operand)?;
                op.output_type(operand_type).ok_or_else(|| {
                    ExecutionError::type_mismatch(
                        DataType::Boolean,
                        operand_type,
                        format!("operator {}", op),
                    )
                })
            }
        }
    }

    /// Check if an expression is valid for use as a filter predicate
    pub fn check_filter_predicate(&self, expr: &Expression) -> ExecutionResult<()> {
        match self.check(expr)? {
            DataType::Boolean => Ok(()),
            other => Err(ExecutionError::type_mismatch(
                DataType::Boolean,
                other,
                "filter predicate",
            )),
        }
    }

    /// Check a projection list and build the schema it produces.
    ///
    /// Output names must be unique; columns keep the order of the list.
    pub fn check_projection(&self, projections: &[(String, Expression)]) -> ExecutionResult<Schema> {
        let columns = projections
            .iter()
            .map(|(name, expr)| -> ExecutionResult<Column> {
                Ok(Column::new(name.clone(), self.check(expr)?))
            })
            .collect::<ExecutionResult<Vec<_>>>()?;
        Schema::new(columns)
    }
}

/// Helper function to type check an expression
pub fn type_check_expression(expr: &Expression, schema: &Schema) -> ExecutionResult<DataType> {
    TypeChecker::new(schema).check(expr)
}

/// Helper function to validate a filter predicate
pub fn validate_filter_predicate(expr: &Expression, schema: &Schema) -> ExecutionResult<()> {
    TypeChecker::new(schema).check_filter_predicate(expr)
}
