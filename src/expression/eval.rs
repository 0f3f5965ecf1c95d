//! Expression evaluation implementation.

use crate::access::{Row, Value};
use crate::error::ExecutionResult;
use crate::expression::{BinaryOperator, Expression, UnaryOperator};
use std::cmp::Ordering;

/// Evaluator for expressions over a single row.
///
/// Evaluation is a pure function of the expression and the row. Type errors
/// that validation would have caught are still reported here rather than
/// coerced, so an unvalidated tree can fail but never produce a wrong value.
pub struct ExpressionEvaluator<'a> {
    row: &'a Row,
}

impl<'a> ExpressionEvaluator<'a> {
    pub fn new(row: &'a Row) -> Self {
        Self { row }
    }

    /// Evaluate an expression and return the result
    pub fn evaluate(&self, expr: &Expression) -> ExecutionResult<Value> {
        match expr {
            Expression::Literal(value) => Ok(value.clone()),

            Expression::Variable(name) => self.row.get(name).cloned(),

            Expression::BinaryOp { op, left, right } => {
                let left_val = self.evaluate(left)?;
                let right_val = self.evaluate(right)?;
                self.evaluate_binary_op(*op, &left_val, &right_val)
            }

            Expression::UnaryOp { op, operand } => {
                let operand_val = self.evaluate(operand)?;
                self.evaluate_unary_op(*op, &operand_val)
            }
        }
    }

    fn evaluate_binary_op(
        &self,
        op: BinaryOperator,
        left: &Value,
        right: &Value,
    ) -> ExecutionResult<Value> {
        match op {
            BinaryOperator::Eq => left.equals(right),
            BinaryOperator::Ne => Ok(Value::Boolean(!left.equals(right)?.as_boolean()?)),
            BinaryOperator::Lt => self.compare_values(left, right, |ord| ord == Ordering::Less),
            BinaryOperator::Le => self.compare_values(left, right, |ord| ord != Ordering::Greater),
            BinaryOperator::Gt => self.compare_values(left, right, |ord| ord == Ordering::Greater),
            BinaryOperator::Ge => self.compare_values(left, right, |ord| ord != Ordering::Less),
            BinaryOperator::And => Ok(Value::Boolean(left.as_boolean()? && right.as_boolean()?)),
            BinaryOperator::Or => Ok(Value::Boolean(left.as_boolean()? || right.as_boolean()?)),
        }
    }

    fn evaluate_unary_op(&self, op: UnaryOperator, operand: &Value) -> ExecutionResult<Value> {
        match op {
            UnaryOperator::Not => Ok(Value::Boolean(!operand.as_boolean()?)),
        }
    }

    fn compare_values<F>(&self, left: &Value, right: &Value, cmp_fn: F) -> ExecutionResult<Value>
    where
        F: FnOnce(Ordering) -> bool,
    {
        Ok(Value::Boolean(cmp_fn(left.compare(right)?)))
    }
}

/// Helper function to evaluate an expression against a row
pub fn evaluate_expression(expr: &Expression, row: &Row) -> ExecutionResult<Value> {
    ExpressionEvaluator::new(row).evaluate(expr)
}
