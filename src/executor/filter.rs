//! Filter executor implementation.
//!
//! This executor filters rows from a child executor based on a predicate
//! expression. It implements the volcano-style iterator model, producing one
//! row at a time that matches the predicate and never holding more than the
//! row under evaluation.

use crate::access::{Row, SchemaRef};
use crate::error::ExecutionResult;
use crate::executor::{Executor, Operator};
use crate::expression::{Expression, TypeChecker};
use log::trace;

/// Executor that filters rows based on an expression
pub struct FilterExecutor {
    /// Child executor that produces rows
    child: Executor,
    /// Filter expression that evaluates to boolean
    predicate: Expression,
}

impl FilterExecutor {
    /// Create a new filter executor
    ///
    /// # Arguments
    /// * `child` - The child executor that produces rows
    /// * `predicate` - The filter expression; must type to BOOLEAN under the child's schema
    pub fn new(child: Executor, predicate: Expression) -> Self {
        Self { child, predicate }
    }

    pub fn predicate(&self) -> &Expression {
        &self.predicate
    }
}

impl Operator for FilterExecutor {
    fn name(&self) -> &'static str {
        "Filter"
    }

    fn describe(&self) -> String {
        format!("Filter {}", self.predicate)
    }

    fn children(&self) -> Vec<&Executor> {
        vec![&self.child]
    }

    fn children_mut(&mut self) -> Vec<&mut Executor> {
        vec![&mut self.child]
    }

    fn setup(&mut self) -> ExecutionResult<SchemaRef> {
        // Output schema is the child's, unchanged
        let schema = self.child.output_schema()?.clone();
        TypeChecker::new(&schema).check_filter_predicate(&self.predicate)?;
        Ok(schema)
    }

    fn produce(&mut self) -> ExecutionResult<Option<Row>> {
        // Keep pulling from the child until a row matches the predicate
        while let Some(row) = self.child.next()? {
            if self.predicate.eval(&row)?.as_boolean()? {
                return Ok(Some(row));
            }
            trace!("Filter dropped {}", row);
        }
        Ok(None)
    }
}
