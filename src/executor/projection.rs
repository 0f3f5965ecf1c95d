//! Projection executor implementation.
//!
//! This executor evaluates a list of named expressions against each child row
//! and emits a brand new row holding exactly those names. Input columns not
//! named in the list are discarded.

use crate::access::{Row, Schema, SchemaRef};
use crate::error::ExecutionResult;
use crate::executor::{Executor, Operator};
use crate::expression::{Expression, TypeChecker};

/// Executor that computes named expressions from child rows
pub struct ProjectionExecutor {
    /// Child executor that produces rows
    child: Executor,
    /// Output column names and the expressions computing them, in output order
    projections: Vec<(String, Expression)>,
}

impl ProjectionExecutor {
    /// Create a new projection executor
    ///
    /// # Example
    /// ```ignore
    /// // If child produces columns [a, b]
    /// // [("eq", a = b)] produces a single BOOLEAN column `eq`
    /// ```
    pub fn new<S: Into<String>>(
        child: Executor,
        projections: impl IntoIterator<Item = (S, Expression)>,
    ) -> Self {
        Self {
            child,
            projections: projections
                .into_iter()
                .map(|(name, expr)| (name.into(), expr))
                .collect(),
        }
    }

    /// Projection list reproducing every column of `schema` unchanged
    pub fn identity_list(schema: &Schema) -> Vec<(String, Expression)> {
        schema
            .column_names()
            .map(|name| (name.to_string(), Expression::variable(name)))
            .collect()
    }

    pub fn projections(&self) -> &[(String, Expression)] {
        &self.projections
    }
}

impl Operator for ProjectionExecutor {
    fn name(&self) -> &'static str {
        "Project"
    }

    fn describe(&self) -> String {
        let items: Vec<String> = self
            .projections
            .iter()
            .map(|(name, expr)| format!("{} := {}", name, expr))
            .collect();
        format!("Project [{}]", items.join(", "))
    }

    fn children(&self) -> Vec<&Executor> {
        vec![&self.child]
    }

    fn children_mut(&mut self) -> Vec<&mut Executor> {
        vec![&mut self.child]
    }

    fn setup(&mut self) -> ExecutionResult<SchemaRef> {
        let child_schema = self.child.output_schema()?;
        let output = TypeChecker::new(child_schema).check_projection(&self.projections)?;
        Ok(output.into_ref())
    }

    fn produce(&mut self) -> ExecutionResult<Option<Row>> {
        let Some(input) = self.child.next()? else {
            return Ok(None);
        };

        let mut output = Row::with_capacity(self.projections.len());
        for (name, expr) in &self.projections {
            output = output.with_value(name.clone(), expr.eval(&input)?);
        }
        Ok(Some(output))
    }
}
