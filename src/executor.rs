//! Executor layer for query execution.
//!
//! This module implements the Volcano-style iterator model. Each executor
//! produces rows one at a time via `next()`, pulling from its children on
//! demand, so no operator materializes more than the row it is working on.
//!
//! The lifecycle (`open`, `next`, `close`) lives in [`Executor`] and is the
//! same for every operator. Operators only implement the [`Operator`] hooks:
//! `setup` runs after all children are open, `teardown` runs before any child
//! is closed. An operator never drives its own lifecycle.

use crate::access::{Row, SchemaRef};
use crate::error::{ExecutionError, ExecutionResult};
use crate::expression::Expression;
use crate::source::RowSource;
use log::{debug, trace, warn};

pub mod filter;
pub mod limit;
pub mod projection;
pub mod seq_scan;

pub use filter::FilterExecutor;
pub use limit::LimitExecutor;
pub use projection::ProjectionExecutor;
pub use seq_scan::ScanExecutor;

/// Operator-specific behavior plugged into the generic executor lifecycle
pub trait Operator: Send {
    /// Short operator name, e.g. "Filter"
    fn name(&self) -> &'static str;

    /// One-line description used by `Executor::explain`
    fn describe(&self) -> String {
        self.name().to_string()
    }

    /// Child executors, in the order they were supplied at construction
    fn children(&self) -> Vec<&Executor> {
        Vec::new()
    }

    fn children_mut(&mut self) -> Vec<&mut Executor> {
        Vec::new()
    }

    /// Operator setup. Every child is already open. Validates the operator's
    /// expressions and returns its output schema.
    fn setup(&mut self) -> ExecutionResult<SchemaRef>;

    /// Produce the next row, or None at end of stream.
    fn produce(&mut self) -> ExecutionResult<Option<Row>>;

    /// Operator teardown. Runs at most once, before the children are closed.
    fn teardown(&mut self) -> ExecutionResult<()> {
        Ok(())
    }
}

/// Lifecycle state of an executor.
///
/// `Exhausted` and `Aborted` are both sub-states of an open executor: the
/// stream has ended, by running out of rows or by failing, but resources are
/// held until `close()`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutorState {
    Created,
    Opened,
    Exhausted,
    Aborted(ExecutionError),
    Closed,
}

/// A node of an operator tree, driving one operator through its lifecycle.
///
/// A single executor is driven through `&mut self`, so it cannot be pulled
/// from two callers at once. Independent trees share nothing and may run on
/// separate threads.
pub struct Executor {
    operator: Box<dyn Operator>,
    state: ExecutorState,
    output_schema: Option<SchemaRef>,
}

impl Executor {
    pub fn new(operator: impl Operator + 'static) -> Self {
        Self {
            operator: Box::new(operator),
            state: ExecutorState::Created,
            output_schema: None,
        }
    }

    /// Leaf scan over an external row source
    pub fn scan(source: impl RowSource + 'static) -> Self {
        Self::new(ScanExecutor::new(Box::new(source)))
    }

    pub fn filter(predicate: Expression, child: Executor) -> Self {
        Self::new(FilterExecutor::new(child, predicate))
    }

    pub fn project<S: Into<String>>(
        projections: impl IntoIterator<Item = (S, Expression)>,
        child: Executor,
    ) -> Self {
        Self::new(ProjectionExecutor::new(child, projections))
    }

    pub fn limit(child: Executor, limit: usize, offset: usize) -> Self {
        Self::new(LimitExecutor::with_offset(child, limit, offset))
    }

    pub fn name(&self) -> &'static str {
        self.operator.name()
    }

    pub fn state(&self) -> &ExecutorState {
        &self.state
    }

    pub fn children(&self) -> Vec<&Executor> {
        self.operator.children()
    }

    /// Open every child, in order, then set up this operator.
    ///
    /// On failure the whole subtree is closed and the error returned; the
    /// executor never reaches a state where `next()` can produce rows.
    pub fn open(&mut self) -> ExecutionResult<()> {
        match self.state {
            ExecutorState::Created => {}
            ExecutorState::Closed => {
                return Err(ExecutionError::illegal_state(format!(
                    "open() called on closed {} executor",
                    self.name()
                )))
            }
            _ => {
                return Err(ExecutionError::illegal_state(format!(
                    "open() called twice on {} executor",
                    self.name()
                )))
            }
        }

        match self.open_subtree() {
            Ok(schema) => {
                debug!("Opened {} with output schema {}", self.name(), schema);
                self.output_schema = Some(schema);
                self.state = ExecutorState::Opened;
                Ok(())
            }
            Err(e) => {
                debug!("Failed to open {}: {}", self.name(), e);
                if let Err(close_err) = self.close() {
                    warn!(
                        "Error while closing {} after failed open: {}",
                        self.name(),
                        close_err
                    );
                }
                Err(e)
            }
        }
    }

    fn open_subtree(&mut self) -> ExecutionResult<SchemaRef> {
        for child in self.operator.children_mut() {
            child.open()?;
        }
        self.operator.setup()
    }

    /// Get the next row. Returns None once the stream is exhausted, and keeps
    /// returning None on every later call.
    pub fn next(&mut self) -> ExecutionResult<Option<Row>> {
        match &self.state {
            ExecutorState::Opened => {}
            ExecutorState::Exhausted => return Ok(None),
            ExecutorState::Aborted(e) => return Err(e.clone()),
            ExecutorState::Created => {
                return Err(ExecutionError::illegal_state(format!(
                    "next() called on {} executor before open()",
                    self.name()
                )))
            }
            ExecutorState::Closed => {
                return Err(ExecutionError::illegal_state(format!(
                    "next() called on {} executor after close()",
                    self.name()
                )))
            }
        }

        match self.operator.produce() {
            Ok(Some(row)) => {
                trace!("{} produced {}", self.name(), row);
                Ok(Some(row))
            }
            Ok(None) => {
                debug!("{} exhausted", self.name());
                self.state = ExecutorState::Exhausted;
                Ok(None)
            }
            Err(e) => {
                debug!("{} aborted: {}", self.name(), e);
                self.state = ExecutorState::Aborted(e.clone());
                Err(e)
            }
        }
    }

    /// Tear down this operator, then close every child in reverse order.
    ///
    /// Idempotent, and legal from any state. Every child is closed even if an
    /// earlier teardown fails; the first error is returned.
    pub fn close(&mut self) -> ExecutionResult<()> {
        if self.state == ExecutorState::Closed {
            return Ok(());
        }
        self.state = ExecutorState::Closed;

        let name = self.name();
        let mut result = self.operator.teardown();
        for child in self.operator.children_mut().into_iter().rev() {
            if let Err(e) = child.close() {
                if result.is_ok() {
                    result = Err(e);
                } else {
                    warn!("Additional error while closing child of {}: {}", name, e);
                }
            }
        }

        debug!("Closed {}", name);
        result
    }

    /// The schema of rows this executor produces. Available once open.
    pub fn output_schema(&self) -> ExecutionResult<&SchemaRef> {
        self.output_schema.as_ref().ok_or_else(|| {
            ExecutionError::illegal_state(format!(
                "output schema of {} executor requested before open()",
                self.name()
            ))
        })
    }

    /// Render the operator tree, one node per line, children indented
    pub fn explain(&self) -> String {
        let mut out = String::new();
        self.explain_into(&mut out, 0);
        out
    }

    fn explain_into(&self, out: &mut String, depth: usize) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&self.operator.describe());
        out.push('\n');
        for child in self.children() {
            child.explain_into(out, depth + 1);
        }
    }
}

/// Open, drain and close an executor, collecting every row.
///
/// The executor is closed even when opening or draining fails.
pub fn execute(executor: &mut Executor) -> ExecutionResult<Vec<Row>> {
    let drained = executor.open().and_then(|()| {
        let mut rows = Vec::new();
        while let Some(row) = executor.next()? {
            rows.push(row);
        }
        Ok(rows)
    });

    let closed = executor.close();
    match (drained, closed) {
        (Ok(rows), Ok(())) => Ok(rows),
        (Err(e), Ok(())) => Err(e),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Err(close_err)) => {
            warn!("Error while closing after failed execution: {}", close_err);
            Err(e)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_util::*;
    use super::*;
    use crate::access::Value;
    use crate::source::DelimitedFileSource;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    fn new_log() -> EventLog {
        Arc::new(Mutex::new(Vec::new()))
    }

    #[test]
    fn test_open_children_first_close_children_last() -> ExecutionResult<()> {
        let log = new_log();
        let left = Executor::new(MockOperator::new("left", vec![], &log));
        let right = Executor::new(MockOperator::new("right", vec![], &log));
        let mut root = Executor::new(MockOperator::new("root", vec![left, right], &log));

        root.open()?;
        root.close()?;

        assert_eq!(
            events(&log),
            vec![
                "setup left",
                "setup right",
                "setup root",
                "teardown root",
                "teardown right",
                "teardown left",
            ]
        );
        Ok(())
    }

    #[test]
    fn test_children_closed_even_if_sibling_fails() {
        let log = new_log();
        let left = Executor::new(MockOperator::new("left", vec![], &log));
        let mut failing = MockOperator::new("right", vec![], &log);
        failing.fail_teardown = true;
        let right = Executor::new(failing);
        let mut root = Executor::new(MockOperator::new("root", vec![left, right], &log));

        root.open().unwrap();
        let result = root.close();
        assert_eq!(
            result,
            Err(ExecutionError::Source("right teardown".to_string()))
        );
        assert!(events(&log).contains(&"teardown left".to_string()));
        assert!(root
            .children()
            .iter()
            .all(|child| child.state() == &ExecutorState::Closed));
    }

    #[test]
    fn test_failed_open_closes_subtree() {
        let log = new_log();
        let child = Executor::new(MockOperator::new("child", vec![], &log));
        let mut failing = MockOperator::new("root", vec![child], &log);
        failing.fail_setup = true;
        let mut root = Executor::new(failing);

        assert_eq!(root.open(), Err(ExecutionError::unknown_column("root")));
        assert_eq!(root.state(), &ExecutorState::Closed);
        assert_eq!(
            events(&log),
            vec!["setup child", "setup root", "teardown root", "teardown child"]
        );

        // No row can ever be pulled from a tree that failed to open
        assert!(matches!(root.next(), Err(ExecutionError::IllegalState(_))));
        assert!(root.close().is_ok());
    }

    #[test]
    fn test_lifecycle_violations() -> ExecutionResult<()> {
        let mut scan = Executor::scan(ab_source(&[(1, 1)]));
        assert!(matches!(scan.next(), Err(ExecutionError::IllegalState(_))));
        assert!(matches!(
            scan.output_schema(),
            Err(ExecutionError::IllegalState(_))
        ));

        scan.open()?;
        assert!(matches!(scan.open(), Err(ExecutionError::IllegalState(_))));

        scan.close()?;
        assert!(matches!(scan.next(), Err(ExecutionError::IllegalState(_))));
        assert!(matches!(scan.open(), Err(ExecutionError::IllegalState(_))));
        Ok(())
    }

    #[test]
    fn test_close_from_created() -> ExecutionResult<()> {
        let source = ab_source(&[(1, 2)]);
        let stats = source.stats();
        let mut scan = Executor::scan(source);
        scan.close()?;
        scan.close()?;
        assert_eq!(stats.closes(), 1);
        Ok(())
    }

    #[test]
    fn test_aborted_stream_repeats_error() -> ExecutionResult<()> {
        let source = DelimitedFileSource::from_reader(Cursor::new(b"a:integer\n1\nx\n2\n".to_vec()))?;
        let mut scan = Executor::scan(source);
        scan.open()?;

        assert_eq!(scan.next()?, Some(Row::new().with_value("a", Value::Integer(1))));
        let err = scan.next().unwrap_err();
        assert!(matches!(err, ExecutionError::Source(_)));

        // The stream does not resume past a failed row
        assert_eq!(scan.next(), Err(err.clone()));
        assert!(matches!(scan.state(), ExecutorState::Aborted(_)));
        scan.close()?;
        Ok(())
    }

    #[test]
    fn test_exhausted_stream_stays_exhausted() -> ExecutionResult<()> {
        let mut scan = Executor::scan(ab_source(&[(1, 2)]));
        scan.open()?;
        assert_eq!(scan.next()?, Some(ab_row(1, 2)));
        for _ in 0..3 {
            assert_eq!(scan.next()?, None);
        }
        assert_eq!(scan.state(), &ExecutorState::Exhausted);
        scan.close()
    }

    #[test]
    fn test_validation_sees_projected_schema() {
        let mut tree = Executor::filter(
            Expression::eq(Expression::variable("b"), Expression::literal(1i64)),
            Executor::project(
                [("a", Expression::variable("a"))],
                Executor::scan(ab_source(&[(1, 2)])),
            ),
        );
        assert_eq!(tree.open(), Err(ExecutionError::unknown_column("b")));
    }

    #[test]
    fn test_execute_and_explain() -> ExecutionResult<()> {
        let mut tree = Executor::project(
            [(
                "eq",
                Expression::eq(Expression::variable("a"), Expression::variable("b")),
            )],
            Executor::filter(
                Expression::ge(Expression::variable("a"), Expression::literal(2i64)),
                Executor::scan(ab_source(&[(1, 1), (2, 2), (3, 4)])),
            ),
        );

        assert_eq!(
            tree.explain(),
            "Project [eq := (a = b)]\n  Filter (a >= 2)\n    Scan {a: INTEGER, b: INTEGER}\n"
        );

        let rows = execute(&mut tree)?;
        assert_eq!(
            rows,
            vec![
                Row::new().with_value("eq", true),
                Row::new().with_value("eq", false),
            ]
        );
        assert_eq!(tree.state(), &ExecutorState::Closed);
        Ok(())
    }

    #[test]
    fn test_execute_closes_on_failure() {
        let source = ab_source(&[(1, 1)]);
        let stats = source.stats();
        let mut tree = Executor::filter(Expression::variable("a"), Executor::scan(source));
        assert!(matches!(
            execute(&mut tree),
            Err(ExecutionError::TypeMismatch { .. })
        ));
        assert_eq!(stats.closes(), 1);
        assert_eq!(stats.rows_pulled(), 0);
    }

    #[test]
    fn test_executor_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Executor>();
    }
}
