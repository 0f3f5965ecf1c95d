//! Row sources consumed by scan operators.
//!
//! A row source is the external producer a scan pulls from: storage, a file,
//! a network feed. It is deliberately not an executor; it has no children and
//! no lifecycle beyond pulling rows and being closed once.

pub mod delimited;

pub use delimited::DelimitedFileSource;

use crate::access::{Row, SchemaRef};
use crate::error::{ExecutionError, ExecutionResult};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Producer of rows for a scan
pub trait RowSource: Send {
    /// The schema every produced row conforms to
    fn schema(&self) -> SchemaRef;

    /// Pull the next row, in the source's native order.
    /// Returns None once the source is exhausted.
    fn next_row(&mut self) -> ExecutionResult<Option<Row>>;

    /// Release the source's resources
    fn close(&mut self) -> ExecutionResult<()>;
}

/// Counters observing how a source is used after it has been handed off
#[derive(Debug, Default)]
pub struct SourceStats {
    rows_pulled: AtomicUsize,
    closes: AtomicUsize,
}

impl SourceStats {
    pub fn rows_pulled(&self) -> usize {
        self.rows_pulled.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

/// In-memory row source backed by a vector of rows
pub struct MemorySource {
    schema: SchemaRef,
    rows: VecDeque<Row>,
    closed: bool,
    stats: Arc<SourceStats>,
}

impl MemorySource {
    /// Create a source; every row must have exactly the schema's shape
    pub fn new(schema: SchemaRef, rows: Vec<Row>) -> ExecutionResult<Self> {
        for row in &rows {
            row.check_shape(&schema)?;
        }
        Ok(Self {
            schema,
            rows: rows.into(),
            closed: false,
            stats: Arc::new(SourceStats::default()),
        })
    }

    pub fn empty(schema: SchemaRef) -> Self {
        Self {
            schema,
            rows: VecDeque::new(),
            closed: false,
            stats: Arc::new(SourceStats::default()),
        }
    }

    /// Shared handle to this source's usage counters
    pub fn stats(&self) -> Arc<SourceStats> {
        Arc::clone(&self.stats)
    }
}

impl RowSource for MemorySource {
    fn schema(&self) -> SchemaRef {
        Arc::clone(&self.schema)
    }

    fn next_row(&mut self) -> ExecutionResult<Option<Row>> {
        if self.closed {
            return Err(ExecutionError::illegal_state("row source is closed"));
        }
        let row = self.rows.pop_front();
        if row.is_some() {
            self.stats.rows_pulled.fetch_add(1, Ordering::SeqCst);
        }
        Ok(row)
    }

    fn close(&mut self) -> ExecutionResult<()> {
        self.closed = true;
        self.rows.clear();
        self.stats.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
