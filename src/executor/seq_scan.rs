//! Sequential scan executor implementation.

use crate::access::{Row, SchemaRef};
use crate::error::{ExecutionError, ExecutionResult};
use crate::executor::Operator;
use crate::source::RowSource;

/// Leaf executor pulling rows from an external row source, in source order
pub struct ScanExecutor {
    source: Box<dyn RowSource>,
    released: bool,
}

impl ScanExecutor {
    pub fn new(source: Box<dyn RowSource>) -> Self {
        Self {
            source,
            released: false,
        }
    }
}

impl Operator for ScanExecutor {
    fn name(&self) -> &'static str {
        "Scan"
    }

    fn describe(&self) -> String {
        format!("Scan {}", self.source.schema())
    }

    fn setup(&mut self) -> ExecutionResult<SchemaRef> {
        Ok(self.source.schema())
    }

    fn produce(&mut self) -> ExecutionResult<Option<Row>> {
        if self.released {
            return Err(ExecutionError::illegal_state("scan source already released"));
        }
        self.source.next_row()
    }

    fn teardown(&mut self) -> ExecutionResult<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.source.close()
    }
}
