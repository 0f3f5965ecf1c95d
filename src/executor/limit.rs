//! Limit executor implementation.
//!
//! This executor limits the number of rows returned from a child executor.
//! It supports both LIMIT and OFFSET, and stops pulling from its child as
//! soon as the limit is reached.

use crate::access::{Row, SchemaRef};
use crate::error::ExecutionResult;
use crate::executor::{Executor, Operator};

/// Executor that limits the number of rows returned
pub struct LimitExecutor {
    /// Child executor that produces rows
    child: Executor,
    /// Maximum number of rows to return
    limit: usize,
    /// Number of rows to skip before returning
    offset: usize,
    /// Number of rows skipped so far
    skipped: usize,
    /// Number of rows returned so far
    returned: usize,
}

impl LimitExecutor {
    pub fn new(child: Executor, limit: usize) -> Self {
        Self::with_offset(child, limit, 0)
    }

    /// Create a new limit executor with limit and offset
    ///
    /// # Arguments
    /// * `child` - The child executor that produces rows
    /// * `limit` - The maximum number of rows to return
    /// * `offset` - The number of rows to skip before returning
    pub fn with_offset(child: Executor, limit: usize, offset: usize) -> Self {
        Self {
            child,
            limit,
            offset,
            skipped: 0,
            returned: 0,
        }
    }
}

impl Operator for LimitExecutor {
    fn name(&self) -> &'static str {
        "Limit"
    }

    fn describe(&self) -> String {
        if self.offset == 0 {
            format!("Limit {}", self.limit)
        } else {
            format!("Limit {} offset {}", self.limit, self.offset)
        }
    }

    fn children(&self) -> Vec<&Executor> {
        vec![&self.child]
    }

    fn children_mut(&mut self) -> Vec<&mut Executor> {
        vec![&mut self.child]
    }

    fn setup(&mut self) -> ExecutionResult<SchemaRef> {
        self.skipped = 0;
        self.returned = 0;
        Ok(self.child.output_schema()?.clone())
    }

    fn produce(&mut self) -> ExecutionResult<Option<Row>> {
        // If we've already returned the limit number of rows, we're done
        if self.returned >= self.limit {
            return Ok(None);
        }

        while self.skipped < self.offset {
            match self.child.next()? {
                Some(_) => self.skipped += 1,
                None => return Ok(None),
            }
        }

        match self.child.next()? {
            Some(row) => {
                self.returned += 1;
                Ok(Some(row))
            }
            None => Ok(None),
        }
    }
}
