//! Named, ordered column layouts.

use crate::access::DataType;
use crate::error::{ExecutionError, ExecutionResult};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A schema shared read-only between operators and their consumers
pub type SchemaRef = Arc<Schema>;

/// Information about a single column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered columns with unique names and a name to position index.
///
/// A schema is immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: Vec<Column>,
    name_index: HashMap<String, usize>,
}

impl Schema {
    /// Build a schema, rejecting repeated column names
    pub fn new(columns: Vec<Column>) -> ExecutionResult<Self> {
        let mut name_index = HashMap::with_capacity(columns.len());
        for (position, column) in columns.iter().enumerate() {
            if name_index.insert(column.name.clone(), position).is_some() {
                return Err(ExecutionError::DuplicateColumn {
                    name: column.name.clone(),
                });
            }
        }
        Ok(Self {
            columns,
            name_index,
        })
    }

    /// Convenience constructor from `(name, type)` pairs
    pub fn from_pairs<S: Into<String>>(
        pairs: impl IntoIterator<Item = (S, DataType)>,
    ) -> ExecutionResult<Self> {
        Self::new(
            pairs
                .into_iter()
                .map(|(name, data_type)| Column::new(name, data_type))
                .collect(),
        )
    }

    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            name_index: HashMap::new(),
        }
    }

    pub fn into_ref(self) -> SchemaRef {
        Arc::new(self)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column_by_index(&self, index: usize) -> ExecutionResult<&Column> {
        self.columns.get(index).ok_or(ExecutionError::OutOfRange {
            index,
            len: self.columns.len(),
        })
    }

    pub fn column_by_name(&self, name: &str) -> ExecutionResult<&Column> {
        let index = self.index_of(name)?;
        Ok(&self.columns[index])
    }

    pub fn index_of(&self, name: &str) -> ExecutionResult<usize> {
        self.name_index
            .get(name)
            .copied()
            .ok_or_else(|| ExecutionError::unknown_column(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_index.contains_key(name)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", column.name, column.data_type)?;
        }
        write!(f, "}}")
    }
}
