//! Rows: name to value mappings shaped by a schema.

use crate::access::{Schema, Value};
use crate::error::{ExecutionError, ExecutionResult};
use std::collections::HashMap;
use std::fmt;

/// A single row flowing through the operator pipeline.
///
/// A row carries no schema of its own. The operator that builds it is
/// responsible for populating exactly the columns its output schema declares.
/// Rows are never mutated after being handed to a caller; builders consume
/// `self`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    values: HashMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: HashMap::with_capacity(capacity),
        }
    }

    /// Return this row extended with one more column
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> ExecutionResult<&Value> {
        self.values
            .get(name)
            .ok_or_else(|| ExecutionError::unknown_column(name))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    /// Verify that this row has exactly the columns of `schema` with matching types
    pub fn check_shape(&self, schema: &Schema) -> ExecutionResult<()> {
        for column in schema.columns() {
            let value = self.get(&column.name)?;
            if value.data_type() != column.data_type {
                return Err(ExecutionError::type_mismatch(
                    column.data_type,
                    value.data_type(),
                    format!("column {}", column.name),
                ));
            }
        }
        if let Some(extra) = self.column_names().find(|name| !schema.contains(name)) {
            return Err(ExecutionError::unknown_column(extra));
        }
        Ok(())
    }

    /// Values in the column order of `schema`
    pub fn values_in(&self, schema: &Schema) -> ExecutionResult<Vec<&Value>> {
        schema
            .columns()
            .iter()
            .map(|column| self.get(&column.name))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (S, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // HashMap order is arbitrary; sort for stable output
        let mut entries: Vec<_> = self.values.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        write!(f, "{{")?;
        for (i, (name, value)) in entries.into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::DataType;

    fn schema() -> Schema {
        Schema::from_pairs([("a", DataType::Integer), ("b", DataType::Text)]).unwrap()
    }

    #[test]
    fn test_get() {
        let row = Row::new().with_value("a", 1i64).with_value("b", "x");
        assert_eq!(row.get("a").unwrap(), &Value::Integer(1));
        assert_eq!(row.get("b").unwrap(), &Value::from("x"));
        assert_eq!(row.get("c"), Err(ExecutionError::unknown_column("c")));
    }

    #[test]
    fn test_check_shape_accepts_conforming_row() {
        let row = Row::new().with_value("a", 1i64).with_value("b", "x");
        assert!(row.check_shape(&schema()).is_ok());
    }

    #[test]
    fn test_check_shape_rejects_missing_column() {
        let row = Row::new().with_value("a", 1i64);
        assert_eq!(
            row.check_shape(&schema()),
            Err(ExecutionError::unknown_column("b"))
        );
    }

    #[test]
    fn test_check_shape_rejects_wrong_type() {
        let row = Row::new().with_value("a", true).with_value("b", "x");
        assert!(matches!(
            row.check_shape(&schema()),
            Err(ExecutionError::TypeMismatch {
                expected: DataType::Integer,
                actual: DataType::Boolean,
                ..
            })
        ));
    }

    #[test]
    fn test_check_shape_rejects_extra_column() {
        let row = Row::new()
            .with_value("a", 1i64)
            .with_value("b", "x")
            .with_value("c", false);
        assert_eq!(
            row.check_shape(&schema()),
            Err(ExecutionError::unknown_column("c"))
        );
    }

    #[test]
    fn test_values_in_schema_order() {
        let row: Row = vec![("b", Value::from("x")), ("a", Value::Integer(2))]
            .into_iter()
            .collect();
        let values = row.values_in(&schema()).unwrap();
        assert_eq!(values, vec![&Value::Integer(2), &Value::from("x")]);
        assert_eq!(row.to_string(), "{a: 2, b: 'x'}");
    }
}
