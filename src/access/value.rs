use crate::error::{ExecutionError, ExecutionResult};
use std::cmp::Ordering;
use std::fmt;

/// Data types supported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Integer,
    Text,
    Boolean,
}

impl DataType {
    /// Parse a type name as written in table headers (`integer`, `text`, `boolean`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" => Some(DataType::Integer),
            "text" => Some(DataType::Text),
            "boolean" | "bool" => Some(DataType::Boolean),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Integer => "INTEGER",
            DataType::Text => "TEXT",
            DataType::Boolean => "BOOLEAN",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scalar value carrying exactly one payload of exactly one type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Integer(i64),
    Text(String),
    Boolean(bool),
}

impl Value {
    /// Get the data type of this value
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Integer(_) => DataType::Integer,
            Value::Text(_) => DataType::Text,
            Value::Boolean(_) => DataType::Boolean,
        }
    }

    pub fn as_integer(&self) -> ExecutionResult<i64> {
        match self {
            Value::Integer(i) => Ok(*i),
            other => Err(other.mismatch(DataType::Integer)),
        }
    }

    pub fn as_text(&self) -> ExecutionResult<&str> {
        match self {
            Value::Text(s) => Ok(s),
            other => Err(other.mismatch(DataType::Text)),
        }
    }

    pub fn as_boolean(&self) -> ExecutionResult<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            other => Err(other.mismatch(DataType::Boolean)),
        }
    }

    /// Equality between two values of the same type, as a Boolean value.
    ///
    /// Comparing values of different types is a caller error and fails with
    /// `TypeMismatch`; it never yields `false`.
    pub fn equals(&self, other: &Value) -> ExecutionResult<Value> {
        self.compare(other)
            .map(|ordering| Value::Boolean(ordering == Ordering::Equal))
    }

    /// Total order between two values of the same type
    pub fn compare(&self, other: &Value) -> ExecutionResult<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Ok(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Ok(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Ok(a.cmp(b)),
            _ => Err(ExecutionError::type_mismatch(
                self.data_type(),
                other.data_type(),
                "value comparison",
            )),
        }
    }

    /// Parse a textual field into a value of the given type
    pub fn parse(input: &str, data_type: DataType) -> ExecutionResult<Self> {
        match data_type {
            DataType::Integer => input
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|e| ExecutionError::Source(format!("invalid integer {:?}: {}", input, e))),
            DataType::Text => Ok(Value::Text(input.to_string())),
            DataType::Boolean => match input.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(Value::Boolean(true)),
                "false" => Ok(Value::Boolean(false)),
                _ => Err(ExecutionError::Source(format!(
                    "invalid boolean {:?}",
                    input
                ))),
            },
        }
    }

    fn mismatch(&self, expected: DataType) -> ExecutionError {
        ExecutionError::type_mismatch(expected, self.data_type(), "value access")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            // SQL-style quoting: embedded quotes are doubled
            Value::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_from_name() {
        assert_eq!(DataType::from_name("integer"), Some(DataType::Integer));
        assert_eq!(DataType::from_name(" TEXT "), Some(DataType::Text));
        assert_eq!(DataType::from_name("bool"), Some(DataType::Boolean));
        assert_eq!(DataType::from_name("float"), None);
    }

    #[test]
    fn test_typed_accessors() -> ExecutionResult<()> {
        assert_eq!(Value::Integer(42).as_integer()?, 42);
        assert_eq!(Value::from("hello").as_text()?, "hello");
        assert!(Value::Boolean(true).as_boolean()?);

        // No widening or coercion between kinds
        assert_eq!(
            Value::Integer(1).as_boolean(),
            Err(ExecutionError::type_mismatch(
                DataType::Boolean,
                DataType::Integer,
                "value access"
            ))
        );
        assert!(matches!(
            Value::from("1").as_integer(),
            Err(ExecutionError::TypeMismatch { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_equals_same_type() -> ExecutionResult<()> {
        assert_eq!(
            Value::Integer(7).equals(&Value::Integer(7))?,
            Value::Boolean(true)
        );
        assert_eq!(
            Value::from("a").equals(&Value::from("b"))?,
            Value::Boolean(false)
        );
        assert_eq!(
            Value::Boolean(false).equals(&Value::Boolean(false))?,
            Value::Boolean(true)
        );
        Ok(())
    }

    #[test]
    fn test_equals_across_types_is_error() {
        let result = Value::Integer(1).equals(&Value::Boolean(true));
        assert!(matches!(
            result,
            Err(ExecutionError::TypeMismatch {
                expected: DataType::Integer,
                actual: DataType::Boolean,
                ..
            })
        ));
    }

    #[test]
    fn test_compare() -> ExecutionResult<()> {
        assert_eq!(
            Value::Integer(1).compare(&Value::Integer(2))?,
            Ordering::Less
        );
        assert_eq!(
            Value::from("b").compare(&Value::from("a"))?,
            Ordering::Greater
        );
        assert_eq!(
            Value::Boolean(false).compare(&Value::Boolean(true))?,
            Ordering::Less
        );
        Ok(())
    }

    #[test]
    fn test_parse() -> ExecutionResult<()> {
        assert_eq!(Value::parse(" 12 ", DataType::Integer)?, Value::Integer(12));
        assert_eq!(Value::parse("x y", DataType::Text)?, Value::from("x y"));
        assert_eq!(Value::parse("TRUE", DataType::Boolean)?, Value::Boolean(true));
        assert!(Value::parse("abc", DataType::Integer).is_err());
        assert!(Value::parse("yes", DataType::Boolean).is_err());
        Ok(())
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Integer(-3).to_string(), "-3");
        assert_eq!(Value::from("x").to_string(), "'x'");
        assert_eq!(Value::from("it's").to_string(), "'it''s'");
        assert_eq!(Value::Boolean(true).to_string(), "true");
        assert_eq!(DataType::Boolean.to_string(), "BOOLEAN");
    }
}
