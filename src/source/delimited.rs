//! Row source reading a comma-delimited table lazily, line by line.
//!
//! The first line declares the schema as `name:type` fields, for example
//! `id:integer,name:text,active:boolean`. Each following line holds one value
//! per column in the same order. Blank lines are skipped, except in a table
//! with a single text column, where a blank line is a row holding `''`.

use crate::access::{Column, DataType, Row, Schema, SchemaRef, Value};
use crate::error::{ExecutionError, ExecutionResult};
use crate::source::RowSource;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub struct DelimitedFileSource {
    schema: SchemaRef,
    reader: Option<Box<dyn BufRead + Send>>,
    line_number: usize,
}

impl DelimitedFileSource {
    pub fn open(path: impl AsRef<Path>) -> ExecutionResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            ExecutionError::Source(format!("cannot open {}: {}", path.display(), e))
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Build a source over any buffered reader, consuming the header line
    pub fn from_reader(reader: impl BufRead + Send + 'static) -> ExecutionResult<Self> {
        let mut reader: Box<dyn BufRead + Send> = Box::new(reader);
        let mut header = String::new();
        let read = reader.read_line(&mut header).map_err(io_error)?;
        if read == 0 {
            return Err(ExecutionError::Source("missing header line".to_string()));
        }

        let columns = header
            .trim_end_matches(['\r', '\n'])
            .split(',')
            .map(parse_column)
            .collect::<ExecutionResult<Vec<_>>>()?;

        Ok(Self {
            schema: Schema::new(columns)?.into_ref(),
            reader: Some(reader),
            line_number: 1,
        })
    }

    fn parse_line(&self, line: &str) -> ExecutionResult<Row> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != self.schema.len() {
            return Err(ExecutionError::Source(format!(
                "line {}: expected {} fields, found {}",
                self.line_number,
                self.schema.len(),
                fields.len()
            )));
        }

        let mut row = Row::with_capacity(fields.len());
        for (column, field) in self.schema.columns().iter().zip(fields) {
            let value = Value::parse(field, column.data_type).map_err(|e| {
                ExecutionError::Source(format!("line {}: {}", self.line_number, e))
            })?;
            row = row.with_value(column.name.clone(), value);
        }
        Ok(row)
    }

    fn blank_line_is_row(&self) -> bool {
        matches!(self.schema.columns(), [column] if column.data_type == DataType::Text)
    }
}

impl RowSource for DelimitedFileSource {
    fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    fn next_row(&mut self) -> ExecutionResult<Option<Row>> {
        loop {
            let Some(reader) = self.reader.as_mut() else {
                return Err(ExecutionError::illegal_state("row source is closed"));
            };

            let mut line = String::new();
            if reader.read_line(&mut line).map_err(io_error)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = line.trim_end_matches(['\r', '\n']);
            if line.trim().is_empty() && !self.blank_line_is_row() {
                continue;
            }
            return self.parse_line(line).map(Some);
        }
    }

    fn close(&mut self) -> ExecutionResult<()> {
        self.reader = None;
        Ok(())
    }
}

fn parse_column(field: &str) -> ExecutionResult<Column> {
    let (name, type_name) = field
        .split_once(':')
        .ok_or_else(|| ExecutionError::Source(format!("header field {:?} lacks a type", field)))?;
    let data_type = DataType::from_name(type_name)
        .ok_or_else(|| ExecutionError::Source(format!("unknown column type {:?}", type_name)))?;
    Ok(Column::new(name.trim(), data_type))
}

fn io_error(e: std::io::Error) -> ExecutionError {
    ExecutionError::Source(e.to_string())
}
