use std::fmt;

use crate::error::AdapterError;

/// SQL scalar type a persisted column occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SqlType {
    Varchar,
    Char,
    Integer,
    SmallInt,
    TinyInt,
    BigInt,
    Boolean,
    Double,
    Real,
}

impl SqlType {
    /// JDBC-style type name, used in bind logs.
    pub fn name(self) -> &'static str {
        match self {
            SqlType::Varchar => "VARCHAR",
            SqlType::Char => "CHAR",
            SqlType::Integer => "INTEGER",
            SqlType::SmallInt => "SMALLINT",
            SqlType::TinyInt => "TINYINT",
            SqlType::BigInt => "BIGINT",
            SqlType::Boolean => "BOOLEAN",
            SqlType::Double => "DOUBLE",
            SqlType::Real => "REAL",
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw scalar value as stored in / read from a single column.
///
/// SQL NULL is never a `ColumnValue`; it is `None` at every boundary.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum ColumnValue {
    Text(String),
    Char(char),
    Int(i32),
    SmallInt(i16),
    TinyInt(i8),
    BigInt(i64),
    Bool(bool),
    Double(f64),
    Real(f32),
}

impl ColumnValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ColumnValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Text(v) => f.write_str(v),
            ColumnValue::Char(v) => write!(f, "{v}"),
            ColumnValue::Int(v) => write!(f, "{v}"),
            ColumnValue::SmallInt(v) => write!(f, "{v}"),
            ColumnValue::TinyInt(v) => write!(f, "{v}"),
            ColumnValue::BigInt(v) => write!(f, "{v}"),
            ColumnValue::Bool(v) => write!(f, "{v}"),
            ColumnValue::Double(v) => write!(f, "{v}"),
            ColumnValue::Real(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for ColumnValue {
    fn from(s: &str) -> Self {
        ColumnValue::Text(s.to_string())
    }
}

impl From<String> for ColumnValue {
    fn from(s: String) -> Self {
        ColumnValue::Text(s)
    }
}

impl From<i32> for ColumnValue {
    fn from(v: i32) -> Self {
        ColumnValue::Int(v)
    }
}

impl From<char> for ColumnValue {
    fn from(v: char) -> Self {
        ColumnValue::Char(v)
    }
}

/// Host-supplied access to the current row of a result cursor.
///
/// Call-scoped: the host hands it to the adapter for one read.
pub trait ColumnReader {
    /// Raw value of the named column; `Ok(None)` when it is SQL NULL.
    fn read(&self, column: &str) -> Result<Option<ColumnValue>, AdapterError>;
}

/// Host-supplied access to the parameters of a prepared statement.
///
/// Positions are 1-based, as in the statement text.
pub trait ColumnWriter {
    fn write_null(&mut self, index: usize, sql_type: SqlType) -> Result<(), AdapterError>;
    fn write(&mut self, index: usize, value: ColumnValue) -> Result<(), AdapterError>;
}

// ---------------------------------------------------------------------------
// In-memory reader/writer
// ---------------------------------------------------------------------------

/// Single result row keyed by column name.
#[derive(Debug, Clone, Default)]
pub struct Row {
    columns: Vec<(String, Option<ColumnValue>)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. `None` stores an SQL NULL.
    pub fn with(mut self, column: impl Into<String>, value: Option<ColumnValue>) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: impl Into<String>, value: Option<ColumnValue>) {
        let column = column.into();
        if let Some(entry) = self.columns.iter_mut().find(|(k, _)| k == &column) {
            entry.1 = value;
        } else {
            self.columns.push((column, value));
        }
    }
}

impl ColumnReader for Row {
    fn read(&self, column: &str) -> Result<Option<ColumnValue>, AdapterError> {
        self.columns
            .iter()
            .find(|(k, _)| k == column)
            .map(|(_, v)| v.clone())
            .ok_or_else(|| AdapterError::io(format!("column '{column}' not present in row")))
    }
}

/// A value bound to a statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    Null(SqlType),
    Value(ColumnValue),
}

/// Recorded statement parameters, in bind order.
#[derive(Debug, Clone, Default)]
pub struct BoundParameters {
    bound: Vec<(usize, Bound)>,
}

impl BoundParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value bound at `index`.
    pub fn get(&self, index: usize) -> Option<&Bound> {
        self.bound
            .iter()
            .rev()
            .find(|(i, _)| *i == index)
            .map(|(_, b)| b)
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

impl ColumnWriter for BoundParameters {
    fn write_null(&mut self, index: usize, sql_type: SqlType) -> Result<(), AdapterError> {
        self.bound.push((index, Bound::Null(sql_type)));
        Ok(())
    }

    fn write(&mut self, index: usize, value: ColumnValue) -> Result<(), AdapterError> {
        self.bound.push((index, Bound::Value(value)));
        Ok(())
    }
}
