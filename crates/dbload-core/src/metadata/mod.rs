//! Metadata sources and the rows they return.
//!
//! A [`MetadataSource`] answers catalog queries with streams of
//! [`MetadataRow`]s whose fields are addressed by label, the way database
//! drivers expose their metadata result sets.

mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use memory::{MemoryMetadataSource, QueryKind};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteMetadataSource;

use crate::error::{Error, Result};
use std::sync::Arc;

/// Pattern selecting every name in a metadata query.
pub const WILDCARD: &str = "%";

/// Field labels of the metadata row shapes.
pub mod fields {
    pub const TABLE_CAT: &str = "TABLE_CAT";
    pub const TABLE_SCHEM: &str = "TABLE_SCHEM";
    pub const TABLE_NAME: &str = "TABLE_NAME";
    pub const TABLE_TYPE: &str = "TABLE_TYPE";
    pub const COLUMN_NAME: &str = "COLUMN_NAME";
    pub const DATA_TYPE: &str = "DATA_TYPE";
    pub const TYPE_NAME: &str = "TYPE_NAME";
    pub const COLUMN_SIZE: &str = "COLUMN_SIZE";
    pub const DECIMAL_DIGITS: &str = "DECIMAL_DIGITS";
    pub const NULLABLE: &str = "NULLABLE";
    pub const IS_AUTOINCREMENT: &str = "IS_AUTOINCREMENT";
    pub const PROCEDURE_CAT: &str = "PROCEDURE_CAT";
    pub const PROCEDURE_SCHEM: &str = "PROCEDURE_SCHEM";
    pub const PROCEDURE_NAME: &str = "PROCEDURE_NAME";
    pub const PROCEDURE_TYPE: &str = "PROCEDURE_TYPE";
    pub const COLUMN_TYPE: &str = "COLUMN_TYPE";
    pub const LENGTH: &str = "LENGTH";
    pub const SCALE: &str = "SCALE";
}

/// A single metadata field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Integer value.
    Int(i64),
    /// Text value.
    Text(String),
    /// Boolean value.
    Bool(bool),
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Int(v.into())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// One row of a metadata result, with fields addressed by label.
///
/// Labels are matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRow {
    labels: Arc<[String]>,
    values: Vec<Value>,
}

impl MetadataRow {
    /// Create a row. `values` line up with `labels`; a label without a
    /// value reads as a missing field.
    pub fn new(labels: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { labels, values }
    }

    /// Build a row from label/value pairs.
    pub fn from_pairs<I, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, V)>,
        V: Into<Value>,
    {
        let (labels, values): (Vec<String>, Vec<Value>) = pairs
            .into_iter()
            .map(|(label, value)| (label.to_string(), value.into()))
            .unzip();
        Self::new(labels.into(), values)
    }

    /// Whether the result has a field with this label.
    pub fn has_field(&self, label: &str) -> bool {
        self.position(label).is_some()
    }

    /// Raw value of a field.
    pub fn value(&self, label: &str) -> Result<&Value> {
        self.position(label)
            .and_then(|i| self.values.get(i))
            .ok_or_else(|| Error::MissingField(label.to_string()))
    }

    /// Field as text. Integers and booleans are rendered.
    pub fn get_string(&self, label: &str) -> Result<Option<String>> {
        Ok(match self.value(label)? {
            Value::Null => None,
            Value::Text(s) => Some(s.clone()),
            Value::Int(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
        })
    }

    /// Field as integer. Numeric text is parsed.
    pub fn get_int(&self, label: &str) -> Result<Option<i64>> {
        match self.value(label)? {
            Value::Null => Ok(None),
            Value::Int(n) => Ok(Some(*n)),
            Value::Bool(b) => Ok(Some(i64::from(*b))),
            Value::Text(s) => s.trim().parse().map(Some).map_err(|_| Error::FieldType {
                field: label.to_string(),
                expected: "an integer",
            }),
        }
    }

    /// Field as `i32`, `None` for NULL.
    pub fn get_opt_i32(&self, label: &str) -> Result<Option<i32>> {
        self.get_int(label)?
            .map(|value| {
                i32::try_from(value).map_err(|_| Error::FieldType {
                    field: label.to_string(),
                    expected: "a 32-bit integer",
                })
            })
            .transpose()
    }

    /// Field as `i32`, with NULL read as 0.
    pub fn get_i32(&self, label: &str) -> Result<i32> {
        Ok(self.get_opt_i32(label)?.unwrap_or(0))
    }

    /// Field as boolean: non-zero integers, `true`, `1` and `YES` are true, NULL is false.
    pub fn get_bool(&self, label: &str) -> Result<bool> {
        Ok(match self.value(label)? {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Text(s) => {
                let s = s.trim();
                s.eq_ignore_ascii_case("true") || s == "1" || s.eq_ignore_ascii_case("yes")
            }
        })
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l.eq_ignore_ascii_case(label))
    }
}

/// A stream of rows answering one metadata query.
///
/// Dropping the stream releases whatever cursor backs it.
pub trait RowStream {
    /// Next row, or `None` when the result is exhausted.
    fn next_row(&mut self) -> Result<Option<MetadataRow>>;
}

/// A row stream over rows already in memory.
pub struct VecRowStream {
    rows: std::vec::IntoIter<MetadataRow>,
}

impl VecRowStream {
    /// Wrap a list of rows.
    pub fn new(rows: Vec<MetadataRow>) -> Self {
        Self {
            rows: rows.into_iter(),
        }
    }
}

impl RowStream for VecRowStream {
    fn next_row(&mut self) -> Result<Option<MetadataRow>> {
        Ok(self.rows.next())
    }
}

/// A live database's metadata catalog.
///
/// Patterns use SQL `LIKE` syntax; [`WILDCARD`] selects everything.
pub trait MetadataSource {
    /// Database product name, e.g. `MySQL`.
    fn product_name(&self) -> Result<String>;

    /// Tables of a scope, restricted to the given table types.
    fn tables(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table_pattern: &str,
        types: &[String],
    ) -> Result<Box<dyn RowStream + '_>>;

    /// Columns of the tables in a scope.
    fn columns(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table_pattern: &str,
        column_pattern: &str,
    ) -> Result<Box<dyn RowStream + '_>>;

    /// Procedures of a scope.
    fn procedures(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        procedure_pattern: &str,
    ) -> Result<Box<dyn RowStream + '_>>;

    /// Parameters and result columns of the procedures in a scope.
    fn procedure_columns(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        procedure_pattern: &str,
        column_pattern: &str,
    ) -> Result<Box<dyn RowStream + '_>>;
}

/// SQL `LIKE` matching with `%` and `_`.
///
/// ASCII letters compare case-insensitively, as SQLite's `LIKE` does.
pub fn like_matches(pattern: &str, value: &str) -> bool {
    let p: Vec<char> = pattern.chars().map(|c| c.to_ascii_lowercase()).collect();
    let v: Vec<char> = value.chars().map(|c| c.to_ascii_lowercase()).collect();
    let (mut pi, mut vi) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while vi < v.len() {
        if pi < p.len() && (p[pi] == '_' || p[pi] == v[vi]) {
            pi += 1;
            vi += 1;
        } else if pi < p.len() && p[pi] == '%' {
            backtrack = Some((pi, vi));
            pi += 1;
        } else if let Some((bp, bv)) = backtrack {
            pi = bp + 1;
            vi = bv + 1;
            backtrack = Some((bp, bv + 1));
        } else {
            return false;
        }
    }
    p[pi..].iter().all(|&c| c == '%')
}
