//! Scripted in-memory metadata source.

use super::{fields, like_matches, MetadataRow, MetadataSource, RowStream};
use crate::error::{Error, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// The metadata query kinds a source answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// Table listing.
    Tables,
    /// Column listing.
    Columns,
    /// Procedure listing.
    Procedures,
    /// Procedure column listing.
    ProcedureColumns,
}

type ScopeKey = (QueryKind, Option<String>, Option<String>);

#[derive(Debug, Clone)]
enum Failure {
    Open(String),
    AfterRows(usize, String),
}

/// A metadata source answering from rows registered up front.
///
/// Records every query it receives and how many row streams are open, so
/// callers can check cursor usage.
#[derive(Debug, Default)]
pub struct MemoryMetadataSource {
    product_name: String,
    rows: HashMap<ScopeKey, Vec<MetadataRow>>,
    failures: HashMap<ScopeKey, Failure>,
    queries: RefCell<Vec<ScopeKey>>,
    open_streams: Rc<Cell<usize>>,
    max_open_streams: Rc<Cell<usize>>,
}

impl MemoryMetadataSource {
    /// Create an empty source reporting the given product name.
    pub fn new(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            ..Self::default()
        }
    }

    /// Register rows answering `kind` queries for a scope.
    pub fn with_rows(
        mut self,
        kind: QueryKind,
        catalog: Option<&str>,
        schema: Option<&str>,
        rows: impl IntoIterator<Item = MetadataRow>,
    ) -> Self {
        self.rows
            .entry(scope_key(kind, catalog, schema))
            .or_default()
            .extend(rows);
        self
    }

    /// Make opening a `kind` query for the scope fail.
    pub fn fail_on_open(mut self, kind: QueryKind, catalog: Option<&str>, schema: Option<&str>, message: &str) -> Self {
        self.failures
            .insert(scope_key(kind, catalog, schema), Failure::Open(message.to_string()));
        self
    }

    /// Make a `kind` stream for the scope fail after yielding `rows` rows.
    pub fn fail_after_rows(
        mut self,
        kind: QueryKind,
        catalog: Option<&str>,
        schema: Option<&str>,
        rows: usize,
        message: &str,
    ) -> Self {
        self.failures.insert(
            scope_key(kind, catalog, schema),
            Failure::AfterRows(rows, message.to_string()),
        );
        self
    }

    /// Queries received so far, in order.
    pub fn queries(&self) -> Vec<(QueryKind, Option<String>, Option<String>)> {
        self.queries.borrow().clone()
    }

    /// Row streams currently open.
    pub fn open_streams(&self) -> usize {
        self.open_streams.get()
    }

    /// Highest number of row streams open at the same time.
    pub fn max_open_streams(&self) -> usize {
        self.max_open_streams.get()
    }

    fn open(
        &self,
        kind: QueryKind,
        catalog: Option<&str>,
        schema: Option<&str>,
        keep: impl Fn(&MetadataRow) -> bool,
    ) -> Result<Box<dyn RowStream + '_>> {
        let key = scope_key(kind, catalog, schema);
        self.queries.borrow_mut().push(key.clone());

        let fail_after = match self.failures.get(&key) {
            Some(Failure::Open(message)) => return Err(Error::Source(message.clone())),
            Some(Failure::AfterRows(n, message)) => Some((*n, message.clone())),
            None => None,
        };

        let rows: Vec<MetadataRow> = self
            .rows
            .get(&key)
            .map(|rows| rows.iter().filter(|r| keep(r)).cloned().collect())
            .unwrap_or_default();

        let open = self.open_streams.get() + 1;
        self.open_streams.set(open);
        self.max_open_streams.set(self.max_open_streams.get().max(open));

        Ok(Box::new(MemoryRowStream {
            rows: rows.into_iter(),
            served: 0,
            fail_after,
            open_streams: Rc::clone(&self.open_streams),
        }))
    }
}

impl MetadataSource for MemoryMetadataSource {
    fn product_name(&self) -> Result<String> {
        Ok(self.product_name.clone())
    }

    fn tables(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table_pattern: &str,
        types: &[String],
    ) -> Result<Box<dyn RowStream + '_>> {
        self.open(QueryKind::Tables, catalog, schema, |row| {
            name_matches(row, fields::TABLE_NAME, table_pattern)
                && row
                    .get_string(fields::TABLE_TYPE)
                    .ok()
                    .flatten()
                    .map_or(true, |t| types.iter().any(|wanted| wanted.eq_ignore_ascii_case(&t)))
        })
    }

    fn columns(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table_pattern: &str,
        column_pattern: &str,
    ) -> Result<Box<dyn RowStream + '_>> {
        self.open(QueryKind::Columns, catalog, schema, |row| {
            name_matches(row, fields::TABLE_NAME, table_pattern)
                && name_matches(row, fields::COLUMN_NAME, column_pattern)
        })
    }

    fn procedures(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        procedure_pattern: &str,
    ) -> Result<Box<dyn RowStream + '_>> {
        self.open(QueryKind::Procedures, catalog, schema, |row| {
            name_matches(row, fields::PROCEDURE_NAME, procedure_pattern)
        })
    }

    fn procedure_columns(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        procedure_pattern: &str,
        column_pattern: &str,
    ) -> Result<Box<dyn RowStream + '_>> {
        self.open(QueryKind::ProcedureColumns, catalog, schema, |row| {
            name_matches(row, fields::PROCEDURE_NAME, procedure_pattern)
                && name_matches(row, fields::COLUMN_NAME, column_pattern)
        })
    }
}

struct MemoryRowStream {
    rows: std::vec::IntoIter<MetadataRow>,
    served: usize,
    fail_after: Option<(usize, String)>,
    open_streams: Rc<Cell<usize>>,
}

impl RowStream for MemoryRowStream {
    fn next_row(&mut self) -> Result<Option<MetadataRow>> {
        if let Some((limit, message)) = &self.fail_after {
            if self.served >= *limit {
                return Err(Error::Source(message.clone()));
            }
        }
        self.served += 1;
        Ok(self.rows.next())
    }
}

impl Drop for MemoryRowStream {
    fn drop(&mut self) {
        self.open_streams.set(self.open_streams.get().saturating_sub(1));
    }
}

fn scope_key(kind: QueryKind, catalog: Option<&str>, schema: Option<&str>) -> ScopeKey {
    (kind, catalog.map(String::from), schema.map(String::from))
}

// Rows without the field, or with a NULL in it, are never filtered out.
fn name_matches(row: &MetadataRow, label: &str, pattern: &str) -> bool {
    match row.get_string(label) {
        Ok(Some(name)) => like_matches(pattern, &name),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{Value, WILDCARD};

    fn column(table: &str, column: &str) -> MetadataRow {
        MetadataRow::from_pairs([
            (fields::TABLE_NAME, Value::from(table)),
            (fields::COLUMN_NAME, Value::from(column)),
        ])
    }

    fn drain(mut stream: Box<dyn RowStream + '_>) -> Result<Vec<MetadataRow>> {
        let mut rows = Vec::new();
        while let Some(row) = stream.next_row()? {
            rows.push(row);
        }
        Ok(rows)
    }

    #[test]
    fn test_rows_scoped_by_catalog_and_schema() {
        let source = MemoryMetadataSource::new("Test")
            .with_rows(QueryKind::Columns, Some("c"), Some("s"), [column("EMP", "ID")])
            .with_rows(QueryKind::Columns, Some("c"), None, [column("DEPT", "ID")]);

        let rows = drain(source.columns(Some("c"), Some("s"), WILDCARD, WILDCARD).unwrap()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get_string(fields::TABLE_NAME).unwrap().as_deref(), Some("EMP"));

        let rows = drain(source.columns(None, None, WILDCARD, WILDCARD).unwrap()).unwrap();
        assert!(rows.is_empty());
        assert_eq!(source.queries().len(), 2);
    }

    #[test]
    fn test_pattern_filtering() {
        let source = MemoryMetadataSource::new("Test").with_rows(
            QueryKind::Columns,
            None,
            None,
            [column("EMP", "ID"), column("DEPT", "ID"), column("EMP", "NAME")],
        );

        let rows = drain(source.columns(None, None, "EMP", "N%").unwrap()).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_open_stream_tracking() {
        let source = MemoryMetadataSource::new("Test");
        {
            let _a = source.columns(None, None, WILDCARD, WILDCARD).unwrap();
            let _b = source.columns(None, None, WILDCARD, WILDCARD).unwrap();
            assert_eq!(source.open_streams(), 2);
        }
        assert_eq!(source.open_streams(), 0);
        assert_eq!(source.max_open_streams(), 2);
    }

    #[test]
    fn test_scripted_failures() {
        let source = MemoryMetadataSource::new("Test")
            .with_rows(QueryKind::Columns, None, None, [column("EMP", "ID"), column("EMP", "NAME")])
            .fail_after_rows(QueryKind::Columns, None, None, 1, "cursor lost")
            .fail_on_open(QueryKind::Procedures, None, None, "no access");

        assert!(matches!(drain(source.columns(None, None, WILDCARD, WILDCARD).unwrap()), Err(Error::Source(_))));
        assert!(source.procedures(None, None, WILDCARD).is_err());
        assert_eq!(source.open_streams(), 0);
    }
}
