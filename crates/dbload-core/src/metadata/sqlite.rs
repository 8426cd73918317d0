//! SQLite metadata source.
//!
//! SQLite has no driver-level metadata catalog, so rows in the usual
//! metadata shape are synthesized from `sqlite_master` and
//! `pragma_table_info`. Schemas map to attached database names (`main`
//! when none is given). There are no stored procedures.

use super::{fields, MetadataRow, MetadataSource, RowStream, Value, VecRowStream};
use crate::error::Result;
use crate::types;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Product name reported by [`SqliteMetadataSource`].
pub const PRODUCT_NAME: &str = "SQLite";

const DEFAULT_SCHEMA: &str = "main";

/// Metadata source reading an SQLite database.
pub struct SqliteMetadataSource {
    conn: Connection,
}

impl SqliteMetadataSource {
    /// Wrap an open connection.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Connection::open(path)?))
    }
}

impl MetadataSource for SqliteMetadataSource {
    fn product_name(&self) -> Result<String> {
        Ok(PRODUCT_NAME.to_string())
    }

    fn tables(
        &self,
        _catalog: Option<&str>,
        schema: Option<&str>,
        table_pattern: &str,
        table_types: &[String],
    ) -> Result<Box<dyn RowStream + '_>> {
        let sql = format!(
            "SELECT name, type FROM {} \
             WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' \
             AND name LIKE ?1 ORDER BY name",
            master_table(schema)
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let found = stmt
            .query_map(params![table_pattern], |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let labels = labels(&[
            fields::TABLE_CAT,
            fields::TABLE_SCHEM,
            fields::TABLE_NAME,
            fields::TABLE_TYPE,
        ]);
        let rows = found
            .into_iter()
            .map(|(name, kind)| (name, kind.to_ascii_uppercase()))
            .filter(|(_, kind)| table_types.iter().any(|t| t.eq_ignore_ascii_case(kind)))
            .map(|(name, kind)| {
                MetadataRow::new(
                    Arc::clone(&labels),
                    vec![Value::Null, Value::from(schema), Value::from(name), Value::from(kind)],
                )
            })
            .collect::<Vec<_>>();

        debug!(schema = ?schema, tables = rows.len(), "read sqlite tables");
        Ok(Box::new(VecRowStream::new(rows)))
    }

    fn columns(
        &self,
        _catalog: Option<&str>,
        schema: Option<&str>,
        table_pattern: &str,
        column_pattern: &str,
    ) -> Result<Box<dyn RowStream + '_>> {
        let sql = format!(
            "SELECT m.name, p.name, p.type, p.\"notnull\", p.pk, m.sql \
             FROM {} AS m JOIN pragma_table_info(m.name, ?3) AS p \
             WHERE m.type IN ('table', 'view') AND m.name NOT LIKE 'sqlite\\_%' ESCAPE '\\' \
             AND m.name LIKE ?1 AND p.name LIKE ?2 \
             ORDER BY m.name, p.cid",
            master_table(schema)
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let found = stmt
            .query_map(
                params![table_pattern, column_pattern, schema.unwrap_or(DEFAULT_SCHEMA)],
                |r| {
                    Ok(SqliteColumn {
                        table: r.get(0)?,
                        name: r.get(1)?,
                        declared_type: r.get::<_, Option<String>>(2)?.unwrap_or_default(),
                        not_null: r.get::<_, i64>(3)? != 0,
                        primary_key: r.get::<_, i64>(4)? != 0,
                        table_sql: r.get::<_, Option<String>>(5)?.unwrap_or_default(),
                    })
                },
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let labels = labels(&[
            fields::TABLE_CAT,
            fields::TABLE_SCHEM,
            fields::TABLE_NAME,
            fields::COLUMN_NAME,
            fields::DATA_TYPE,
            fields::TYPE_NAME,
            fields::COLUMN_SIZE,
            fields::DECIMAL_DIGITS,
            fields::NULLABLE,
            fields::IS_AUTOINCREMENT,
        ]);
        let rows = found
            .into_iter()
            .map(|col| {
                let declared = DeclaredType::parse(&col.declared_type);
                let auto_increment = col.primary_key
                    && declared.name == "INTEGER"
                    && col.table_sql.to_ascii_uppercase().contains("AUTOINCREMENT");
                MetadataRow::new(
                    Arc::clone(&labels),
                    vec![
                        Value::Null,
                        Value::from(schema),
                        Value::from(col.table),
                        Value::from(col.name),
                        Value::from(declared.type_code()),
                        Value::from(declared.name),
                        Value::from(declared.size),
                        Value::from(declared.digits),
                        Value::from(if col.not_null { 0i32 } else { 1i32 }),
                        Value::from(if auto_increment { "YES" } else { "NO" }),
                    ],
                )
            })
            .collect::<Vec<_>>();

        debug!(schema = ?schema, columns = rows.len(), "read sqlite columns");
        Ok(Box::new(VecRowStream::new(rows)))
    }

    fn procedures(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
        _procedure_pattern: &str,
    ) -> Result<Box<dyn RowStream + '_>> {
        Ok(Box::new(VecRowStream::new(Vec::new())))
    }

    fn procedure_columns(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
        _procedure_pattern: &str,
        _column_pattern: &str,
    ) -> Result<Box<dyn RowStream + '_>> {
        Ok(Box::new(VecRowStream::new(Vec::new())))
    }
}

struct SqliteColumn {
    table: String,
    name: String,
    declared_type: String,
    not_null: bool,
    primary_key: bool,
    table_sql: String,
}

/// A column type as declared in `CREATE TABLE`, e.g. `DECIMAL(10,2)`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DeclaredType {
    name: String,
    size: Option<i64>,
    digits: Option<i64>,
}

impl DeclaredType {
    fn parse(declared: &str) -> Self {
        let declared = declared.trim();
        let (name, args) = match declared.find('(') {
            Some(open) => (&declared[..open], declared[open + 1..].trim_end_matches(')')),
            None => (declared, ""),
        };
        let mut args = args.split(',').map(|a| a.trim().parse::<i64>().ok());
        Self {
            name: name.trim().to_ascii_uppercase(),
            size: args.next().flatten(),
            digits: args.next().flatten(),
        }
    }

    // Exact names first, then SQLite's affinity rules.
    fn type_code(&self) -> i32 {
        let name = self.name.as_str();
        match name {
            "BIGINT" => return types::BIGINT,
            "SMALLINT" => return types::SMALLINT,
            "TINYINT" => return types::TINYINT,
            "DECIMAL" => return types::DECIMAL,
            "NUMERIC" => return types::NUMERIC,
            "REAL" => return types::REAL,
            "FLOAT" => return types::FLOAT,
            "DOUBLE" | "DOUBLE PRECISION" => return types::DOUBLE,
            "BOOLEAN" | "BOOL" => return types::BOOLEAN,
            "DATE" => return types::DATE,
            "TIME" => return types::TIME,
            "DATETIME" | "TIMESTAMP" => return types::TIMESTAMP,
            "CHAR" | "CHARACTER" | "NCHAR" => return types::CHAR,
            "CLOB" => return types::CLOB,
            "" => return types::OTHER,
            _ => {}
        }
        if name.contains("INT") {
            types::INTEGER
        } else if name.contains("CHAR") || name.contains("TEXT") || name.contains("CLOB") {
            types::VARCHAR
        } else if name.contains("BLOB") {
            types::BLOB
        } else if name.contains("REAL") || name.contains("FLOA") || name.contains("DOUB") {
            types::DOUBLE
        } else {
            types::OTHER
        }
    }
}

fn labels(names: &[&str]) -> Arc<[String]> {
    names.iter().map(|n| n.to_string()).collect()
}

fn master_table(schema: Option<&str>) -> String {
    let db = schema.unwrap_or(DEFAULT_SCHEMA);
    format!("\"{}\".sqlite_master", db.replace('"', "\"\""))
}
