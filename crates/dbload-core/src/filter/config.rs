//! Nested catalog/schema/table filter configuration.

use super::PatternFilter;
use crate::error::ConfigError;

/// A table include rule with the column filter that applies to its tables.
#[derive(Debug, Clone)]
pub struct IncludeTableFilter {
    tables: PatternFilter,
    /// Filter applied to the columns of matching tables.
    pub columns: PatternFilter,
}

impl IncludeTableFilter {
    /// Include tables matching `pattern` with every column.
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            tables: PatternFilter::everything().include(pattern)?,
            columns: PatternFilter::everything(),
        })
    }

    /// Include every table with every column.
    pub fn all() -> Self {
        Self {
            tables: PatternFilter::everything(),
            columns: PatternFilter::everything(),
        }
    }

    /// Replace the column filter.
    pub fn with_columns(mut self, columns: PatternFilter) -> Self {
        self.columns = columns;
        self
    }

    /// Whether this rule covers the table.
    pub fn matches(&self, table: &str) -> bool {
        self.tables.included(table)
    }
}

/// Table and column rules of one schema.
#[derive(Debug, Clone)]
pub struct TableFilter {
    includes: Vec<IncludeTableFilter>,
    excludes: PatternFilter,
}

impl TableFilter {
    /// Create a table filter. An excludes filter with no rules excludes nothing.
    pub fn new(includes: Vec<IncludeTableFilter>, excludes: Vec<&str>) -> Result<Self, ConfigError> {
        let excludes = if excludes.is_empty() {
            PatternFilter::nothing()
        } else {
            PatternFilter::from_patterns(excludes, Vec::<&str>::new())?
        };
        Ok(Self { includes, excludes })
    }

    /// Include every table and column.
    pub fn everything() -> Self {
        Self {
            includes: vec![IncludeTableFilter::all()],
            excludes: PatternFilter::nothing(),
        }
    }

    /// Whether the table is in scope.
    pub fn is_include_table(&self, table: &str) -> bool {
        self.include_table_column_filter(table).is_some()
    }

    /// Column filter for a table, or `None` when the table is not in scope.
    ///
    /// The first include rule matching the table wins.
    pub fn include_table_column_filter(&self, table: &str) -> Option<&PatternFilter> {
        if self.excludes.included(table) {
            return None;
        }
        self.includes
            .iter()
            .find(|include| include.matches(table))
            .map(|include| &include.columns)
    }
}

impl Default for TableFilter {
    fn default() -> Self {
        Self::everything()
    }
}

/// Filters for one schema within a catalog.
#[derive(Debug, Clone)]
pub struct SchemaFilter {
    /// Schema name, `None` for databases without schemas.
    pub name: Option<String>,
    /// Table and column rules.
    pub tables: TableFilter,
    /// Procedure name rules.
    pub procedures: PatternFilter,
}

impl SchemaFilter {
    /// Create a schema filter.
    pub fn new(name: Option<&str>, tables: TableFilter, procedures: PatternFilter) -> Self {
        Self {
            name: name.map(String::from),
            tables,
            procedures,
        }
    }

    /// Include every table, column and procedure.
    pub fn everything(name: Option<&str>) -> Self {
        Self::new(name, TableFilter::everything(), PatternFilter::everything())
    }
}

/// Filters for one catalog.
#[derive(Debug, Clone)]
pub struct CatalogFilter {
    /// Catalog name, `None` for databases without catalogs.
    pub name: Option<String>,
    /// Schemas to walk, in order.
    pub schemas: Vec<SchemaFilter>,
}

impl CatalogFilter {
    /// Create a catalog filter.
    pub fn new(name: Option<&str>, schemas: Vec<SchemaFilter>) -> Self {
        Self {
            name: name.map(String::from),
            schemas,
        }
    }
}

/// The full set of catalogs and schemas a load walks.
#[derive(Debug, Clone)]
pub struct FiltersConfig {
    catalogs: Vec<CatalogFilter>,
}

impl FiltersConfig {
    /// Create from an ordered list of catalogs.
    pub fn new(catalogs: Vec<CatalogFilter>) -> Self {
        Self { catalogs }
    }

    /// A single unnamed catalog and schema including everything.
    pub fn everything() -> Self {
        Self::new(vec![CatalogFilter::new(None, vec![SchemaFilter::everything(None)])])
    }

    /// Configured catalogs in order.
    pub fn catalogs(&self) -> &[CatalogFilter] {
        &self.catalogs
    }

    /// Find the schema filter for a catalog/schema pair.
    pub fn schema_filter(&self, catalog: Option<&str>, schema: Option<&str>) -> Option<&SchemaFilter> {
        self.catalogs
            .iter()
            .filter(|c| c.name.as_deref() == catalog)
            .flat_map(|c| c.schemas.iter())
            .find(|s| s.name.as_deref() == schema)
    }

    /// Table filter for a catalog/schema pair.
    pub fn table_filter(&self, catalog: Option<&str>, schema: Option<&str>) -> Option<&TableFilter> {
        self.schema_filter(catalog, schema).map(|s| &s.tables)
    }

    /// Procedure filter for a catalog/schema pair. `None` means nothing is in scope.
    pub fn procedures_filter(&self, catalog: Option<&str>, schema: Option<&str>) -> Option<&PatternFilter> {
        self.schema_filter(catalog, schema).map(|s| &s.procedures)
    }
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self::everything()
    }
}
