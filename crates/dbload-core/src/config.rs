//! Loader configuration file format.
//!
//! A JSON document describing which catalogs, schemas, tables, columns and
//! procedures are in scope:
//!
//! ```json
//! {
//!   "table_types": ["TABLE"],
//!   "catalogs": [{
//!     "name": "shop",
//!     "schemas": [{
//!       "name": "public",
//!       "include_tables": [{ "pattern": "ORDER.*", "exclude_columns": ["INTERNAL_.*"] }],
//!       "exclude_tables": ["ORDER_AUDIT"],
//!       "include_procedures": ["sp_.*"]
//!     }]
//!   }]
//! }
//! ```
//!
//! Rules given at the top level apply to every catalog, and rules given on
//! a catalog apply to every schema it lists (or to its implicit unnamed
//! schema when it lists none). Table includes from an outer level come
//! first; exclude and procedure patterns are combined. Unknown keys are
//! rejected at every level.

use crate::error::ConfigError;
use crate::filter::{CatalogFilter, FiltersConfig, IncludeTableFilter, PatternFilter, SchemaFilter, TableFilter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Keys left over after the known fields of a level are read.
type Extra = BTreeMap<String, serde_json::Value>;

/// Table types loaded when the config names none.
pub const DEFAULT_TABLE_TYPES: &[&str] = &["TABLE", "VIEW"];

/// Top-level loader configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Table types to load (`TABLE`, `VIEW`, ...).
    pub table_types: Vec<String>,
    /// Catalogs to walk.
    pub catalogs: Vec<CatalogConfig>,
    /// Rules applied to every catalog and schema.
    #[serde(flatten)]
    pub rules: FilterRules,
    #[serde(flatten, skip_serializing_if = "BTreeMap::is_empty")]
    unknown: Extra,
}

/// One catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog name.
    pub name: Option<String>,
    /// Schemas to walk.
    pub schemas: Vec<SchemaConfig>,
    /// Rules applied to every schema of the catalog.
    #[serde(flatten)]
    pub rules: FilterRules,
    #[serde(flatten, skip_serializing_if = "BTreeMap::is_empty")]
    unknown: Extra,
}

/// One schema entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Schema name.
    pub name: Option<String>,
    /// Table, column and procedure rules.
    #[serde(flatten)]
    pub rules: FilterRules,
    #[serde(flatten, skip_serializing_if = "BTreeMap::is_empty")]
    unknown: Extra,
}

/// Table, column and procedure rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterRules {
    /// Table include rules. None means every table.
    pub include_tables: Vec<IncludeTableConfig>,
    /// Table exclude patterns.
    pub exclude_tables: Vec<String>,
    /// Procedure include patterns.
    pub include_procedures: Vec<String>,
    /// Procedure exclude patterns.
    pub exclude_procedures: Vec<String>,
}

/// A table include rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IncludeTableConfig {
    /// Table name pattern.
    pub pattern: String,
    /// Column include patterns.
    pub include_columns: Vec<String>,
    /// Column exclude patterns.
    pub exclude_columns: Vec<String>,
}

impl LoaderConfig {
    /// Read a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse a JSON config document, rejecting unknown keys.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Table types to load, falling back to [`DEFAULT_TABLE_TYPES`].
    pub fn table_types(&self) -> Vec<String> {
        if self.table_types.is_empty() {
            DEFAULT_TABLE_TYPES.iter().map(|t| t.to_string()).collect()
        } else {
            self.table_types.clone()
        }
    }

    /// Check for keys the format does not know, at every level.
    pub fn validate(&self) -> Result<(), ConfigError> {
        reject_unknown("config", &self.unknown)?;
        for catalog in &self.catalogs {
            let at = format!("catalog {}", catalog.name.as_deref().unwrap_or("<none>"));
            reject_unknown(&at, &catalog.unknown)?;
            for schema in &catalog.schemas {
                let at = format!("{at} schema {}", schema.name.as_deref().unwrap_or("<none>"));
                reject_unknown(&at, &schema.unknown)?;
            }
        }
        Ok(())
    }

    /// Compile the patterns into filters.
    ///
    /// Rules given at the top level and on a catalog are pushed down into
    /// every schema below them.
    pub fn compile(&self) -> Result<FiltersConfig, ConfigError> {
        if self.catalogs.is_empty() {
            let schema = self.rules.compile(None)?;
            return Ok(FiltersConfig::new(vec![CatalogFilter::new(None, vec![schema])]));
        }

        let mut catalogs = Vec::with_capacity(self.catalogs.len());
        for catalog in &self.catalogs {
            let catalog_rules = self.rules.merged(&catalog.rules);
            let schemas = if catalog.schemas.is_empty() {
                vec![catalog_rules.compile(None)?]
            } else {
                catalog
                    .schemas
                    .iter()
                    .map(|s| catalog_rules.merged(&s.rules).compile(s.name.as_deref()))
                    .collect::<Result<Vec<_>, _>>()?
            };
            catalogs.push(CatalogFilter::new(catalog.name.as_deref(), schemas));
        }
        Ok(FiltersConfig::new(catalogs))
    }
}

impl FilterRules {
    /// These rules followed by a child's: includes appended, excludes and
    /// procedure patterns unioned.
    fn merged(&self, child: &FilterRules) -> FilterRules {
        fn union<T: Clone + PartialEq>(parent: &[T], child: &[T]) -> Vec<T> {
            let mut all = parent.to_vec();
            for item in child {
                if !all.contains(item) {
                    all.push(item.clone());
                }
            }
            all
        }

        FilterRules {
            include_tables: union(&self.include_tables, &child.include_tables),
            exclude_tables: union(&self.exclude_tables, &child.exclude_tables),
            include_procedures: union(&self.include_procedures, &child.include_procedures),
            exclude_procedures: union(&self.exclude_procedures, &child.exclude_procedures),
        }
    }

    fn compile(&self, schema: Option<&str>) -> Result<SchemaFilter, ConfigError> {
        let includes = if self.include_tables.is_empty() {
            vec![IncludeTableFilter::all()]
        } else {
            self.include_tables
                .iter()
                .map(|t| {
                    let columns = PatternFilter::from_patterns(&t.include_columns, &t.exclude_columns)?;
                    Ok(IncludeTableFilter::new(&t.pattern)?.with_columns(columns))
                })
                .collect::<Result<Vec<_>, ConfigError>>()?
        };
        let tables = TableFilter::new(includes, self.exclude_tables.iter().map(String::as_str).collect())?;

        // procedures are opt-in
        let procedures = if self.include_procedures.is_empty() && self.exclude_procedures.is_empty() {
            PatternFilter::nothing()
        } else {
            PatternFilter::from_patterns(&self.include_procedures, &self.exclude_procedures)?
        };

        Ok(SchemaFilter::new(schema, tables, procedures))
    }
}

fn reject_unknown(at: &str, unknown: &Extra) -> Result<(), ConfigError> {
    match unknown.keys().next() {
        Some(key) => Err(ConfigError::UnknownKey {
            key: key.clone(),
            at: at.to_string(),
        }),
        None => Ok(()),
    }
}
