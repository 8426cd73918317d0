//! Column metadata into entity attributes.

use super::walker::{load_per_catalog_and_schema, PerCatalogAndSchemaLoader};
use super::TypeSizeOverrides;
use crate::adapter::DbAdapter;
use crate::error::Result;
use crate::filter::{CatalogFilter, FiltersConfig, SchemaFilter};
use crate::metadata::{fields, MetadataRow, MetadataSource, RowStream, WILDCARD};
use crate::model::{Attribute, DbLoadDataStore};
use tracing::debug;

/// Loads the attributes of entities already in the store.
pub struct AttributeLoader<'a> {
    adapter: &'a dyn DbAdapter,
    filters: &'a FiltersConfig,
    /// Whether the current pass's rows carry `IS_AUTOINCREMENT`. Decided on the first row.
    supports_auto_increment: Option<bool>,
}

impl<'a> AttributeLoader<'a> {
    /// Create a loader.
    pub fn new(adapter: &'a dyn DbAdapter, filters: &'a FiltersConfig) -> Self {
        Self {
            adapter,
            filters,
            supports_auto_increment: None,
        }
    }

    /// Load column metadata for every configured scope into `store`.
    ///
    /// Rows for tables without an entity, or for filtered-out columns, are
    /// dropped. A column reported twice keeps the values of the last row.
    pub fn load(&mut self, source: &dyn MetadataSource, store: &mut DbLoadDataStore) -> Result<()> {
        let filters = self.filters;
        load_per_catalog_and_schema(self, filters, source, store)
    }

    fn build_attribute(&self, row: &MetadataRow, column: &str, sizes: &TypeSizeOverrides) -> Result<Attribute> {
        let type_code = row.get_i32(fields::DATA_TYPE)?;

        // precision only means something for decimal types
        let precision = if self.adapter.is_decimal(type_code) {
            row.get_opt_i32(fields::DECIMAL_DIGITS)?.unwrap_or(-1)
        } else {
            -1
        };

        let type_name = row.get_string(fields::TYPE_NAME)?.unwrap_or_default();
        let column_size = row.get_opt_i32(fields::COLUMN_SIZE)?.unwrap_or(-1);
        let mut attr = self.adapter.build_attribute(
            column,
            &type_name,
            type_code,
            sizes.effective_size(&type_name, column_size),
            precision,
            row.get_bool(fields::NULLABLE)?,
        );

        if self.supports_auto_increment == Some(true)
            && row.get_string(fields::IS_AUTOINCREMENT)?.as_deref() == Some("YES")
        {
            attr.generated = true;
        }
        Ok(attr)
    }
}

impl PerCatalogAndSchemaLoader for AttributeLoader<'_> {
    fn name(&self) -> &'static str {
        "attributes"
    }

    fn begin_pass(&mut self) {
        self.supports_auto_increment = None;
    }

    fn open_rows<'s>(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        source: &'s dyn MetadataSource,
    ) -> Result<Box<dyn RowStream + 's>> {
        source.columns(catalog, schema, WILDCARD, WILDCARD)
    }

    fn process_row(
        &mut self,
        catalog: &CatalogFilter,
        schema: &SchemaFilter,
        store: &mut DbLoadDataStore,
        row: &MetadataRow,
        sizes: &TypeSizeOverrides,
    ) -> Result<()> {
        if self.supports_auto_increment.is_none() {
            self.supports_auto_increment = Some(row.has_field(fields::IS_AUTOINCREMENT));
        }

        // Some drivers report a table's columns again under a mangled name;
        // those never match an entity and fall through here.
        let Some(table) = row.get_string(fields::TABLE_NAME)? else {
            return Ok(());
        };
        if !store.has_entity(&table) {
            return Ok(());
        }

        let column = row.get_string(fields::COLUMN_NAME)?;
        let column_filter = schema.tables.include_table_column_filter(&table);
        let column = match (column, column_filter) {
            (Some(column), Some(filter)) if filter.included(&column) => column,
            (column, filter) => {
                debug!(
                    table = %table,
                    column = ?column,
                    catalog = ?catalog.name,
                    schema = ?schema.name,
                    filter = %filter.map_or_else(|| "NONE".to_string(), ToString::to_string),
                    "skip column"
                );
                return Ok(());
            }
        };

        let attribute = self.build_attribute(row, &column, sizes)?;
        if let Some(entity) = store.entity_mut(&table) {
            // replaces a same-named attribute, so the last row wins
            entity.add_attribute(attribute);
        }
        Ok(())
    }
}
