//! Table metadata into entities.

use super::walker::{load_per_catalog_and_schema, PerCatalogAndSchemaLoader};
use super::TypeSizeOverrides;
use crate::error::Result;
use crate::filter::{CatalogFilter, FiltersConfig, SchemaFilter};
use crate::metadata::{fields, MetadataRow, MetadataSource, RowStream, WILDCARD};
use crate::model::{DbLoadDataStore, Entity};
use tracing::debug;

/// Creates an entity for every included table.
pub struct EntityLoader<'a> {
    filters: &'a FiltersConfig,
    table_types: &'a [String],
}

impl<'a> EntityLoader<'a> {
    /// Create a loader reading tables of the given types.
    pub fn new(filters: &'a FiltersConfig, table_types: &'a [String]) -> Self {
        Self { filters, table_types }
    }

    /// Load tables for every configured scope into `store`.
    pub fn load(&mut self, source: &dyn MetadataSource, store: &mut DbLoadDataStore) -> Result<()> {
        let filters = self.filters;
        load_per_catalog_and_schema(self, filters, source, store)
    }
}

impl PerCatalogAndSchemaLoader for EntityLoader<'_> {
    fn name(&self) -> &'static str {
        "entities"
    }

    fn open_rows<'s>(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        source: &'s dyn MetadataSource,
    ) -> Result<Box<dyn RowStream + 's>> {
        source.tables(catalog, schema, WILDCARD, self.table_types)
    }

    fn process_row(
        &mut self,
        _catalog: &CatalogFilter,
        schema: &SchemaFilter,
        store: &mut DbLoadDataStore,
        row: &MetadataRow,
        _sizes: &TypeSizeOverrides,
    ) -> Result<()> {
        let Some(table) = row.get_string(fields::TABLE_NAME)? else {
            return Ok(());
        };
        if !schema.tables.is_include_table(&table) {
            debug!(table = %table, schema = ?schema.name, "skip table");
            return Ok(());
        }
        if store.has_entity(&table) {
            return Ok(());
        }

        let entity = Entity::new(table).in_scope(
            row.get_string(fields::TABLE_CAT)?.as_deref(),
            row.get_string(fields::TABLE_SCHEM)?.as_deref(),
        );
        store.add_entity(entity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{IncludeTableFilter, PatternFilter, TableFilter};
    use crate::metadata::{MemoryMetadataSource, QueryKind, Value};

    fn table_row(name: &str, kind: &str) -> MetadataRow {
        MetadataRow::from_pairs([
            (fields::TABLE_CAT, Value::Null),
            (fields::TABLE_SCHEM, Value::from("hr")),
            (fields::TABLE_NAME, Value::from(name)),
            (fields::TABLE_TYPE, Value::from(kind)),
        ])
    }

    fn source() -> MemoryMetadataSource {
        MemoryMetadataSource::new("Test").with_rows(
            QueryKind::Tables,
            None,
            Some("hr"),
            [
                table_row("EMP", "TABLE"),
                table_row("AUDIT_LOG", "TABLE"),
                table_row("EMP_V", "VIEW"),
                table_row("EMP_IDX", "INDEX"),
            ],
        )
    }

    fn hr_filters(tables: TableFilter) -> FiltersConfig {
        FiltersConfig::new(vec![CatalogFilter::new(
            None,
            vec![SchemaFilter::new(Some("hr"), tables, PatternFilter::nothing())],
        )])
    }

    fn default_types() -> Vec<String> {
        vec!["TABLE".to_string(), "VIEW".to_string()]
    }

    #[test]
    fn test_loads_tables_and_views() {
        let filters = hr_filters(TableFilter::everything());
        let types = default_types();
        let mut store = DbLoadDataStore::new();

        EntityLoader::new(&filters, &types).load(&source(), &mut store).unwrap();

        let names: Vec<_> = store.entities().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["EMP", "AUDIT_LOG", "EMP_V"]);
        assert_eq!(store.entity("EMP").unwrap().schema.as_deref(), Some("hr"));
        assert_eq!(store.entity("EMP").unwrap().catalog, None);
    }

    #[test]
    fn test_excluded_table_skipped() {
        let tables = TableFilter::new(vec![IncludeTableFilter::all()], vec!["AUDIT_.*"]).unwrap();
        let filters = hr_filters(tables);
        let types = vec!["TABLE".to_string()];
        let mut store = DbLoadDataStore::new();

        EntityLoader::new(&filters, &types).load(&source(), &mut store).unwrap();

        let names: Vec<_> = store.entities().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["EMP"]);
    }

    #[test]
    fn test_existing_entity_kept() {
        let filters = hr_filters(TableFilter::everything());
        let types = default_types();
        let mut store = DbLoadDataStore::new();
        let mut emp = Entity::new("EMP");
        emp.add_attribute(crate::model::Attribute::new("ID", "INTEGER", crate::types::INTEGER));
        store.add_entity(emp);

        EntityLoader::new(&filters, &types).load(&source(), &mut store).unwrap();

        assert_eq!(store.entity("EMP").unwrap().attribute_count(), 1);
        assert_eq!(store.entities().count(), 3);
    }
}
