//! Procedure metadata into procedures.

use super::walker::{load_per_catalog_and_schema, PerCatalogAndSchemaLoader};
use super::TypeSizeOverrides;
use crate::error::Result;
use crate::filter::{CatalogFilter, FiltersConfig, SchemaFilter};
use crate::metadata::{fields, MetadataRow, MetadataSource, RowStream, WILDCARD};
use crate::model::{DbLoadDataStore, Procedure};
use tracing::debug;

/// Creates a procedure for every included procedure name.
pub struct ProcedureLoader<'a> {
    filters: &'a FiltersConfig,
}

impl<'a> ProcedureLoader<'a> {
    /// Create a loader.
    pub fn new(filters: &'a FiltersConfig) -> Self {
        Self { filters }
    }

    /// Load procedures for every scope with a non-empty procedure filter.
    pub fn load(&mut self, source: &dyn MetadataSource, store: &mut DbLoadDataStore) -> Result<()> {
        let filters = self.filters;
        load_per_catalog_and_schema(self, filters, source, store)
    }
}

impl PerCatalogAndSchemaLoader for ProcedureLoader<'_> {
    fn name(&self) -> &'static str {
        "procedures"
    }

    fn should_load(&self, _catalog: &CatalogFilter, schema: &SchemaFilter) -> bool {
        !schema.procedures.is_empty()
    }

    fn open_rows<'s>(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        source: &'s dyn MetadataSource,
    ) -> Result<Box<dyn RowStream + 's>> {
        source.procedures(catalog, schema, WILDCARD)
    }

    fn process_row(
        &mut self,
        _catalog: &CatalogFilter,
        schema: &SchemaFilter,
        store: &mut DbLoadDataStore,
        row: &MetadataRow,
        _sizes: &TypeSizeOverrides,
    ) -> Result<()> {
        let Some(name) = row.get_string(fields::PROCEDURE_NAME)? else {
            return Ok(());
        };
        if !schema.procedures.included(&name) {
            debug!(procedure = %name, filter = %schema.procedures, "skip procedure");
            return Ok(());
        }

        let procedure = Procedure::new(
            row.get_string(fields::PROCEDURE_CAT)?.as_deref(),
            row.get_string(fields::PROCEDURE_SCHEM)?.as_deref(),
            name,
        );
        if !store.has_procedure(&procedure.full_name()) {
            store.add_procedure(procedure);
        }
        Ok(())
    }
}
