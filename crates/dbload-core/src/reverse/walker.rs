//! Shared catalog/schema walk driving every loader pass.

use super::TypeSizeOverrides;
use crate::error::Result;
use crate::filter::{CatalogFilter, FiltersConfig, SchemaFilter};
use crate::metadata::{MetadataRow, MetadataSource, RowStream};
use crate::model::DbLoadDataStore;
use tracing::debug;

/// A loader pass run once per configured catalog/schema scope.
pub trait PerCatalogAndSchemaLoader {
    /// Pass name used in logs.
    fn name(&self) -> &'static str;

    /// Reset per-pass state. Called before the first scope of every load.
    fn begin_pass(&mut self) {}

    /// Whether the scope should be queried at all.
    fn should_load(&self, _catalog: &CatalogFilter, _schema: &SchemaFilter) -> bool {
        true
    }

    /// Open the metadata query for one scope.
    fn open_rows<'s>(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        source: &'s dyn MetadataSource,
    ) -> Result<Box<dyn RowStream + 's>>;

    /// Handle one row of the scope's result.
    fn process_row(
        &mut self,
        catalog: &CatalogFilter,
        schema: &SchemaFilter,
        store: &mut DbLoadDataStore,
        row: &MetadataRow,
        sizes: &TypeSizeOverrides,
    ) -> Result<()>;
}

/// Run a loader over every configured scope.
///
/// Scopes are visited in configuration order and rows are handled in the
/// order the source returns them. Each scope's row stream is dropped before
/// the next scope is opened. The first failure aborts the walk with an
/// error naming the scope.
pub fn load_per_catalog_and_schema<L>(
    loader: &mut L,
    filters: &FiltersConfig,
    source: &dyn MetadataSource,
    store: &mut DbLoadDataStore,
) -> Result<()>
where
    L: PerCatalogAndSchemaLoader + ?Sized,
{
    let product = source.product_name()?;
    let sizes = TypeSizeOverrides::for_product(&product);
    loader.begin_pass();

    for catalog in filters.catalogs() {
        for schema in &catalog.schemas {
            let (catalog_name, schema_name) = (catalog.name.as_deref(), schema.name.as_deref());
            if !loader.should_load(catalog, schema) {
                debug!(pass = loader.name(), catalog = ?catalog_name, schema = ?schema_name, "scope skipped");
                continue;
            }

            let rows = load_scope(loader, catalog, schema, source, store, &sizes)
                .map_err(|e| e.in_scope(catalog_name, schema_name))?;
            debug!(pass = loader.name(), catalog = ?catalog_name, schema = ?schema_name, rows, "scope loaded");
        }
    }
    Ok(())
}

fn load_scope<L>(
    loader: &mut L,
    catalog: &CatalogFilter,
    schema: &SchemaFilter,
    source: &dyn MetadataSource,
    store: &mut DbLoadDataStore,
    sizes: &TypeSizeOverrides,
) -> Result<usize>
where
    L: PerCatalogAndSchemaLoader + ?Sized,
{
    let mut stream = loader.open_rows(catalog.name.as_deref(), schema.name.as_deref(), source)?;
    let mut count = 0;
    while let Some(row) = stream.next_row()? {
        loader.process_row(catalog, schema, store, &row, sizes)?;
        count += 1;
    }
    Ok(count)
}
