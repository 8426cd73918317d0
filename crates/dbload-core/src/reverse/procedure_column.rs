//! Procedure column metadata into procedure call parameters.

use super::walker::{load_per_catalog_and_schema, PerCatalogAndSchemaLoader};
use super::TypeSizeOverrides;
use crate::adapter::DbAdapter;
use crate::error::Result;
use crate::filter::{CatalogFilter, FiltersConfig, SchemaFilter};
use crate::metadata::{fields, MetadataRow, MetadataSource, RowStream, WILDCARD};
use crate::model::{DbLoadDataStore, ParameterDirection, Procedure, ProcedureParameter};
use crate::types::procedure_column;
use tracing::{debug, info};

/// Name given to an unnamed return value parameter.
pub const RETURN_VALUE_NAME: &str = "_return_value";

/// Loads call parameters of procedures already in the store.
pub struct ProcedureColumnLoader<'a> {
    adapter: &'a dyn DbAdapter,
    filters: &'a FiltersConfig,
}

impl<'a> ProcedureColumnLoader<'a> {
    /// Create a loader.
    pub fn new(adapter: &'a dyn DbAdapter, filters: &'a FiltersConfig) -> Self {
        Self { adapter, filters }
    }

    /// Load procedure parameters for every configured scope into `store`.
    ///
    /// Parameters are appended. Loading twice into the same store
    /// duplicates them.
    pub fn load(&mut self, source: &dyn MetadataSource, store: &mut DbLoadDataStore) -> Result<()> {
        let filters = self.filters;
        load_per_catalog_and_schema(self, filters, source, store)
    }
}

/// Direction for a `COLUMN_TYPE` value.
pub fn direction_for(kind: i16) -> ParameterDirection {
    match kind {
        procedure_column::IN => ParameterDirection::In,
        procedure_column::IN_OUT => ParameterDirection::InOut,
        procedure_column::OUT => ParameterDirection::Out,
        _ => ParameterDirection::Unknown,
    }
}

impl PerCatalogAndSchemaLoader for ProcedureColumnLoader<'_> {
    fn name(&self) -> &'static str {
        "procedure columns"
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
        source.procedure_columns(catalog, schema, WILDCARD, WILDCARD)
    }

    fn process_row(
        &mut self,
        _catalog: &CatalogFilter,
        _schema: &SchemaFilter,
        store: &mut DbLoadDataStore,
        row: &MetadataRow,
        _sizes: &TypeSizeOverrides,
    ) -> Result<()> {
        let Some(name) = row.get_string(fields::PROCEDURE_NAME)? else {
            return Ok(());
        };
        let key = Procedure::fully_qualified_name(
            row.get_string(fields::PROCEDURE_CAT)?.as_deref(),
            row.get_string(fields::PROCEDURE_SCHEM)?.as_deref(),
            &name,
        );
        let Some(procedure) = store.procedure_mut(&key) else {
            return Ok(());
        };

        let column_name = row.get_string(fields::COLUMN_NAME)?;
        let kind = row
            .get_opt_i32(fields::COLUMN_TYPE)?
            .and_then(|k| i16::try_from(k).ok())
            .unwrap_or(procedure_column::UNKNOWN);

        // result set columns are not call parameters
        if kind == procedure_column::RESULT {
            debug!(procedure = %key, column = ?column_name, "skipping result set column");
            return Ok(());
        }

        let column_name = match column_name {
            Some(column_name) => column_name,
            None if kind == procedure_column::RETURN => {
                debug!(procedure = %key, "null column name, assuming return value");
                procedure.returning_value = true;
                RETURN_VALUE_NAME.to_string()
            }
            None => {
                info!(procedure = %key, kind, "invalid null column name, skipping column");
                return Ok(());
            }
        };

        let type_code = row.get_i32(fields::DATA_TYPE)?;
        let precision = if self.adapter.is_decimal(type_code) {
            row.get_opt_i32(fields::SCALE)?.unwrap_or(-1)
        } else {
            -1
        };

        procedure.add_call_parameter(ProcedureParameter {
            name: column_name,
            direction: direction_for(kind),
            type_code,
            max_length: row.get_opt_i32(fields::LENGTH)?.unwrap_or(-1),
            precision,
            procedure: key,
        });
        Ok(())
    }
}
