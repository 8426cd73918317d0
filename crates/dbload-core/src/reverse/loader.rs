//! Full reverse-engineering run.

use super::{AttributeLoader, EntityLoader, ProcedureColumnLoader, ProcedureLoader};
use crate::adapter::DbAdapter;
use crate::config::DEFAULT_TABLE_TYPES;
use crate::error::Result;
use crate::filter::FiltersConfig;
use crate::metadata::MetadataSource;
use crate::model::DbLoadDataStore;
use tracing::info;

/// Runs the entity, attribute, procedure and procedure column passes.
pub struct DbLoader<'a> {
    adapter: &'a dyn DbAdapter,
    filters: &'a FiltersConfig,
    table_types: Vec<String>,
}

impl<'a> DbLoader<'a> {
    /// Create a loader reading the default table types.
    pub fn new(adapter: &'a dyn DbAdapter, filters: &'a FiltersConfig) -> Self {
        Self {
            adapter,
            filters,
            table_types: DEFAULT_TABLE_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Restrict the entity pass to these table types.
    pub fn with_table_types(mut self, table_types: Vec<String>) -> Self {
        self.table_types = table_types;
        self
    }

    /// Load everything the filters select into `store`.
    ///
    /// Passes run one after the other; the first failure stops the run and
    /// leaves whatever earlier passes added in the store.
    pub fn load(&self, source: &dyn MetadataSource, store: &mut DbLoadDataStore) -> Result<()> {
        EntityLoader::new(self.filters, &self.table_types).load(source, store)?;
        AttributeLoader::new(self.adapter, self.filters).load(source, store)?;
        ProcedureLoader::new(self.filters).load(source, store)?;
        ProcedureColumnLoader::new(self.adapter, self.filters).load(source, store)?;

        info!(
            entities = store.entities().count(),
            attributes = store.entities().map(|e| e.attribute_count()).sum::<usize>(),
            procedures = store.procedures().count(),
            "metadata loaded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::JdbcAdapter;
    use crate::filter::{CatalogFilter, PatternFilter, SchemaFilter, TableFilter};
    use crate::metadata::{fields, MemoryMetadataSource, MetadataRow, QueryKind, Value};
    use crate::types::{self, procedure_column};

    fn source() -> MemoryMetadataSource {
        MemoryMetadataSource::new("Test")
            .with_rows(
                QueryKind::Tables,
                None,
                None,
                [
                    MetadataRow::from_pairs([
                        (fields::TABLE_CAT, Value::Null),
                        (fields::TABLE_SCHEM, Value::Null),
                        (fields::TABLE_NAME, Value::from("EMP")),
                        (fields::TABLE_TYPE, Value::from("TABLE")),
                    ]),
                    MetadataRow::from_pairs([
                        (fields::TABLE_CAT, Value::Null),
                        (fields::TABLE_SCHEM, Value::Null),
                        (fields::TABLE_NAME, Value::from("EMP_V")),
                        (fields::TABLE_TYPE, Value::from("VIEW")),
                    ]),
                ],
            )
            .with_rows(
                QueryKind::Columns,
                None,
                None,
                [MetadataRow::from_pairs([
                    (fields::TABLE_NAME, Value::from("EMP")),
                    (fields::COLUMN_NAME, Value::from("ID")),
                    (fields::DATA_TYPE, Value::from(types::INTEGER)),
                    (fields::TYPE_NAME, Value::from("INTEGER")),
                    (fields::COLUMN_SIZE, Value::from(10i32)),
                    (fields::DECIMAL_DIGITS, Value::Null),
                    (fields::NULLABLE, Value::from(0i32)),
                ])],
            )
            .with_rows(
                QueryKind::Procedures,
                None,
                None,
                [MetadataRow::from_pairs([
                    (fields::PROCEDURE_CAT, Value::Null),
                    (fields::PROCEDURE_SCHEM, Value::Null),
                    (fields::PROCEDURE_NAME, Value::from("bump")),
                ])],
            )
            .with_rows(
                QueryKind::ProcedureColumns,
                None,
                None,
                [MetadataRow::from_pairs([
                    (fields::PROCEDURE_CAT, Value::Null),
                    (fields::PROCEDURE_SCHEM, Value::Null),
                    (fields::PROCEDURE_NAME, Value::from("bump")),
                    (fields::COLUMN_NAME, Value::from("n")),
                    (fields::COLUMN_TYPE, Value::from(procedure_column::IN)),
                    (fields::DATA_TYPE, Value::from(types::INTEGER)),
                    (fields::LENGTH, Value::Null),
                    (fields::SCALE, Value::Null),
                ])],
            )
    }

    #[test]
    fn test_runs_all_passes() {
        let adapter = JdbcAdapter;
        let filters = FiltersConfig::everything();
        let mut store = DbLoadDataStore::new();

        DbLoader::new(&adapter, &filters).load(&source(), &mut store).unwrap();

        assert_eq!(store.entities().count(), 2);
        assert_eq!(store.entity("EMP").unwrap().attribute("ID").unwrap().max_length, 10);
        let bump = store.procedure("bump").unwrap();
        assert_eq!(bump.parameters.len(), 1);
        assert_eq!(bump.parameters[0].max_length, -1);
    }

    #[test]
    fn test_table_types_restrict_entities() {
        let adapter = JdbcAdapter;
        let filters = FiltersConfig::new(vec![CatalogFilter::new(
            None,
            vec![SchemaFilter::new(None, TableFilter::everything(), PatternFilter::nothing())],
        )]);
        let mut store = DbLoadDataStore::new();

        DbLoader::new(&adapter, &filters)
            .with_table_types(vec!["VIEW".to_string()])
            .load(&source(), &mut store)
            .unwrap();

        let names: Vec<_> = store.entities().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["EMP_V"]);
        assert_eq!(store.procedures().count(), 0);
    }
}
