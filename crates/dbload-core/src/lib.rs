//! dbload core - reverse-engineering of relational database metadata.
//!
//! This crate walks a database's metadata catalog (catalogs, schemas,
//! tables, procedures, columns, parameters) and materializes it into an
//! in-memory model, honoring user-supplied inclusion and exclusion filters.

pub mod adapter;
pub mod config;
pub mod error;
pub mod filter;
pub mod metadata;
pub mod model;
pub mod reverse;
pub mod types;

pub use adapter::{DbAdapter, JdbcAdapter};
pub use config::LoaderConfig;
pub use error::{ConfigError, Error, Result};
pub use filter::{CatalogFilter, FiltersConfig, IncludeTableFilter, PatternFilter, SchemaFilter, TableFilter};
pub use metadata::{MemoryMetadataSource, MetadataRow, MetadataSource, RowStream, Value};
pub use model::{Attribute, DbLoadDataStore, Entity, ParameterDirection, Procedure, ProcedureParameter};
pub use reverse::{
    AttributeLoader, DbLoader, EntityLoader, ProcedureColumnLoader, ProcedureLoader,
    TypeSizeOverrides,
};

#[cfg(feature = "sqlite")]
pub use metadata::SqliteMetadataSource;
