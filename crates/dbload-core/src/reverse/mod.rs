//! Reverse-engineering passes.
//!
//! Each pass walks the configured catalog/schema scopes with
//! [`load_per_catalog_and_schema`] and folds one kind of metadata row into
//! the [`DbLoadDataStore`](crate::model::DbLoadDataStore). [`DbLoader`]
//! runs all of them in dependency order.

mod attribute;
mod entity;
mod loader;
mod procedure;
mod procedure_column;
mod sizes;
mod walker;

pub use attribute::AttributeLoader;
pub use entity::EntityLoader;
pub use loader::DbLoader;
pub use procedure::ProcedureLoader;
pub use procedure_column::{direction_for, ProcedureColumnLoader, RETURN_VALUE_NAME};
pub use sizes::{TypeSizeOverrides, MYSQL};
pub use walker::{load_per_catalog_and_schema, PerCatalogAndSchemaLoader};
