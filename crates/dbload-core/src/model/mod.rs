//! In-memory schema model populated by the reverse-engineering loaders.
//!
//! The model holds entities (tables) with their attributes (columns) and
//! stored procedures with their call parameters.

mod attribute;
mod entity;
mod procedure;
mod store;

pub use attribute::Attribute;
pub use entity::Entity;
pub use procedure::{ParameterDirection, Procedure, ProcedureParameter};
pub use store::DbLoadDataStore;
