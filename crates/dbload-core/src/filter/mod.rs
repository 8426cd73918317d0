//! Inclusion/exclusion filters deciding which schema objects are loaded.

mod config;
mod pattern;

pub use config::{CatalogFilter, FiltersConfig, IncludeTableFilter, SchemaFilter, TableFilter};
pub use pattern::PatternFilter;
