//! Core error types.

use thiserror::Error;

/// Result alias used throughout the loader.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Loader errors.
#[derive(Debug, Error)]
pub enum Error {
    /// A catalog/schema scope failed while being loaded. Aborts the load.
    #[error("failed loading scope {catalog}/{schema}: {source}")]
    Scope {
        /// Catalog being processed, or `<none>`.
        catalog: String,
        /// Schema being processed, or `<none>`.
        schema: String,
        /// The underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// A metadata row lacks a field the loader requires.
    #[error("metadata row has no field {0}")]
    MissingField(String),

    /// A metadata field holds a value of the wrong shape.
    #[error("metadata field {field} is not {expected}")]
    FieldType {
        /// Field label.
        field: String,
        /// Expected value kind.
        expected: &'static str,
    },

    /// Generic metadata source failure.
    #[error("metadata source error: {0}")]
    Source(String),

    /// SQLite metadata source failure.
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Wrap an error with the scope it happened in.
    pub fn in_scope(self, catalog: Option<&str>, schema: Option<&str>) -> Self {
        Error::Scope {
            catalog: catalog.unwrap_or("<none>").to_string(),
            schema: schema.unwrap_or("<none>").to_string(),
            source: Box::new(self),
        }
    }
}

/// Filter configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for the expected shape.
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    /// A key the config format does not define.
    #[error("unknown config key {key:?} in {at}")]
    UnknownKey {
        /// The offending key.
        key: String,
        /// Where in the document it appeared.
        at: String,
    },

    /// A name pattern failed to compile.
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Regex compile error.
        #[source]
        source: regex::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_error_display() {
        let err = Error::Source("connection reset".into()).in_scope(Some("db1"), None);
        let msg = err.to_string();
        assert!(msg.contains("db1/<none>"));
        assert!(msg.contains("connection reset"));
    }
}
