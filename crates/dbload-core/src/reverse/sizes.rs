//! Per-vendor caps on reported column sizes.

use std::collections::HashMap;

/// Product name of the vendor whose temporal sizes are capped.
pub const MYSQL: &str = "MySQL";

/// Fractional-seconds precision cap for MySQL temporal types.
const MYSQL_TEMPORAL_PRECISION: i32 = 6;

/// Lowercase type name to maximum length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeSizeOverrides {
    sizes: HashMap<String, i32>,
}

impl TypeSizeOverrides {
    /// A table with no overrides.
    pub fn empty() -> Self {
        Self::default()
    }

    /// MySQL reports the display width of temporal types as their size.
    pub fn mysql() -> Self {
        let sizes = ["datetime", "time", "timestamp", "date"]
            .into_iter()
            .map(|t| (t.to_string(), MYSQL_TEMPORAL_PRECISION))
            .collect();
        Self { sizes }
    }

    /// The table to use for a database product.
    pub fn for_product(product_name: &str) -> Self {
        if product_name == MYSQL {
            Self::mysql()
        } else {
            Self::empty()
        }
    }

    /// Override for a type name, matched case-insensitively.
    pub fn get(&self, type_name: &str) -> Option<i32> {
        self.sizes.get(&type_name.to_ascii_lowercase()).copied()
    }

    /// Effective max length: the override when it is smaller than the reported size.
    pub fn effective_size(&self, type_name: &str, reported: i32) -> i32 {
        match self.get(type_name) {
            Some(cap) if cap < reported => cap,
            _ => reported,
        }
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}
