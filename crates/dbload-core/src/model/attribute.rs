//! Attribute definitions for entities.

use serde::Serialize;

/// A column of a reverse-engineered table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Column name.
    pub name: String,
    /// Vendor type name as canonicalized by the adapter.
    pub type_name: String,
    /// Numeric type code (see [`crate::types`]).
    pub type_code: i32,
    /// Effective maximum length, `-1` when unknown.
    pub max_length: i32,
    /// Decimal precision, `-1` when not applicable.
    pub precision: i32,
    /// Whether the column accepts nulls.
    pub nullable: bool,
    /// Whether the value is generated by the database (auto-increment).
    pub generated: bool,
    /// Name of the owning entity, set once attached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

impl Attribute {
    /// Create a nullable attribute with no length or precision.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, type_code: i32) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            type_code,
            max_length: -1,
            precision: -1,
            nullable: true,
            generated: false,
            entity: None,
        }
    }

    /// Set the maximum length.
    pub fn with_max_length(mut self, max_length: i32) -> Self {
        self.max_length = max_length;
        self
    }

    /// Set the decimal precision.
    pub fn with_precision(mut self, precision: i32) -> Self {
        self.precision = precision;
        self
    }

    /// Set nullability.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types;

    #[test]
    fn test_attribute_builder() {
        let attr = Attribute::new("SALARY", "DECIMAL", types::DECIMAL)
            .with_max_length(10)
            .with_precision(2)
            .with_nullable(false);

        assert_eq!(attr.max_length, 10);
        assert_eq!(attr.precision, 2);
        assert!(!attr.nullable);
        assert!(!attr.generated);
        assert!(attr.entity.is_none());
    }

    #[test]
    fn test_attribute_defaults() {
        let attr = Attribute::new("ID", "INTEGER", types::INTEGER);

        assert_eq!(attr.max_length, -1);
        assert_eq!(attr.precision, -1);
        assert!(attr.nullable);
        assert!(!attr.generated);
    }
}
