//! Vendor type adapters.
//!
//! An adapter turns the raw type information of a metadata row into an
//! [`Attribute`], applying whatever canonicalization its vendor needs.

use crate::model::Attribute;
use crate::types;

/// Vendor-specific attribute construction.
pub trait DbAdapter {
    /// Build an attribute from raw column metadata.
    ///
    /// `max_length` and `precision` use `-1` for "not applicable".
    fn build_attribute(
        &self,
        name: &str,
        type_name: &str,
        type_code: i32,
        max_length: i32,
        precision: i32,
        allow_nulls: bool,
    ) -> Attribute;

    /// Whether fractional precision is meaningful for the type code.
    fn is_decimal(&self, type_code: i32) -> bool {
        types::is_decimal(type_code)
    }
}

/// Generic adapter that keeps the reported type as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct JdbcAdapter;

impl DbAdapter for JdbcAdapter {
    fn build_attribute(
        &self,
        name: &str,
        type_name: &str,
        type_code: i32,
        max_length: i32,
        precision: i32,
        allow_nulls: bool,
    ) -> Attribute {
        let mut attr = Attribute::new(name, type_name.trim().to_ascii_uppercase(), type_code)
            .with_nullable(allow_nulls);
        if max_length >= 0 {
            attr = attr.with_max_length(max_length);
        }
        if precision >= 0 {
            attr = attr.with_precision(precision);
        }
        attr
    }
}

/// MySQL adapter.
///
/// MySQL reports unsigned integers with an ` UNSIGNED` suffix and the
/// signed type code; an unsigned `INT` does not fit the signed 32-bit
/// range, so it is widened to `BIGINT`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlAdapter;

impl DbAdapter for MySqlAdapter {
    fn build_attribute(
        &self,
        name: &str,
        type_name: &str,
        type_code: i32,
        max_length: i32,
        precision: i32,
        allow_nulls: bool,
    ) -> Attribute {
        let upper = type_name.trim().to_ascii_uppercase();
        let (type_name, type_code) = match upper.strip_suffix(" UNSIGNED") {
            Some(base) if type_code == types::INTEGER => (base.to_string(), types::BIGINT),
            Some(base) => (base.to_string(), type_code),
            None => (upper, type_code),
        };
        JdbcAdapter.build_attribute(name, &type_name, type_code, max_length, precision, allow_nulls)
    }
}

/// Pick an adapter for a database product name.
pub fn adapter_for_product(product_name: &str) -> Box<dyn DbAdapter> {
    match product_name {
        "MySQL" => Box::new(MySqlAdapter),
        _ => Box::new(JdbcAdapter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jdbc_adapter() {
        let attr = JdbcAdapter.build_attribute("SALARY", "decimal ", types::DECIMAL, 10, 2, true);

        assert_eq!(attr.type_name, "DECIMAL");
        assert_eq!(attr.max_length, 10);
        assert_eq!(attr.precision, 2);
        assert!(attr.nullable);
    }

    #[test]
    fn test_jdbc_adapter_negative_sizes() {
        let attr = JdbcAdapter.build_attribute("NOTE", "TEXT", types::VARCHAR, -1, -1, false);

        assert_eq!(attr.max_length, -1);
        assert_eq!(attr.precision, -1);
        assert!(!attr.nullable);
    }

    #[test]
    fn test_mysql_unsigned_int_widened() {
        let attr = MySqlAdapter.build_attribute("ID", "INT UNSIGNED", types::INTEGER, 10, -1, false);
        assert_eq!(attr.type_name, "INT");
        assert_eq!(attr.type_code, types::BIGINT);

        let attr = MySqlAdapter.build_attribute("N", "SMALLINT UNSIGNED", types::SMALLINT, 5, -1, false);
        assert_eq!(attr.type_name, "SMALLINT");
        assert_eq!(attr.type_code, types::SMALLINT);
    }

    #[test]
    fn test_adapter_for_product() {
        let adapter = adapter_for_product("MySQL");
        let attr = adapter.build_attribute("ID", "INT UNSIGNED", types::INTEGER, 10, -1, false);
        assert_eq!(attr.type_code, types::BIGINT);

        assert!(adapter_for_product("SQLite").is_decimal(types::NUMERIC));
    }
}
