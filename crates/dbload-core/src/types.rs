//! Numeric type codes reported by metadata sources.
//!
//! Codes follow the JDBC `java.sql.Types` numbering, which is what every
//! metadata source in the wild reports in `DATA_TYPE`.

pub const BIT: i32 = -7;
pub const TINYINT: i32 = -6;
pub const SMALLINT: i32 = 5;
pub const INTEGER: i32 = 4;
pub const BIGINT: i32 = -5;
pub const FLOAT: i32 = 6;
pub const REAL: i32 = 7;
pub const DOUBLE: i32 = 8;
pub const NUMERIC: i32 = 2;
pub const DECIMAL: i32 = 3;
pub const CHAR: i32 = 1;
pub const VARCHAR: i32 = 12;
pub const LONGVARCHAR: i32 = -1;
pub const DATE: i32 = 91;
pub const TIME: i32 = 92;
pub const TIMESTAMP: i32 = 93;
pub const BINARY: i32 = -2;
pub const VARBINARY: i32 = -3;
pub const LONGVARBINARY: i32 = -4;
pub const NULL: i32 = 0;
pub const OTHER: i32 = 1111;
pub const BLOB: i32 = 2004;
pub const CLOB: i32 = 2005;
pub const BOOLEAN: i32 = 16;

/// Whether fractional precision is meaningful for this type code.
pub fn is_decimal(type_code: i32) -> bool {
    matches!(type_code, DECIMAL | NUMERIC | DOUBLE | FLOAT | REAL)
}

/// `COLUMN_TYPE` values reported for procedure columns.
pub mod procedure_column {
    pub const UNKNOWN: i16 = 0;
    pub const IN: i16 = 1;
    pub const IN_OUT: i16 = 2;
    pub const RESULT: i16 = 3;
    pub const OUT: i16 = 4;
    pub const RETURN: i16 = 5;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_decimal() {
        assert!(is_decimal(DECIMAL));
        assert!(is_decimal(NUMERIC));
        assert!(is_decimal(DOUBLE));
        assert!(!is_decimal(INTEGER));
        assert!(!is_decimal(VARCHAR));
        assert!(!is_decimal(TIMESTAMP));
    }
}
