//! Stored procedure definitions.

use serde::Serialize;

/// Direction of a procedure call parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterDirection {
    /// Input parameter.
    In,
    /// Output parameter.
    Out,
    /// Input/output parameter.
    InOut,
    /// The metadata source reported a kind with no known direction.
    Unknown,
}

/// A call parameter of a stored procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcedureParameter {
    /// Parameter name.
    pub name: String,
    /// Call direction.
    pub direction: ParameterDirection,
    /// Numeric type code (see [`crate::types`]).
    pub type_code: i32,
    /// Maximum length.
    pub max_length: i32,
    /// Decimal precision, `-1` when not applicable.
    pub precision: i32,
    /// Fully qualified name of the owning procedure.
    pub procedure: String,
}

/// A reverse-engineered stored procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Procedure {
    /// Procedure name.
    pub name: String,
    /// Catalog, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    /// Schema, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Whether the procedure returns a value.
    pub returning_value: bool,
    /// Call parameters in metadata order.
    pub parameters: Vec<ProcedureParameter>,
}

impl Procedure {
    /// Create a procedure with no parameters.
    pub fn new(catalog: Option<&str>, schema: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            catalog: catalog.map(String::from),
            schema: schema.map(String::from),
            returning_value: false,
            parameters: Vec::new(),
        }
    }

    /// Build the `catalog.schema.name` key, omitting absent parts.
    pub fn fully_qualified_name(catalog: Option<&str>, schema: Option<&str>, name: &str) -> String {
        let mut key = String::new();
        for part in [catalog, schema].into_iter().flatten() {
            key.push_str(part);
            key.push('.');
        }
        key.push_str(name);
        key
    }

    /// This procedure's store key.
    pub fn full_name(&self) -> String {
        Self::fully_qualified_name(self.catalog.as_deref(), self.schema.as_deref(), &self.name)
    }

    /// Append a call parameter.
    pub fn add_call_parameter(&mut self, parameter: ProcedureParameter) {
        self.parameters.push(parameter);
    }

    /// Get a parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&ProcedureParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}
