//! Entity definitions.

use super::attribute::Attribute;
use indexmap::IndexMap;
use serde::Serialize;

/// A reverse-engineered table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    /// Table name.
    pub name: String,
    /// Catalog the table lives in, if the database reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    /// Schema the table lives in, if the database reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Attributes keyed by name, in insertion order.
    attributes: IndexMap<String, Attribute>,
}

impl Entity {
    /// Create an entity with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            catalog: None,
            schema: None,
            attributes: IndexMap::new(),
        }
    }

    /// Set the catalog and schema.
    pub fn in_scope(mut self, catalog: Option<&str>, schema: Option<&str>) -> Self {
        self.catalog = catalog.map(String::from);
        self.schema = schema.map(String::from);
        self
    }

    /// Get an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// All attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    /// Number of attributes.
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Add an attribute, replacing any attribute of the same name.
    ///
    /// A replaced attribute is removed first, so the newcomer moves to the
    /// end of the attribute order.
    pub fn add_attribute(&mut self, mut attribute: Attribute) {
        attribute.entity = Some(self.name.clone());
        self.attributes.shift_remove(&attribute.name);
        self.attributes.insert(attribute.name.clone(), attribute);
    }

    /// Remove an attribute by name.
    pub fn remove_attribute(&mut self, name: &str) -> Option<Attribute> {
        self.attributes.shift_remove(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types;

    #[test]
    fn test_add_attribute_sets_owner() {
        let mut entity = Entity::new("EMP");
        entity.add_attribute(Attribute::new("ID", "INTEGER", types::INTEGER));

        let attr = entity.attribute("ID").unwrap();
        assert_eq!(attr.entity.as_deref(), Some("EMP"));
        assert_eq!(entity.attribute_count(), 1);
    }

    #[test]
    fn test_add_attribute_replaces_same_name() {
        let mut entity = Entity::new("EMP");
        entity.add_attribute(Attribute::new("NAME", "VARCHAR", types::VARCHAR).with_max_length(10));
        entity.add_attribute(Attribute::new("ID", "INTEGER", types::INTEGER));
        entity.add_attribute(Attribute::new("NAME", "VARCHAR", types::VARCHAR).with_max_length(40));

        assert_eq!(entity.attribute_count(), 2);
        assert_eq!(entity.attribute("NAME").unwrap().max_length, 40);

        let order: Vec<_> = entity.attributes().map(|a| a.name.as_str()).collect();
        assert_eq!(order, vec!["ID", "NAME"]);
    }

    #[test]
    fn test_remove_attribute() {
        let mut entity = Entity::new("EMP");
        entity.add_attribute(Attribute::new("ID", "INTEGER", types::INTEGER));

        assert!(entity.remove_attribute("ID").is_some());
        assert!(entity.remove_attribute("ID").is_none());
        assert_eq!(entity.attribute_count(), 0);
    }
}
