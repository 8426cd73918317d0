//! The load target shared by every loader pass.

use super::{Entity, Procedure};
use indexmap::IndexMap;
use serde::Serialize;

/// Entities and procedures discovered during one load.
///
/// Not safe for concurrent mutation; a load borrows it mutably for its
/// whole duration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DbLoadDataStore {
    entities: IndexMap<String, Entity>,
    procedures: IndexMap<String, Procedure>,
}

impl DbLoadDataStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity, keyed by its name. Returns any entity it replaced.
    pub fn add_entity(&mut self, entity: Entity) -> Option<Entity> {
        self.entities.insert(entity.name.clone(), entity)
    }

    /// Add a procedure, keyed by its fully qualified name.
    pub fn add_procedure(&mut self, procedure: Procedure) -> Option<Procedure> {
        self.procedures.insert(procedure.full_name(), procedure)
    }

    /// Look up an entity by table name.
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    /// Mutable entity lookup.
    pub fn entity_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.entities.get_mut(name)
    }

    /// Look up a procedure by fully qualified name.
    pub fn procedure(&self, key: &str) -> Option<&Procedure> {
        self.procedures.get(key)
    }

    /// Mutable procedure lookup.
    pub fn procedure_mut(&mut self, key: &str) -> Option<&mut Procedure> {
        self.procedures.get_mut(key)
    }

    /// Whether an entity with this name exists.
    pub fn has_entity(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    /// Whether a procedure with this key exists.
    pub fn has_procedure(&self, key: &str) -> bool {
        self.procedures.contains_key(key)
    }

    /// All entities in discovery order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// All procedures in discovery order.
    pub fn procedures(&self) -> impl Iterator<Item = &Procedure> {
        self.procedures.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_lookup() {
        let mut store = DbLoadDataStore::new();
        store.add_entity(Entity::new("EMP"));

        assert!(store.has_entity("EMP"));
        assert!(store.entity("DEPT").is_none());
        assert!(store.entity_mut("EMP").is_some());
    }

    #[test]
    fn test_procedure_keyed_by_full_name() {
        let mut store = DbLoadDataStore::new();
        store.add_procedure(Procedure::new(Some("c"), Some("s"), "p"));

        assert!(store.has_procedure("c.s.p"));
        assert!(!store.has_procedure("p"));
        assert_eq!(store.procedures().count(), 1);
    }
}
