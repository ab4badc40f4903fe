use std::collections::{HashMap, HashSet};

use crate::bodies::{Body, VertexId};
use crate::core::storage::{BodyStorage, Storage};
use crate::core::BodyHandle;
use crate::error::PhysicsError;
use crate::Result;

/// Ordered collection of live bodies.
///
/// Names are unique among live bodies and can be used in place of handles.
/// The registry also tracks which vertices belong to a live body.
#[derive(Default)]
pub struct BodyRegistry {
    bodies: BodyStorage<Body>,
    names: HashMap<String, BodyHandle>,
    live_vertices: HashSet<VertexId>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a body, rejecting a name that is already live
    pub fn insert(&mut self, body: Body) -> Result<BodyHandle> {
        if self.names.contains_key(body.name()) {
            return Err(PhysicsError::DuplicateName(body.name().to_string()));
        }
        let name = body.name().to_string();
        let vertex = body.vertex_id();
        let handle = self.bodies.add(body);
        self.names.insert(name, handle);
        self.live_vertices.insert(vertex);
        Ok(handle)
    }

    /// Unregisters a body and its vertex
    pub fn remove(&mut self, handle: BodyHandle) -> Result<Body> {
        let body = self
            .bodies
            .remove(handle)
            .ok_or_else(|| PhysicsError::LookupFailed(format!("body {} is not live", handle)))?;
        self.names.remove(body.name());
        self.live_vertices.remove(&body.vertex_id());
        Ok(body)
    }

    /// Unregisters the body with the given name
    pub fn remove_by_name(&mut self, name: &str) -> Result<Body> {
        let handle = self.handle_by_name(name)?;
        self.remove(handle)
    }

    pub fn handle_by_name(&self, name: &str) -> Result<BodyHandle> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| PhysicsError::LookupFailed(format!("no live body named '{}'", name)))
    }

    pub fn get(&self, handle: BodyHandle) -> Result<&Body> {
        self.bodies.get_body(handle)
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Result<&mut Body> {
        self.bodies.get_body_mut(handle)
    }

    /// Borrows two distinct bodies mutably, in argument order
    pub fn get_pair_mut(&mut self, a: BodyHandle, b: BodyHandle) -> Result<(&mut Body, &mut Body)> {
        self.bodies.get_pair_mut(a, b)
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn is_vertex_live(&self, vertex: VertexId) -> bool {
        self.live_vertices.contains(&vertex)
    }

    /// Live handles in insertion order
    pub fn handles(&self) -> Vec<BodyHandle> {
        self.bodies.handles()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
        self.names.clear();
        self.live_vertices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Arena;
    use crate::math::Vector2;

    fn body(name: &str) -> Body {
        Body::new(Vector2::new(10.0, 10.0), Vector2::new(20.0, 20.0), 2.0, name, &Arena::default()).unwrap()
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = BodyRegistry::new();
        registry.insert(body("a")).unwrap();
        assert!(matches!(registry.insert(body("a")), Err(PhysicsError::DuplicateName(n)) if n == "a"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn removal_unregisters_name_and_vertex() {
        let mut registry = BodyRegistry::new();
        let handle = registry.insert(body("a")).unwrap();
        let vertex = registry.get(handle).unwrap().vertex_id();
        assert!(registry.is_vertex_live(vertex));

        let removed = registry.remove_by_name("a").unwrap();
        assert_eq!(removed.name(), "a");
        assert!(!registry.is_vertex_live(vertex));
        assert!(!registry.contains(handle));
        assert!(matches!(registry.remove(handle), Err(PhysicsError::LookupFailed(_))));
        assert!(matches!(registry.remove_by_name("a"), Err(PhysicsError::LookupFailed(_))));

        // the name is free again
        registry.insert(body("a")).unwrap();
    }
}
