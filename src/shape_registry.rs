use std::collections::BTreeMap;
use std::sync::Arc;

use crate::mesh::Mesh;
use crate::schema::{
    self, is_primitive_shape, PRIMITIVE_SHAPE_DEFAULT, SHAPE_CUBE, SHAPE_CYLINDER,
    SHAPE_FINISH_MARKER, SHAPE_PRISM, SHAPE_PYRAMID, SHAPE_SIGN_BOARD, SHAPE_SPHERE,
    SHAPE_START_MARKER,
};

/// Ordered lookup from wire shape id to a shared geometry handle. Must be
/// fully populated before materialization begins; partial tables are not
/// supported.
#[derive(Default)]
pub struct ShapeRegistry {
    entries: BTreeMap<u32, ShapeEntry>,
}

struct ShapeEntry {
    mesh: Arc<Mesh>,
    label: &'static str,
}

impl ShapeRegistry {
    /// Empty table, the "assets not yet loaded" state.
    pub fn new() -> Self {
        Self { entries: BTreeMap::new() }
    }

    /// The full shape table: marker shapes plus every orderable primitive.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.insert_entry(SHAPE_START_MARKER, "start_marker", Mesh::marker_disc());
        registry.insert_entry(SHAPE_FINISH_MARKER, "finish_marker", Mesh::marker_disc());
        registry.insert_entry(SHAPE_SIGN_BOARD, "sign_board", Mesh::sign_board());
        registry.insert_entry(SHAPE_CUBE, "cube", Mesh::cube(1.0));
        registry.insert_entry(SHAPE_SPHERE, "sphere", Mesh::sphere(0.5, 16, 8));
        registry.insert_entry(SHAPE_CYLINDER, "cylinder", Mesh::cylinder(0.5, 1.0, 16));
        registry.insert_entry(SHAPE_PYRAMID, "pyramid", Mesh::pyramid(0.5));
        registry.insert_entry(SHAPE_PRISM, "prism", Mesh::prism(1.0));
        registry
    }

    fn insert_entry(&mut self, id: u32, label: &'static str, mesh: Mesh) {
        self.entries.insert(id, ShapeEntry { mesh: Arc::new(mesh), label });
    }

    pub fn has(&self, id: u32) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn get(&self, id: u32) -> Option<Arc<Mesh>> {
        self.entries.get(&id).map(|entry| Arc::clone(&entry.mesh))
    }

    pub fn label(&self, id: u32) -> Option<&'static str> {
        self.entries.get(&id).map(|entry| entry.label)
    }

    /// All marker shapes and all primitives present.
    pub fn is_complete(&self) -> bool {
        [
            SHAPE_START_MARKER,
            SHAPE_FINISH_MARKER,
            SHAPE_SIGN_BOARD,
            SHAPE_CUBE,
            SHAPE_SPHERE,
            SHAPE_CYLINDER,
            SHAPE_PYRAMID,
            SHAPE_PRISM,
        ]
        .iter()
        .all(|id| self.has(*id))
    }

    /// Resolve a Static/Crumbling shape id, coercing anything outside the
    /// registered primitive range to the default primitive.
    pub fn resolve_primitive(&self, shape: u32) -> Option<(u32, Arc<Mesh>)> {
        let resolved = if is_primitive_shape(shape) && self.has(shape) {
            shape
        } else {
            log::warn!("shape {shape} outside the primitive table, using {PRIMITIVE_SHAPE_DEFAULT}");
            PRIMITIVE_SHAPE_DEFAULT
        };
        self.get(resolved).map(|mesh| (resolved, mesh))
    }

    pub fn primitive_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().copied().filter(|id| is_primitive_shape(*id))
    }
}

/// Shared geometry for marker node kinds; these are fixed, never looked up
/// from the node's shape field.
pub fn marker_shape_id(kind: MarkerKind) -> u32 {
    match kind {
        MarkerKind::Start => schema::SHAPE_START_MARKER,
        MarkerKind::Finish => schema::SHAPE_FINISH_MARKER,
        MarkerKind::Sign => schema::SHAPE_SIGN_BOARD,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Start,
    Finish,
    Sign,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_is_complete() {
        assert!(ShapeRegistry::standard().is_complete());
        assert!(!ShapeRegistry::new().is_complete());
    }

    #[test]
    fn out_of_range_shape_coerces_to_default() {
        let registry = ShapeRegistry::standard();
        let (resolved, _) = registry.resolve_primitive(9999).expect("resolves");
        assert_eq!(resolved, PRIMITIVE_SHAPE_DEFAULT);
        // Marker ids are not valid primitives either.
        let (resolved, _) = registry.resolve_primitive(SHAPE_START_MARKER).expect("resolves");
        assert_eq!(resolved, PRIMITIVE_SHAPE_DEFAULT);
        let (resolved, _) = registry.resolve_primitive(SHAPE_SPHERE).expect("resolves");
        assert_eq!(resolved, SHAPE_SPHERE);
    }
}
