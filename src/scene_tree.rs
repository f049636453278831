use glam::{Mat3, Mat4, Quat, Vec3};
use smallvec::SmallVec;
use std::sync::Arc;

use crate::complexity;
use crate::material_registry::SharedMaterial;
use crate::mesh::Mesh;
use crate::schema::{AnimationData, ColorData};

/// Stable handle to a live node. Generations guard against reuse of a slot
/// after deletion; a stale id simply resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

/// The per-node metadata the encoder reads back. Semantic fields live here;
/// geometric fields live on the node transform.
#[derive(Debug, Clone, PartialEq)]
pub struct GrabInfo {
    pub kind: GrabKind,
    pub is_locked: bool,
    pub animations: Vec<AnimationData>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GrabKind {
    Start { radius: f32 },
    Finish { radius: f32 },
    Static { shape: u32, material: u32, color: ColorData, is_neon: bool },
    Crumbling { shape: u32, material: u32, stable_time: f32, respawn_time: f32 },
    Sign { text: String },
    Group,
}

pub struct SceneNode {
    pub name: Option<String>,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub geometry: Option<Arc<Mesh>>,
    pub material: Option<SharedMaterial>,
    /// Inverse-transpose of the world matrix, cached for lighting. Cloned
    /// instances do not inherit it; anything that moves a node must refresh.
    pub normal_matrix: Mat3,
    pub grab_info: Option<GrabInfo>,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
}

impl SceneNode {
    pub fn new() -> Self {
        Self {
            name: None,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            geometry: None,
            material: None,
            normal_matrix: Mat3::IDENTITY,
            grab_info: None,
            parent: None,
            children: SmallVec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for SceneNode {
    fn default() -> Self {
        Self::new()
    }
}

struct Slot {
    generation: u32,
    node: Option<SceneNode>,
}

/// Arena of live nodes plus the flat registry of draggable handles the
/// interaction collaborator hit-tests against. Every tree insertion of a
/// tagged node has a matching registry entry and every removal drops it.
#[derive(Default)]
pub struct SceneTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    roots: Vec<NodeId>,
    draggables: Vec<NodeId>,
}

impl SceneTree {
    pub fn new() -> Self {
        Self { slots: Vec::new(), free: Vec::new(), roots: Vec::new(), draggables: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn draggables(&self) -> &[NodeId] {
        &self.draggables
    }

    /// Insert a node under `parent` (or at the top level). Tagged nodes are
    /// registered as draggable.
    pub fn insert(&mut self, mut node: SceneNode, parent: Option<NodeId>) -> NodeId {
        node.parent = parent.filter(|id| self.contains(*id));
        let parent = node.parent;
        let draggable = node.grab_info.is_some();

        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId { index, generation: slot.generation }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, node: Some(node) });
                NodeId { index, generation: 0 }
            }
        };

        match parent {
            Some(parent_id) => {
                if let Some(parent_node) = self.get_mut(parent_id) {
                    parent_node.children.push(id);
                }
            }
            None => self.roots.push(id),
        }
        if draggable {
            self.draggables.push(id);
        }
        id
    }

    /// Remove a node and its whole subtree. Children are cascade-deleted;
    /// the registry entry of every removed node goes with it.
    pub fn remove_subtree(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if let Some(parent_id) = self.get(id).and_then(|node| node.parent) {
            if let Some(parent_node) = self.get_mut(parent_id) {
                parent_node.children.retain(|child| *child != id);
            }
        } else {
            self.roots.retain(|root| *root != id);
        }
        self.remove_recursive(id);
        true
    }

    fn remove_recursive(&mut self, id: NodeId) {
        let children = match self.get(id) {
            Some(node) => node.children.clone(),
            None => return,
        };
        for child in children {
            self.remove_recursive(child);
        }
        let slot = &mut self.slots[id.index as usize];
        slot.node = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.draggables.retain(|entry| *entry != id);
    }

    /// True when `descendant` is `ancestor` or sits anywhere below it.
    pub fn is_in_subtree(&self, ancestor: NodeId, descendant: NodeId) -> bool {
        let mut cursor = Some(descendant);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.get(id).and_then(|node| node.parent);
        }
        false
    }

    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut chain = SmallVec::<[NodeId; 8]>::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            chain.push(current);
            cursor = self.get(current).and_then(|node| node.parent);
        }
        for current in chain.iter().rev() {
            if let Some(node) = self.get(*current) {
                matrix *= node.local_matrix();
            }
        }
        matrix
    }

    /// Recompute the cached normal matrix for a node and everything below
    /// it. Call after any transform edit.
    pub fn refresh_normal_matrices(&mut self, id: NodeId) {
        let world = self.world_matrix(id);
        let normal = Mat3::from_mat4(world).inverse().transpose();
        let children = match self.get_mut(id) {
            Some(node) => {
                node.normal_matrix = normal;
                node.children.clone()
            }
            None => return,
        };
        for child in children {
            self.refresh_normal_matrices(child);
        }
    }

    pub fn set_local_transform(&mut self, id: NodeId, position: Vec3, rotation: Quat, scale: Vec3) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                node.position = position;
                node.rotation = rotation;
                node.scale = scale;
                self.refresh_normal_matrices(id);
                true
            }
            None => false,
        }
    }

    /// Additive complexity over the tagged nodes.
    pub fn complexity(&self) -> u32 {
        self.roots.iter().map(|id| self.complexity_of(*id)).sum()
    }

    fn complexity_of(&self, id: NodeId) -> u32 {
        let Some(node) = self.get(id) else {
            return 0;
        };
        let own = node
            .grab_info
            .as_ref()
            .map(|info| complexity::grab_weight(&info.kind))
            .unwrap_or(0);
        own + node.children.iter().map(|child| self.complexity_of(*child)).sum::<u32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged_node() -> SceneNode {
        let mut node = SceneNode::new();
        node.grab_info = Some(GrabInfo {
            kind: GrabKind::Static {
                shape: crate::schema::SHAPE_CUBE,
                material: 0,
                color: ColorData::default(),
                is_neon: false,
            },
            is_locked: false,
            animations: Vec::new(),
        });
        node
    }

    #[test]
    fn stale_ids_resolve_to_nothing() {
        let mut tree = SceneTree::new();
        let id = tree.insert(tagged_node(), None);
        assert!(tree.remove_subtree(id));
        assert!(tree.get(id).is_none());
        assert!(!tree.remove_subtree(id));

        // The slot is reused with a new generation; the old id stays dead.
        let replacement = tree.insert(tagged_node(), None);
        assert_ne!(replacement, id);
        assert!(tree.get(id).is_none());
        assert!(tree.get(replacement).is_some());
    }

    #[test]
    fn removal_cascades_and_empties_the_registry() {
        let mut tree = SceneTree::new();
        let mut group = SceneNode::new();
        group.grab_info =
            Some(GrabInfo { kind: GrabKind::Group, is_locked: false, animations: Vec::new() });
        let group_id = tree.insert(group, None);
        let child_a = tree.insert(tagged_node(), Some(group_id));
        let child_b = tree.insert(tagged_node(), Some(group_id));
        assert_eq!(tree.draggables().len(), 3);

        assert!(tree.remove_subtree(group_id));
        assert!(tree.get(child_a).is_none());
        assert!(tree.get(child_b).is_none());
        assert!(tree.draggables().is_empty());
        assert!(tree.is_empty());
    }

    #[test]
    fn world_matrix_composes_through_parents() {
        let mut tree = SceneTree::new();
        let mut parent = SceneNode::new();
        parent.position = Vec3::new(1.0, 0.0, 0.0);
        let parent_id = tree.insert(parent, None);
        let mut child = SceneNode::new();
        child.position = Vec3::new(0.0, 2.0, 0.0);
        let child_id = tree.insert(child, Some(parent_id));

        let world = tree.world_matrix(child_id);
        let origin = world.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-6);
    }
}
