use glam::Vec3;

use crate::codec::{self, LevelFormatError};
use crate::gizmo::{GizmoMode, GizmoState};
use crate::material_registry::MaterialRegistry;
use crate::materializer::{materialize, MaterializeError};
use crate::readback::{level_from_tree, LevelMeta};
use crate::scene_tree::{GrabInfo, GrabKind, NodeId, SceneNode, SceneTree};
use crate::schema::{ColorData, Level, MATERIAL_DEFAULT};
use crate::shape_registry::ShapeRegistry;

/// One editing session over one level: the live tree, the selection, the
/// gizmo, the document metadata for re-encode, and the asset tables.
/// Created on load, torn down when the user navigates away.
pub struct EditorSession {
    tree: SceneTree,
    meta: LevelMeta,
    selection: Option<NodeId>,
    gizmo: GizmoState,
    shapes: ShapeRegistry,
    materials: MaterialRegistry,
}

impl EditorSession {
    /// Materialize a decoded document into an editable session. The asset
    /// tables must be complete; a failed load never yields a partial scene.
    pub fn from_level(
        level: &Level,
        shapes: ShapeRegistry,
        materials: MaterialRegistry,
    ) -> Result<Self, MaterializeError> {
        let tree = materialize(level, &shapes, &materials)?;
        Ok(Self {
            tree,
            meta: LevelMeta::from_level(level),
            selection: None,
            gizmo: GizmoState::new(),
            shapes,
            materials,
        })
    }

    /// A fresh, empty level.
    pub fn empty(shapes: ShapeRegistry, materials: MaterialRegistry) -> Self {
        Self {
            tree: SceneTree::new(),
            meta: LevelMeta::default(),
            selection: None,
            gizmo: GizmoState::new(),
            shapes,
            materials,
        }
    }

    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut SceneTree {
        &mut self.tree
    }

    pub fn meta(&self) -> &LevelMeta {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut LevelMeta {
        &mut self.meta
    }

    pub fn gizmo(&self) -> &GizmoState {
        &self.gizmo
    }

    pub fn selection(&self) -> Option<NodeId> {
        self.selection
    }

    /// Select a live node (attaching the gizmo) or clear the selection.
    pub fn select(&mut self, id: Option<NodeId>) {
        match id.filter(|id| self.tree.contains(*id)) {
            Some(id) => {
                self.selection = Some(id);
                self.gizmo.attach(id);
            }
            None => {
                self.selection = None;
                self.gizmo.detach();
            }
        }
    }

    pub fn set_transform_mode(&mut self, mode: GizmoMode) {
        self.gizmo.set_mode(mode);
    }

    /// Insert a new static node of the requested primitive shape with the
    /// default material, appended at the top level. No-ops (returning
    /// `None`) when the asset tables cannot supply the shape or material.
    pub fn insert(&mut self, shape: u32) -> Option<NodeId> {
        if !crate::schema::is_primitive_shape(shape) {
            return None;
        }
        let mesh = self.shapes.get(shape)?;
        let (material_index, instance) =
            self.materials.instantiate(MATERIAL_DEFAULT, ColorData::default())?;
        let mut live = SceneNode::new();
        live.geometry = Some(mesh);
        live.material = Some(instance);
        live.grab_info = Some(GrabInfo {
            kind: GrabKind::Static {
                shape,
                material: material_index,
                color: ColorData::default(),
                is_neon: false,
            },
            is_locked: false,
            animations: Vec::new(),
        });
        let id = self.tree.insert(live, None);
        self.tree.refresh_normal_matrices(id);
        Some(id)
    }

    /// Clone a live node as a sibling. Geometry and material are shared by
    /// reference; transform and tag are copied by value. Groups clone
    /// shallow: the container only, never its children.
    pub fn clone_node(&mut self, id: NodeId) -> Option<NodeId> {
        let source = self.tree.get(id)?;
        let parent = source.parent();
        let mut copy = SceneNode::new();
        copy.name = source.name.clone();
        copy.position = source.position;
        copy.rotation = source.rotation;
        copy.scale = source.scale;
        copy.geometry = source.geometry.clone();
        copy.material = source.material.clone();
        copy.grab_info = source.grab_info.clone();
        let new_id = self.tree.insert(copy, parent);
        self.tree.refresh_normal_matrices(new_id);
        Some(new_id)
    }

    /// Clone whatever is selected; no-op without a selection.
    pub fn clone_selected(&mut self) -> Option<NodeId> {
        self.clone_node(self.selection?)
    }

    /// Delete a node and its subtree, detaching the gizmo and clearing the
    /// selection when they pointed into it. Returns false for a stale id.
    pub fn delete(&mut self, id: NodeId) -> bool {
        if !self.tree.contains(id) {
            return false;
        }
        if let Some(attached) = self.gizmo.attached() {
            if self.tree.is_in_subtree(id, attached) {
                self.gizmo.detach();
            }
        }
        if let Some(selected) = self.selection {
            if self.tree.is_in_subtree(id, selected) {
                self.selection = None;
            }
        }
        self.tree.remove_subtree(id)
    }

    /// Delete the selection; no-op when nothing is selected.
    pub fn delete_selected(&mut self) -> bool {
        match self.selection {
            Some(id) => self.delete(id),
            None => false,
        }
    }

    pub fn set_node_position(&mut self, id: NodeId, position: Vec3) -> bool {
        match self.tree.get(id) {
            Some(node) => {
                let (rotation, scale) = (node.rotation, node.scale);
                self.tree.set_local_transform(id, position, rotation, scale)
            }
            None => false,
        }
    }

    /// Rebuild the document from the live tree.
    pub fn level_document(&self) -> Level {
        level_from_tree(&self.tree, &self.meta)
    }

    /// Rebuild and serialize. Validation failures surface as
    /// `LevelFormatError::Validation` with no bytes emitted.
    pub fn export_level(&self) -> Result<Vec<u8>, LevelFormatError> {
        codec::encode(&self.level_document())
    }

    pub fn complexity(&self) -> u32 {
        self.tree.complexity()
    }
}
