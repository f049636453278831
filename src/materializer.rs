use glam::{Quat, Vec3};
use thiserror::Error;

use crate::material_registry::MaterialRegistry;
use crate::scene_tree::{GrabInfo, GrabKind, NodeId, SceneNode, SceneTree};
use crate::schema::{ColorData, Level, LevelNode, NodeContent};
use crate::shape_registry::{MarkerKind, ShapeRegistry};

#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("shape and material tables must be fully loaded before materialization")]
    AssetsNotReady,
}

/// Walk a decoded document into a live, editable scene tree.
///
/// All-or-nothing: the shape and material tables must be complete up front,
/// and a document never produces a partially populated scene.
pub fn materialize(
    level: &Level,
    shapes: &ShapeRegistry,
    materials: &MaterialRegistry,
) -> Result<SceneTree, MaterializeError> {
    if !shapes.is_complete() || !materials.is_complete() {
        return Err(MaterializeError::AssetsNotReady);
    }
    let mut tree = SceneTree::new();
    for node in &level.nodes {
        materialize_node(node, None, &mut tree, shapes, materials);
    }
    Ok(tree)
}

fn materialize_node(
    node: &LevelNode,
    parent: Option<NodeId>,
    tree: &mut SceneTree,
    shapes: &ShapeRegistry,
    materials: &MaterialRegistry,
) {
    let tag = |kind: GrabKind| GrabInfo {
        kind,
        is_locked: node.is_locked,
        animations: node.animations.clone(),
    };

    match &node.content {
        NodeContent::Group { position, scale, rotation, children } => {
            let mut live = SceneNode::new();
            live.position = Vec3::from(*position);
            live.rotation = Quat::from(*rotation);
            live.scale = Vec3::from(*scale);
            live.grab_info = Some(tag(GrabKind::Group));
            let id = tree.insert(live, parent);
            tree.refresh_normal_matrices(id);
            for child in children {
                materialize_node(child, Some(id), tree, shapes, materials);
            }
        }
        NodeContent::Static { shape, material, position, scale, rotation, color, is_neon } => {
            let Some((resolved_shape, mesh)) = shapes.resolve_primitive(*shape) else {
                return;
            };
            let Some((resolved_material, instance)) = materials.instantiate(*material, *color)
            else {
                return;
            };
            instance.lock().expect("material instance lock").is_neon = *is_neon;
            let mut live = SceneNode::new();
            live.position = Vec3::from(*position);
            live.rotation = Quat::from(*rotation);
            live.scale = Vec3::from(*scale);
            live.geometry = Some(mesh);
            live.material = Some(instance);
            live.grab_info = Some(tag(GrabKind::Static {
                shape: resolved_shape,
                material: resolved_material,
                color: *color,
                is_neon: *is_neon,
            }));
            let id = tree.insert(live, parent);
            tree.refresh_normal_matrices(id);
        }
        NodeContent::Crumbling {
            shape,
            material,
            position,
            scale,
            rotation,
            stable_time,
            respawn_time,
        } => {
            let Some((resolved_shape, mesh)) = shapes.resolve_primitive(*shape) else {
                return;
            };
            let Some((resolved_material, instance)) =
                materials.instantiate(*material, ColorData::default())
            else {
                return;
            };
            let mut live = SceneNode::new();
            live.position = Vec3::from(*position);
            live.rotation = Quat::from(*rotation);
            live.scale = Vec3::from(*scale);
            live.geometry = Some(mesh);
            live.material = Some(instance);
            live.grab_info = Some(tag(GrabKind::Crumbling {
                shape: resolved_shape,
                material: resolved_material,
                stable_time: *stable_time,
                respawn_time: *respawn_time,
            }));
            let id = tree.insert(live, parent);
            tree.refresh_normal_matrices(id);
        }
        NodeContent::Sign { position, rotation, text } => {
            // Fixed board geometry and sign material, never table lookups.
            let Some(mesh) = shapes.get(crate::schema::SHAPE_SIGN_BOARD) else {
                return;
            };
            let mut live = SceneNode::new();
            live.position = Vec3::from(*position);
            live.rotation = Quat::from(*rotation);
            live.geometry = Some(mesh);
            live.material = Some(materials.marker_instance(MarkerKind::Sign));
            live.grab_info = Some(tag(GrabKind::Sign { text: text.clone() }));
            let id = tree.insert(live, parent);
            tree.refresh_normal_matrices(id);
        }
        NodeContent::Start { position, rotation, radius } => {
            let Some(mesh) = shapes.get(crate::schema::SHAPE_START_MARKER) else {
                return;
            };
            let mut live = SceneNode::new();
            live.position = Vec3::from(*position);
            live.rotation = Quat::from(*rotation);
            // Radius drives X/Z only; Y keeps the marker's own height.
            live.scale = Vec3::new(*radius, 1.0, *radius);
            live.geometry = Some(mesh);
            live.material = Some(materials.marker_instance(MarkerKind::Start));
            live.grab_info = Some(tag(GrabKind::Start { radius: *radius }));
            let id = tree.insert(live, parent);
            tree.refresh_normal_matrices(id);
        }
        NodeContent::Finish { position, radius } => {
            let Some(mesh) = shapes.get(crate::schema::SHAPE_FINISH_MARKER) else {
                return;
            };
            let mut live = SceneNode::new();
            live.position = Vec3::from(*position);
            live.scale = Vec3::new(*radius, 1.0, *radius);
            live.geometry = Some(mesh);
            live.material = Some(materials.marker_instance(MarkerKind::Finish));
            live.grab_info = Some(tag(GrabKind::Finish { radius: *radius }));
            let id = tree.insert(live, parent);
            tree.refresh_normal_matrices(id);
        }
        NodeContent::Unknown => {}
    }
}
