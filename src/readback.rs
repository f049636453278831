use crate::scene_tree::{GrabKind, NodeId, SceneTree};
use crate::schema::{
    AmbienceSettings, Level, LevelNode, NodeContent, QuatData, Vec3Data, FORMAT_VERSION_CURRENT,
};

/// Document metadata carried alongside the live tree so a re-encode can
/// reuse it. Populated from the loaded level, or default for a fresh scene.
#[derive(Debug, Clone, Default)]
pub struct LevelMeta {
    pub title: String,
    pub creators: String,
    pub description: String,
    pub max_checkpoint_count: u32,
    pub ambience: Option<AmbienceSettings>,
}

impl LevelMeta {
    pub fn from_level(level: &Level) -> Self {
        Self {
            title: level.title.clone(),
            creators: level.creators.clone(),
            description: level.description.clone(),
            max_checkpoint_count: level.max_checkpoint_count,
            ambience: level.ambience.clone(),
        }
    }
}

/// Rebuild a document from the live tree. Only nodes carrying a tag are
/// walked; untagged scene objects (helpers, lights) are skipped. Geometry
/// comes from the live transform, semantics from the tag, and the format
/// version is bumped to the current one.
pub fn level_from_tree(tree: &SceneTree, meta: &LevelMeta) -> Level {
    let nodes = tree.roots().iter().filter_map(|id| node_from_live(tree, *id)).collect();
    Level {
        format_version: FORMAT_VERSION_CURRENT,
        title: meta.title.clone(),
        creators: meta.creators.clone(),
        description: meta.description.clone(),
        max_checkpoint_count: meta.max_checkpoint_count,
        ambience: meta.ambience.clone(),
        nodes,
    }
}

fn node_from_live(tree: &SceneTree, id: NodeId) -> Option<LevelNode> {
    let live = tree.get(id)?;
    let info = live.grab_info.as_ref()?;
    let position = Vec3Data::from(live.position);
    let rotation = QuatData::from(live.rotation);
    let scale = Vec3Data::from(live.scale);

    let content = match &info.kind {
        GrabKind::Start { .. } => NodeContent::Start {
            position,
            rotation,
            // Radius reads back from the live X scale so a gizmo resize of
            // the marker round-trips as a radius change.
            radius: live.scale.x,
        },
        GrabKind::Finish { .. } => NodeContent::Finish { position, radius: live.scale.x },
        GrabKind::Static { shape, material, color, is_neon } => NodeContent::Static {
            shape: *shape,
            material: *material,
            position,
            scale,
            rotation,
            color: *color,
            is_neon: *is_neon,
        },
        GrabKind::Crumbling { shape, material, stable_time, respawn_time } => {
            NodeContent::Crumbling {
                shape: *shape,
                material: *material,
                position,
                scale,
                rotation,
                stable_time: *stable_time,
                respawn_time: *respawn_time,
            }
        }
        GrabKind::Sign { text } => NodeContent::Sign { position, rotation, text: text.clone() },
        GrabKind::Group => NodeContent::Group {
            position,
            scale,
            rotation,
            children: live
                .children()
                .iter()
                .filter_map(|child| node_from_live(tree, *child))
                .collect(),
        },
    };
    Some(LevelNode { content, is_locked: info.is_locked, animations: info.animations.clone() })
}
