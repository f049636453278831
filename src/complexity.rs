use crate::scene_tree::GrabKind;
use crate::schema::{Level, LevelNode, NodeContent};

pub const WEIGHT_STATIC: u32 = 2;
pub const WEIGHT_CRUMBLING: u32 = 3;
pub const WEIGHT_SIGN: u32 = 5;

/// Additive complexity of a whole document. Start/Finish weigh nothing,
/// groups weigh nothing themselves but sum their children, unknown nodes
/// weigh nothing.
pub fn of_level(level: &Level) -> u32 {
    level.nodes.iter().map(of_node).sum()
}

pub fn of_node(node: &LevelNode) -> u32 {
    match &node.content {
        NodeContent::Static { .. } => WEIGHT_STATIC,
        NodeContent::Crumbling { .. } => WEIGHT_CRUMBLING,
        NodeContent::Sign { .. } => WEIGHT_SIGN,
        NodeContent::Group { children, .. } => children.iter().map(of_node).sum(),
        NodeContent::Start { .. } | NodeContent::Finish { .. } | NodeContent::Unknown => 0,
    }
}

pub fn grab_weight(kind: &GrabKind) -> u32 {
    match kind {
        GrabKind::Static { .. } => WEIGHT_STATIC,
        GrabKind::Crumbling { .. } => WEIGHT_CRUMBLING,
        GrabKind::Sign { .. } => WEIGHT_SIGN,
        GrabKind::Start { .. } | GrabKind::Finish { .. } | GrabKind::Group => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColorData, QuatData, Vec3Data};

    fn node(content: NodeContent) -> LevelNode {
        LevelNode { content, is_locked: false, animations: Vec::new() }
    }

    fn static_node() -> LevelNode {
        node(NodeContent::Static {
            shape: crate::schema::SHAPE_CUBE,
            material: 0,
            position: Vec3Data::default(),
            scale: Vec3Data::default(),
            rotation: QuatData::default(),
            color: ColorData::default(),
            is_neon: false,
        })
    }

    fn crumbling_node() -> LevelNode {
        node(NodeContent::Crumbling {
            shape: crate::schema::SHAPE_CUBE,
            material: 7,
            position: Vec3Data::default(),
            scale: Vec3Data::default(),
            rotation: QuatData::default(),
            stable_time: 1.0,
            respawn_time: 2.0,
        })
    }

    #[test]
    fn fixed_weights() {
        assert_eq!(of_node(&static_node()), 2);
        assert_eq!(of_node(&crumbling_node()), 3);
        assert_eq!(
            of_node(&node(NodeContent::Sign {
                position: Vec3Data::default(),
                rotation: QuatData::default(),
                text: String::new(),
            })),
            5
        );
        assert_eq!(
            of_node(&node(NodeContent::Start {
                position: Vec3Data::default(),
                rotation: QuatData::default(),
                radius: 1.0,
            })),
            0
        );
        assert_eq!(
            of_node(&node(NodeContent::Finish { position: Vec3Data::default(), radius: 1.0 })),
            0
        );
        assert_eq!(of_node(&node(NodeContent::Unknown)), 0);
    }

    #[test]
    fn groups_sum_their_children() {
        let group = node(NodeContent::Group {
            position: Vec3Data::default(),
            scale: Vec3Data::default(),
            rotation: QuatData::default(),
            children: vec![static_node(), crumbling_node()],
        });
        assert_eq!(of_node(&group), of_node(&static_node()) + of_node(&crumbling_node()));
    }
}
