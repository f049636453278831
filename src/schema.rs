use serde::{Deserialize, Serialize};

/// Newest format version the encoder emits.
pub const FORMAT_VERSION_CURRENT: u32 = 2;
/// Versions the decoder accepts. Anything else is a hard error.
pub const SUPPORTED_FORMAT_VERSIONS: [u32; 2] = [1, 2];

// Shape ids are namespaced: 0-2 are marker shapes owned by the gameplay
// node kinds, orderable primitives start at 1000.
pub const SHAPE_START_MARKER: u32 = 0;
pub const SHAPE_FINISH_MARKER: u32 = 1;
pub const SHAPE_SIGN_BOARD: u32 = 2;
pub const SHAPE_CUBE: u32 = 1000;
pub const SHAPE_SPHERE: u32 = 1001;
pub const SHAPE_CYLINDER: u32 = 1002;
pub const SHAPE_PYRAMID: u32 = 1003;
pub const SHAPE_PRISM: u32 = 1004;

pub const PRIMITIVE_SHAPE_FIRST: u32 = SHAPE_CUBE;
pub const PRIMITIVE_SHAPE_LAST: u32 = SHAPE_PRISM;
pub const PRIMITIVE_SHAPE_DEFAULT: u32 = SHAPE_CUBE;

pub const MATERIAL_DEFAULT: u32 = 0;
pub const MATERIAL_GRABBABLE: u32 = 1;
pub const MATERIAL_ICE: u32 = 2;
pub const MATERIAL_LAVA: u32 = 3;
pub const MATERIAL_WOOD: u32 = 4;
pub const MATERIAL_GRAPPLABLE: u32 = 5;
pub const MATERIAL_GRAPPLABLE_LAVA: u32 = 6;
pub const MATERIAL_GRABBABLE_CRUMBLING: u32 = 7;
pub const MATERIAL_COLORED: u32 = 8;
pub const MATERIAL_BOUNCING: u32 = 9;
pub const MATERIAL_TABLE_LEN: u32 = 10;

/// Longest sign text the schema will carry.
pub const SIGN_TEXT_MAX_LEN: usize = 512;
/// Deepest group nesting the schema will carry.
pub const GROUP_NESTING_MAX_DEPTH: usize = 64;

pub fn is_primitive_shape(shape: u32) -> bool {
    (PRIMITIVE_SHAPE_FIRST..=PRIMITIVE_SHAPE_LAST).contains(&shape)
}

// ---------- Normalized document ----------

/// A fully-typed level document. Every optional wire field has been resolved
/// to an explicit value; downstream consumers never see "present but null".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub format_version: u32,
    pub title: String,
    pub creators: String,
    pub description: String,
    pub max_checkpoint_count: u32,
    pub ambience: Option<AmbienceSettings>,
    pub nodes: Vec<LevelNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelNode {
    pub content: NodeContent,
    pub is_locked: bool,
    pub animations: Vec<AnimationData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeContent {
    Start {
        position: Vec3Data,
        rotation: QuatData,
        radius: f32,
    },
    Finish {
        position: Vec3Data,
        radius: f32,
    },
    Static {
        shape: u32,
        material: u32,
        position: Vec3Data,
        scale: Vec3Data,
        rotation: QuatData,
        color: ColorData,
        is_neon: bool,
    },
    Crumbling {
        shape: u32,
        material: u32,
        position: Vec3Data,
        scale: Vec3Data,
        rotation: QuatData,
        stable_time: f32,
        respawn_time: f32,
    },
    Sign {
        position: Vec3Data,
        rotation: QuatData,
        text: String,
    },
    Group {
        position: Vec3Data,
        scale: Vec3Data,
        rotation: QuatData,
        children: Vec<LevelNode>,
    },
    /// A wire node carrying no recognized payload. Kept in the document so
    /// an untouched re-encode preserves it, but never materialized.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbienceSettings {
    pub skybox_top: ColorData,
    pub skybox_bottom: ColorData,
    pub sun_altitude: f32,
    pub sun_azimuth: f32,
    pub sun_size: f32,
    pub fog_density: f32,
}

/// Keyframe track attached to a node. The editor carries these through
/// materialize and readback untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationData {
    pub name: String,
    pub frames: Vec<AnimationFrame>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationFrame {
    pub time: f32,
    pub position: Vec3Data,
    pub rotation: QuatData,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3Data {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuatData {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for QuatData {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorData {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for ColorData {
    fn default() -> Self {
        // Opaque black, the documented fallback for the colored material.
        Self { r: 0.0, g: 0.0, b: 0.0, a: 1.0 }
    }
}

// ---------- Wire representation ----------
//
// Mirrors the binary message layout: every scalar, vector component, and
// quaternion component is individually optional, and node content is a set
// of optional payload fields of which at most one may be populated.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct LevelWire {
    pub title: Option<String>,
    pub creators: Option<String>,
    pub description: Option<String>,
    pub max_checkpoint_count: Option<u32>,
    pub ambience: Option<AmbienceWire>,
    pub nodes: Vec<LevelNodeWire>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct LevelNodeWire {
    pub start: Option<StartWire>,
    pub finish: Option<FinishWire>,
    pub static_node: Option<StaticWire>,
    pub crumbling: Option<CrumblingWire>,
    pub sign: Option<SignWire>,
    pub group: Option<GroupWire>,
    pub is_locked: Option<bool>,
    pub animations: Vec<AnimationWire>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct StartWire {
    pub position: Option<Vec3Wire>,
    pub rotation: Option<QuatWire>,
    pub radius: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct FinishWire {
    pub position: Option<Vec3Wire>,
    pub radius: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct StaticWire {
    pub shape: Option<u32>,
    pub material: Option<u32>,
    pub position: Option<Vec3Wire>,
    pub scale: Option<Vec3Wire>,
    pub rotation: Option<QuatWire>,
    pub color: Option<ColorWire>,
    pub is_neon: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct CrumblingWire {
    pub shape: Option<u32>,
    pub material: Option<u32>,
    pub position: Option<Vec3Wire>,
    pub scale: Option<Vec3Wire>,
    pub rotation: Option<QuatWire>,
    pub stable_time: Option<f32>,
    pub respawn_time: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct SignWire {
    pub position: Option<Vec3Wire>,
    pub rotation: Option<QuatWire>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct GroupWire {
    pub position: Option<Vec3Wire>,
    pub scale: Option<Vec3Wire>,
    pub rotation: Option<QuatWire>,
    pub children: Vec<LevelNodeWire>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct AmbienceWire {
    pub skybox_top: Option<ColorWire>,
    pub skybox_bottom: Option<ColorWire>,
    pub sun_altitude: Option<f32>,
    pub sun_azimuth: Option<f32>,
    pub sun_size: Option<f32>,
    pub fog_density: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct AnimationWire {
    pub name: Option<String>,
    pub frames: Vec<AnimationFrameWire>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct AnimationFrameWire {
    pub time: Option<f32>,
    pub position: Option<Vec3Wire>,
    pub rotation: Option<QuatWire>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Vec3Wire {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct QuatWire {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
    pub w: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct ColorWire {
    pub r: Option<f32>,
    pub g: Option<f32>,
    pub b: Option<f32>,
    pub a: Option<f32>,
}

// ---------- Wire -> document normalization ----------

impl Vec3Wire {
    fn normalize(wire: Option<Self>) -> Vec3Data {
        // Absent components fall back to 0.0 in every axis, scale included.
        let wire = wire.unwrap_or_default();
        Vec3Data {
            x: wire.x.unwrap_or(0.0),
            y: wire.y.unwrap_or(0.0),
            z: wire.z.unwrap_or(0.0),
        }
    }
}

impl QuatWire {
    fn normalize(wire: Option<Self>) -> QuatData {
        // w falls back to 1.0 so an absent rotation is the identity.
        let wire = wire.unwrap_or_default();
        QuatData {
            x: wire.x.unwrap_or(0.0),
            y: wire.y.unwrap_or(0.0),
            z: wire.z.unwrap_or(0.0),
            w: wire.w.unwrap_or(1.0),
        }
    }
}

impl ColorWire {
    fn normalize(wire: Option<Self>) -> ColorData {
        let wire = wire.unwrap_or_default();
        ColorData {
            r: wire.r.unwrap_or(0.0),
            g: wire.g.unwrap_or(0.0),
            b: wire.b.unwrap_or(0.0),
            a: wire.a.unwrap_or(1.0),
        }
    }
}

impl LevelWire {
    pub(crate) fn into_level(self, format_version: u32) -> Result<Level, String> {
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for (index, node) in self.nodes.into_iter().enumerate() {
            let node =
                node.into_node().map_err(|reason| format!("node {index}: {reason}"))?;
            nodes.push(node);
        }
        Ok(Level {
            format_version,
            title: self.title.unwrap_or_default(),
            creators: self.creators.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            max_checkpoint_count: self.max_checkpoint_count.unwrap_or(0),
            ambience: self.ambience.map(AmbienceWire::into_settings),
            nodes,
        })
    }
}

impl AmbienceWire {
    fn into_settings(self) -> AmbienceSettings {
        AmbienceSettings {
            skybox_top: ColorWire::normalize(self.skybox_top),
            skybox_bottom: ColorWire::normalize(self.skybox_bottom),
            sun_altitude: self.sun_altitude.unwrap_or(45.0),
            sun_azimuth: self.sun_azimuth.unwrap_or(0.0),
            sun_size: self.sun_size.unwrap_or(1.0),
            fog_density: self.fog_density.unwrap_or(0.0),
        }
    }
}

impl LevelNodeWire {
    fn into_node(self) -> Result<LevelNode, String> {
        let populated = usize::from(self.start.is_some())
            + usize::from(self.finish.is_some())
            + usize::from(self.static_node.is_some())
            + usize::from(self.crumbling.is_some())
            + usize::from(self.sign.is_some())
            + usize::from(self.group.is_some());
        if populated > 1 {
            return Err(format!("{populated} content payloads populated, expected at most one"));
        }
        let content = if let Some(start) = self.start {
            NodeContent::Start {
                position: Vec3Wire::normalize(start.position),
                rotation: QuatWire::normalize(start.rotation),
                radius: start.radius.unwrap_or(0.0),
            }
        } else if let Some(finish) = self.finish {
            NodeContent::Finish {
                position: Vec3Wire::normalize(finish.position),
                radius: finish.radius.unwrap_or(0.0),
            }
        } else if let Some(static_node) = self.static_node {
            NodeContent::Static {
                shape: static_node.shape.unwrap_or(PRIMITIVE_SHAPE_DEFAULT),
                material: static_node.material.unwrap_or(MATERIAL_DEFAULT),
                position: Vec3Wire::normalize(static_node.position),
                scale: Vec3Wire::normalize(static_node.scale),
                rotation: QuatWire::normalize(static_node.rotation),
                color: ColorWire::normalize(static_node.color),
                is_neon: static_node.is_neon.unwrap_or(false),
            }
        } else if let Some(crumbling) = self.crumbling {
            NodeContent::Crumbling {
                shape: crumbling.shape.unwrap_or(PRIMITIVE_SHAPE_DEFAULT),
                material: crumbling.material.unwrap_or(MATERIAL_GRABBABLE_CRUMBLING),
                position: Vec3Wire::normalize(crumbling.position),
                scale: Vec3Wire::normalize(crumbling.scale),
                rotation: QuatWire::normalize(crumbling.rotation),
                stable_time: crumbling.stable_time.unwrap_or(0.0),
                respawn_time: crumbling.respawn_time.unwrap_or(0.0),
            }
        } else if let Some(sign) = self.sign {
            NodeContent::Sign {
                position: Vec3Wire::normalize(sign.position),
                rotation: QuatWire::normalize(sign.rotation),
                text: sign.text.unwrap_or_default(),
            }
        } else if let Some(group) = self.group {
            let mut children = Vec::with_capacity(group.children.len());
            for (index, child) in group.children.into_iter().enumerate() {
                let child =
                    child.into_node().map_err(|reason| format!("child {index}: {reason}"))?;
                children.push(child);
            }
            NodeContent::Group {
                position: Vec3Wire::normalize(group.position),
                scale: Vec3Wire::normalize(group.scale),
                rotation: QuatWire::normalize(group.rotation),
                children,
            }
        } else {
            NodeContent::Unknown
        };
        Ok(LevelNode {
            content,
            is_locked: self.is_locked.unwrap_or(false),
            animations: self.animations.into_iter().map(AnimationWire::into_data).collect(),
        })
    }
}

impl AnimationWire {
    fn into_data(self) -> AnimationData {
        AnimationData {
            name: self.name.unwrap_or_default(),
            frames: self
                .frames
                .into_iter()
                .map(|frame| AnimationFrame {
                    time: frame.time.unwrap_or(0.0),
                    position: Vec3Wire::normalize(frame.position),
                    rotation: QuatWire::normalize(frame.rotation),
                })
                .collect(),
        }
    }
}

// ---------- Document -> wire expansion ----------

impl Level {
    pub(crate) fn to_wire(&self) -> LevelWire {
        LevelWire {
            title: Some(self.title.clone()),
            creators: Some(self.creators.clone()),
            description: Some(self.description.clone()),
            max_checkpoint_count: Some(self.max_checkpoint_count),
            ambience: self.ambience.as_ref().map(AmbienceSettings::to_wire),
            nodes: self.nodes.iter().map(LevelNode::to_wire).collect(),
        }
    }
}

impl AmbienceSettings {
    fn to_wire(&self) -> AmbienceWire {
        AmbienceWire {
            skybox_top: Some(self.skybox_top.to_wire()),
            skybox_bottom: Some(self.skybox_bottom.to_wire()),
            sun_altitude: Some(self.sun_altitude),
            sun_azimuth: Some(self.sun_azimuth),
            sun_size: Some(self.sun_size),
            fog_density: Some(self.fog_density),
        }
    }
}

impl LevelNode {
    fn to_wire(&self) -> LevelNodeWire {
        let mut wire = LevelNodeWire {
            is_locked: Some(self.is_locked),
            animations: self.animations.iter().map(AnimationData::to_wire).collect(),
            ..LevelNodeWire::default()
        };
        match &self.content {
            NodeContent::Start { position, rotation, radius } => {
                wire.start = Some(StartWire {
                    position: Some(position.to_wire()),
                    rotation: Some(rotation.to_wire()),
                    radius: Some(*radius),
                });
            }
            NodeContent::Finish { position, radius } => {
                wire.finish =
                    Some(FinishWire { position: Some(position.to_wire()), radius: Some(*radius) });
            }
            NodeContent::Static { shape, material, position, scale, rotation, color, is_neon } => {
                wire.static_node = Some(StaticWire {
                    shape: Some(*shape),
                    material: Some(*material),
                    position: Some(position.to_wire()),
                    scale: Some(scale.to_wire()),
                    rotation: Some(rotation.to_wire()),
                    color: Some(color.to_wire()),
                    is_neon: Some(*is_neon),
                });
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
                wire.crumbling = Some(CrumblingWire {
                    shape: Some(*shape),
                    material: Some(*material),
                    position: Some(position.to_wire()),
                    scale: Some(scale.to_wire()),
                    rotation: Some(rotation.to_wire()),
                    stable_time: Some(*stable_time),
                    respawn_time: Some(*respawn_time),
                });
            }
            NodeContent::Sign { position, rotation, text } => {
                wire.sign = Some(SignWire {
                    position: Some(position.to_wire()),
                    rotation: Some(rotation.to_wire()),
                    text: Some(text.clone()),
                });
            }
            NodeContent::Group { position, scale, rotation, children } => {
                wire.group = Some(GroupWire {
                    position: Some(position.to_wire()),
                    scale: Some(scale.to_wire()),
                    rotation: Some(rotation.to_wire()),
                    children: children.iter().map(LevelNode::to_wire).collect(),
                });
            }
            NodeContent::Unknown => {}
        }
        wire
    }
}

impl AnimationData {
    fn to_wire(&self) -> AnimationWire {
        AnimationWire {
            name: Some(self.name.clone()),
            frames: self
                .frames
                .iter()
                .map(|frame| AnimationFrameWire {
                    time: Some(frame.time),
                    position: Some(frame.position.to_wire()),
                    rotation: Some(frame.rotation.to_wire()),
                })
                .collect(),
        }
    }
}

impl Vec3Data {
    pub(crate) fn to_wire(self) -> Vec3Wire {
        Vec3Wire { x: Some(self.x), y: Some(self.y), z: Some(self.z) }
    }
}

impl QuatData {
    pub(crate) fn to_wire(self) -> QuatWire {
        QuatWire { x: Some(self.x), y: Some(self.y), z: Some(self.z), w: Some(self.w) }
    }
}

impl ColorData {
    pub(crate) fn to_wire(self) -> ColorWire {
        ColorWire { r: Some(self.r), g: Some(self.g), b: Some(self.b), a: Some(self.a) }
    }
}

// ---------- glam conversions ----------

impl From<glam::Vec3> for Vec3Data {
    fn from(value: glam::Vec3) -> Self {
        Self { x: value.x, y: value.y, z: value.z }
    }
}

impl From<Vec3Data> for glam::Vec3 {
    fn from(value: Vec3Data) -> Self {
        glam::Vec3::new(value.x, value.y, value.z)
    }
}

impl From<glam::Quat> for QuatData {
    fn from(value: glam::Quat) -> Self {
        Self { x: value.x, y: value.y, z: value.z, w: value.w }
    }
}

impl From<QuatData> for glam::Quat {
    fn from(value: QuatData) -> Self {
        glam::Quat::from_xyzw(value.x, value.y, value.z, value.w)
    }
}

impl From<glam::Vec4> for ColorData {
    fn from(value: glam::Vec4) -> Self {
        Self { r: value.x, g: value.y, b: value.z, a: value.w }
    }
}

impl From<ColorData> for glam::Vec4 {
    fn from(value: ColorData) -> Self {
        glam::Vec4::new(value.r, value.g, value.b, value.a)
    }
}
