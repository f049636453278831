use crate::schema::{
    Level, LevelWire, NodeContent, QuatData, Vec3Data, GROUP_NESTING_MAX_DEPTH,
    SIGN_TEXT_MAX_LEN, SUPPORTED_FORMAT_VERSIONS,
};
use bincode::Options;
use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use thiserror::Error;

/// Container magic for `.level` files.
pub const LEVEL_MAGIC: [u8; 4] = *b"SMLV";

const HEADER_LEN: usize = LEVEL_MAGIC.len() + std::mem::size_of::<u32>();

#[derive(Debug, Error)]
pub enum LevelFormatError {
    #[error("malformed level data: {reason}")]
    Schema { reason: String },
    #[error("unsupported level format version {found}")]
    UnsupportedVersion { found: u32 },
    #[error("level cannot be encoded: {reason}")]
    Validation { reason: String },
}

impl LevelFormatError {
    fn schema(reason: impl Into<String>) -> Self {
        LevelFormatError::Schema { reason: reason.into() }
    }

    fn validation(reason: impl Into<String>) -> Self {
        LevelFormatError::Validation { reason: reason.into() }
    }
}

fn bincode_options() -> impl Options {
    bincode::DefaultOptions::new().with_fixint_encoding()
}

/// Decode a `.level` buffer into a normalized document.
///
/// Pure; buffer acquisition is the caller's concern. Unknown format versions
/// are a hard error, never a best-effort decode.
pub fn decode(bytes: &[u8]) -> Result<Level, LevelFormatError> {
    if bytes.len() < HEADER_LEN {
        return Err(LevelFormatError::schema(format!(
            "buffer of {} bytes is shorter than the {HEADER_LEN}-byte header",
            bytes.len()
        )));
    }
    if bytes[..LEVEL_MAGIC.len()] != LEVEL_MAGIC {
        return Err(LevelFormatError::schema("missing level magic"));
    }
    let mut version_bytes = [0u8; 4];
    version_bytes.copy_from_slice(&bytes[LEVEL_MAGIC.len()..HEADER_LEN]);
    let format_version = u32::from_le_bytes(version_bytes);
    if !SUPPORTED_FORMAT_VERSIONS.contains(&format_version) {
        return Err(LevelFormatError::UnsupportedVersion { found: format_version });
    }
    let payload = decompress_size_prepended(&bytes[HEADER_LEN..])
        .map_err(|err| LevelFormatError::schema(format!("payload decompression failed: {err}")))?;
    let wire: LevelWire = bincode_options()
        .deserialize(&payload)
        .map_err(|err| LevelFormatError::schema(format!("payload deserialization failed: {err}")))?;
    wire.into_level(format_version).map_err(LevelFormatError::schema)
}

/// Encode a document into `.level` bytes.
///
/// The document is validated first; on failure no bytes are produced.
pub fn encode(level: &Level) -> Result<Vec<u8>, LevelFormatError> {
    validate(level)?;
    let payload = bincode_options()
        .serialize(&level.to_wire())
        .map_err(|err| LevelFormatError::schema(format!("payload serialization failed: {err}")))?;
    let compressed = compress_prepend_size(&payload);
    let mut bytes = Vec::with_capacity(HEADER_LEN + compressed.len());
    bytes.extend_from_slice(&LEVEL_MAGIC);
    bytes.extend_from_slice(&level.format_version.to_le_bytes());
    bytes.extend_from_slice(&compressed);
    Ok(bytes)
}

/// Check that a document can be expressed in the schema.
pub fn validate(level: &Level) -> Result<(), LevelFormatError> {
    if !SUPPORTED_FORMAT_VERSIONS.contains(&level.format_version) {
        return Err(LevelFormatError::validation(format!(
            "format version {} is not in the supported set",
            level.format_version
        )));
    }
    for (index, node) in level.nodes.iter().enumerate() {
        validate_node(node, 0).map_err(|reason| {
            LevelFormatError::validation(format!("node {index}: {reason}"))
        })?;
    }
    Ok(())
}

fn validate_node(node: &crate::schema::LevelNode, depth: usize) -> Result<(), String> {
    if depth > GROUP_NESTING_MAX_DEPTH {
        return Err(format!("group nesting exceeds {GROUP_NESTING_MAX_DEPTH} levels"));
    }
    match &node.content {
        NodeContent::Start { position, rotation, radius } => {
            require_finite_vec3("start position", position)?;
            require_finite_quat("start rotation", rotation)?;
            require_finite("start radius", *radius)?;
        }
        NodeContent::Finish { position, radius } => {
            require_finite_vec3("finish position", position)?;
            require_finite("finish radius", *radius)?;
        }
        NodeContent::Static { position, scale, rotation, color, .. } => {
            require_finite_vec3("static position", position)?;
            require_finite_vec3("static scale", scale)?;
            require_finite_quat("static rotation", rotation)?;
            for (label, value) in
                [("r", color.r), ("g", color.g), ("b", color.b), ("a", color.a)]
            {
                require_finite(&format!("static color.{label}"), value)?;
            }
        }
        NodeContent::Crumbling { position, scale, rotation, stable_time, respawn_time, .. } => {
            require_finite_vec3("crumbling position", position)?;
            require_finite_vec3("crumbling scale", scale)?;
            require_finite_quat("crumbling rotation", rotation)?;
            require_finite("crumbling stable time", *stable_time)?;
            require_finite("crumbling respawn time", *respawn_time)?;
        }
        NodeContent::Sign { position, rotation, text } => {
            require_finite_vec3("sign position", position)?;
            require_finite_quat("sign rotation", rotation)?;
            if text.len() > SIGN_TEXT_MAX_LEN {
                return Err(format!(
                    "sign text of {} bytes exceeds the {SIGN_TEXT_MAX_LEN}-byte cap",
                    text.len()
                ));
            }
        }
        NodeContent::Group { position, scale, rotation, children } => {
            require_finite_vec3("group position", position)?;
            require_finite_vec3("group scale", scale)?;
            require_finite_quat("group rotation", rotation)?;
            for (index, child) in children.iter().enumerate() {
                validate_node(child, depth + 1)
                    .map_err(|reason| format!("child {index}: {reason}"))?;
            }
        }
        NodeContent::Unknown => {}
    }
    Ok(())
}

fn require_finite(label: &str, value: f32) -> Result<(), String> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(format!("{label} is not finite"))
    }
}

fn require_finite_vec3(label: &str, value: &Vec3Data) -> Result<(), String> {
    require_finite(&format!("{label}.x"), value.x)?;
    require_finite(&format!("{label}.y"), value.y)?;
    require_finite(&format!("{label}.z"), value.z)
}

fn require_finite_quat(label: &str, value: &QuatData) -> Result<(), String> {
    require_finite(&format!("{label}.x"), value.x)?;
    require_finite(&format!("{label}.y"), value.y)?;
    require_finite(&format!("{label}.z"), value.z)?;
    require_finite(&format!("{label}.w"), value.w)
}
