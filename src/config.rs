use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::schema::{PRIMITIVE_SHAPE_DEFAULT, SHAPE_CUBE};

fn default_insert_shape() -> u32 {
    SHAPE_CUBE
}

const fn default_translate_snap() -> f32 {
    crate::gizmo::TRANSLATE_SNAP_STEP
}

const fn default_rotate_snap_degrees() -> f32 {
    15.0
}

const fn default_scale_snap() -> f32 {
    crate::gizmo::SCALE_SNAP_STEP
}

fn default_export_dir() -> String {
    "exports".to_string()
}

fn default_remote_base_url() -> String {
    "https://levels.summitclimb.dev/api".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditorConfig {
    #[serde(default = "default_insert_shape")]
    pub insert_shape: u32,
    #[serde(default = "default_translate_snap")]
    pub translate_snap: f32,
    #[serde(default = "default_rotate_snap_degrees")]
    pub rotate_snap_degrees: f32,
    #[serde(default = "default_scale_snap")]
    pub scale_snap: f32,
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
    #[serde(default = "default_remote_base_url")]
    pub remote_base_url: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            insert_shape: default_insert_shape(),
            translate_snap: default_translate_snap(),
            rotate_snap_degrees: default_rotate_snap_degrees(),
            scale_snap: default_scale_snap(),
            export_dir: default_export_dir(),
            remote_base_url: default_remote_base_url(),
        }
    }
}

impl EditorConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Reading config file {}", path.display()))?;
        let mut config: EditorConfig = serde_json::from_slice(&bytes)
            .with_context(|| format!("Parsing config file {}", path.display()))?;
        config.sanitize();
        Ok(config)
    }

    /// Missing config files are not an error; the defaults apply.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from_path(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("config {} unusable, falling back to defaults: {err:?}", path.display());
                Self::default()
            }
        }
    }

    fn sanitize(&mut self) {
        if !crate::schema::is_primitive_shape(self.insert_shape) {
            log::warn!(
                "configured insert shape {} is not a primitive, using {PRIMITIVE_SHAPE_DEFAULT}",
                self.insert_shape
            );
            self.insert_shape = PRIMITIVE_SHAPE_DEFAULT;
        }
        if self.translate_snap <= 0.0 {
            self.translate_snap = default_translate_snap();
        }
        if self.rotate_snap_degrees <= 0.0 {
            self.rotate_snap_degrees = default_rotate_snap_degrees();
        }
        if self.scale_snap <= 0.0 {
            self.scale_snap = default_scale_snap();
        }
    }
}
