use std::sync::{Arc, Mutex};

use glam::{Mat3, Vec4};

use crate::schema::{ColorData, MATERIAL_COLORED, MATERIAL_DEFAULT, MATERIAL_TABLE_LEN};
use crate::shape_registry::MarkerKind;

/// Tile factor applied to the tiling-sensitive materials so large surfaces
/// don't repeat their texture at full density.
pub const REDUCED_TILE_FACTOR: f32 = 0.5;
const DEFAULT_TILE_FACTOR: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct MaterialTemplate {
    pub index: u32,
    pub label: &'static str,
    pub texture: &'static str,
    pub base_color: Vec4,
    pub tile_factor: f32,
    /// Gets the reduced tile factor on instantiation.
    pub tiling_sensitive: bool,
    /// Consumes the node's color field on instantiation.
    pub takes_node_color: bool,
}

/// Per-node shader uniforms. Matches the level shader's uniform block:
/// diffuse color, tile factor, and the world normal matrix that cloned
/// instances do not inherit automatically.
#[derive(Debug, Clone)]
pub struct MaterialUniforms {
    pub diffuse_color: Vec4,
    pub tile_factor: f32,
    pub world_normal_matrix: Mat3,
}

#[derive(Debug, Clone)]
pub struct MaterialInstance {
    pub template_index: u32,
    pub label: &'static str,
    pub texture: &'static str,
    pub is_neon: bool,
    pub uniforms: MaterialUniforms,
}

/// Handle to a live material. Materialization makes a fresh instance per
/// node; cloning a node shares the handle, so a uniform edit through the
/// clone is visible through the source.
pub type SharedMaterial = Arc<Mutex<MaterialInstance>>;

pub struct MaterialRegistry {
    templates: Vec<MaterialTemplate>,
}

const TABLE: [(&str, &str, bool); MATERIAL_TABLE_LEN as usize] = [
    ("default", "default.png", true),
    ("grabbable", "grabbable.png", true),
    ("ice", "ice.png", true),
    ("lava", "lava.png", true),
    ("wood", "wood.png", true),
    ("grapplable", "grapplable.png", false),
    ("grapplable_lava", "grapplable_lava.png", false),
    ("grabbable_crumbling", "grabbable_crumbling.png", false),
    ("colored", "colored.png", false),
    ("bouncing", "bouncing.png", false),
];

impl MaterialRegistry {
    /// Empty table, the "assets not yet loaded" state.
    pub fn new() -> Self {
        Self { templates: Vec::new() }
    }

    /// The full ten-entry material table in wire order.
    pub fn standard() -> Self {
        let templates = TABLE
            .iter()
            .enumerate()
            .map(|(index, (label, texture, tiling_sensitive))| MaterialTemplate {
                index: index as u32,
                label,
                texture,
                base_color: Vec4::ONE,
                tile_factor: DEFAULT_TILE_FACTOR,
                tiling_sensitive: *tiling_sensitive,
                takes_node_color: index as u32 == MATERIAL_COLORED,
            })
            .collect();
        Self { templates }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.templates.len() == MATERIAL_TABLE_LEN as usize
    }

    pub fn template(&self, index: u32) -> Option<&MaterialTemplate> {
        self.templates.get(index as usize)
    }

    /// Resolve a material index, coercing anything outside the table to the
    /// default material.
    pub fn resolve(&self, index: u32) -> Option<(u32, &MaterialTemplate)> {
        let resolved = if (index as usize) < self.templates.len() {
            index
        } else {
            log::warn!("material {index} outside the table, using {MATERIAL_DEFAULT}");
            MATERIAL_DEFAULT
        };
        self.templates.get(resolved as usize).map(|template| (resolved, template))
    }

    /// Clone a template into a fresh per-node instance. The node color only
    /// lands in the uniforms when the template consumes it; the reduced tile
    /// factor only applies to the tiling-sensitive set.
    pub fn instantiate(&self, index: u32, node_color: ColorData) -> Option<(u32, SharedMaterial)> {
        let (resolved, template) = self.resolve(index)?;
        let diffuse_color = if template.takes_node_color {
            Vec4::from(node_color)
        } else {
            template.base_color
        };
        let tile_factor =
            if template.tiling_sensitive { REDUCED_TILE_FACTOR } else { template.tile_factor };
        let instance = MaterialInstance {
            template_index: resolved,
            label: template.label,
            texture: template.texture,
            is_neon: false,
            uniforms: MaterialUniforms {
                diffuse_color,
                tile_factor,
                world_normal_matrix: Mat3::IDENTITY,
            },
        };
        Some((resolved, Arc::new(Mutex::new(instance))))
    }

    /// Fixed marker materials, distinct per kind and never part of the
    /// ordered table.
    pub fn marker_instance(&self, kind: MarkerKind) -> SharedMaterial {
        let (label, texture, diffuse_color) = match kind {
            MarkerKind::Start => ("start_marker", "start.png", Vec4::new(0.2, 0.9, 0.3, 1.0)),
            MarkerKind::Finish => ("finish_marker", "finish.png", Vec4::new(0.9, 0.2, 0.2, 1.0)),
            MarkerKind::Sign => ("sign", "sign.png", Vec4::ONE),
        };
        Arc::new(Mutex::new(MaterialInstance {
            template_index: MATERIAL_DEFAULT,
            label,
            texture,
            is_neon: false,
            uniforms: MaterialUniforms {
                diffuse_color,
                tile_factor: DEFAULT_TILE_FACTOR,
                world_normal_matrix: Mat3::IDENTITY,
            },
        }))
    }
}

impl Default for MaterialRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_material_coerces_to_default() {
        let registry = MaterialRegistry::standard();
        let (resolved, _) = registry.resolve(999).expect("resolves");
        assert_eq!(resolved, MATERIAL_DEFAULT);
        let (resolved, _) = registry.resolve(9).expect("resolves");
        assert_eq!(resolved, 9);
    }

    #[test]
    fn colored_material_takes_the_node_color() {
        let registry = MaterialRegistry::standard();
        let color = ColorData { r: 0.1, g: 0.2, b: 0.3, a: 1.0 };
        let (_, shared) = registry.instantiate(MATERIAL_COLORED, color).expect("instantiates");
        let instance = shared.lock().unwrap();
        assert_eq!(instance.uniforms.diffuse_color, Vec4::new(0.1, 0.2, 0.3, 1.0));

        let (_, shared) = registry.instantiate(MATERIAL_DEFAULT, color).expect("instantiates");
        let instance = shared.lock().unwrap();
        assert_eq!(instance.uniforms.diffuse_color, Vec4::ONE);
    }

    #[test]
    fn tiling_sensitive_materials_get_the_reduced_factor() {
        let registry = MaterialRegistry::standard();
        let (_, shared) =
            registry.instantiate(MATERIAL_DEFAULT, ColorData::default()).expect("instantiates");
        assert_eq!(shared.lock().unwrap().uniforms.tile_factor, REDUCED_TILE_FACTOR);
        let (_, shared) =
            registry.instantiate(MATERIAL_COLORED, ColorData::default()).expect("instantiates");
        assert_eq!(shared.lock().unwrap().uniforms.tile_factor, DEFAULT_TILE_FACTOR);
    }
}
