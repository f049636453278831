use summit_editor::material_registry::MaterialRegistry;
use summit_editor::schema::{
    AmbienceSettings, AnimationData, AnimationFrame, ColorData, Level, LevelNode, NodeContent,
    QuatData, Vec3Data, FORMAT_VERSION_CURRENT, MATERIAL_COLORED, SHAPE_CUBE, SHAPE_SPHERE,
};
use summit_editor::shape_registry::ShapeRegistry;
use summit_editor::{decode, encode, EditorSession};
use tempfile::tempdir;

fn plain(content: NodeContent) -> LevelNode {
    LevelNode { content, is_locked: false, animations: Vec::new() }
}

fn rich_level() -> Level {
    let animated_platform = LevelNode {
        content: NodeContent::Static {
            shape: SHAPE_SPHERE,
            material: MATERIAL_COLORED,
            position: Vec3Data { x: -4.0, y: 2.5, z: 0.0 },
            scale: Vec3Data { x: 2.0, y: 0.5, z: 2.0 },
            rotation: QuatData::default(),
            color: ColorData { r: 0.8, g: 0.1, b: 0.4, a: 1.0 },
            is_neon: true,
        },
        is_locked: true,
        animations: vec![AnimationData {
            name: "bob".to_string(),
            frames: vec![
                AnimationFrame {
                    time: 0.0,
                    position: Vec3Data { x: -4.0, y: 2.5, z: 0.0 },
                    rotation: QuatData::default(),
                },
                AnimationFrame {
                    time: 2.0,
                    position: Vec3Data { x: -4.0, y: 4.0, z: 0.0 },
                    rotation: QuatData::default(),
                },
            ],
        }],
    };

    Level {
        format_version: FORMAT_VERSION_CURRENT,
        title: "Ridge Run".to_string(),
        creators: "ana, luis".to_string(),
        description: "Three crumbling bridges and a long drop.".to_string(),
        max_checkpoint_count: 5,
        ambience: Some(AmbienceSettings {
            skybox_top: ColorData { r: 0.4, g: 0.6, b: 0.9, a: 1.0 },
            skybox_bottom: ColorData { r: 0.9, g: 0.8, b: 0.7, a: 1.0 },
            sun_altitude: 35.0,
            sun_azimuth: 120.0,
            sun_size: 1.5,
            fog_density: 0.02,
        }),
        nodes: vec![
            plain(NodeContent::Start {
                position: Vec3Data { x: 0.0, y: 1.0, z: 0.0 },
                rotation: QuatData::default(),
                radius: 2.0,
            }),
            animated_platform,
            plain(NodeContent::Crumbling {
                shape: SHAPE_CUBE,
                material: 7,
                position: Vec3Data { x: 2.0, y: 2.0, z: 1.0 },
                scale: Vec3Data { x: 1.0, y: 0.25, z: 1.0 },
                rotation: QuatData { x: 0.0, y: 0.3826834, z: 0.0, w: 0.9238795 },
                stable_time: 0.75,
                respawn_time: 4.0,
            }),
            plain(NodeContent::Group {
                position: Vec3Data { x: 10.0, y: 0.0, z: 0.0 },
                scale: Vec3Data { x: 1.0, y: 1.0, z: 1.0 },
                rotation: QuatData::default(),
                children: vec![
                    plain(NodeContent::Static {
                        shape: SHAPE_CUBE,
                        material: 4,
                        position: Vec3Data { x: 0.0, y: -1.0, z: 0.0 },
                        scale: Vec3Data { x: 3.0, y: 0.5, z: 3.0 },
                        rotation: QuatData::default(),
                        color: ColorData::default(),
                        is_neon: false,
                    }),
                    plain(NodeContent::Sign {
                        position: Vec3Data { x: 0.0, y: 0.5, z: 0.0 },
                        rotation: QuatData::default(),
                        text: "almost there".to_string(),
                    }),
                ],
            }),
            plain(NodeContent::Finish {
                position: Vec3Data { x: 20.0, y: 1.0, z: 0.0 },
                radius: 1.5,
            }),
        ],
    }
}

#[test]
fn encode_decode_is_identity_on_a_normalized_document() {
    let level = rich_level();
    let bytes = encode(&level).expect("level encodes");
    let decoded = decode(&bytes).expect("level decodes");
    assert_eq!(decoded, level);
}

#[test]
fn materialize_readback_cycle_preserves_the_document() {
    let level = rich_level();
    let session =
        EditorSession::from_level(&level, ShapeRegistry::standard(), MaterialRegistry::standard())
            .expect("level materializes");
    let rebuilt = session.level_document();
    assert_eq!(rebuilt, level);

    // And the bytes survive another full cycle.
    let bytes = session.export_level().expect("session exports");
    let decoded = decode(&bytes).expect("exported bytes decode");
    assert_eq!(decoded, level);
}

#[test]
fn export_bumps_an_old_format_version() {
    let mut level = rich_level();
    level.format_version = 1;
    let session =
        EditorSession::from_level(&level, ShapeRegistry::standard(), MaterialRegistry::standard())
            .expect("level materializes");
    let decoded = decode(&session.export_level().expect("session exports")).expect("decodes");
    assert_eq!(decoded.format_version, FORMAT_VERSION_CURRENT);
}

#[test]
fn unknown_nodes_survive_a_document_cycle_but_not_an_edit_cycle() {
    let mut level = rich_level();
    level.nodes.push(LevelNode {
        content: NodeContent::Unknown,
        is_locked: false,
        animations: Vec::new(),
    });

    let decoded = decode(&encode(&level).expect("encodes")).expect("decodes");
    assert_eq!(decoded, level);

    let session =
        EditorSession::from_level(&level, ShapeRegistry::standard(), MaterialRegistry::standard())
            .expect("level materializes");
    let rebuilt = session.level_document();
    assert_eq!(rebuilt.nodes.len(), level.nodes.len() - 1);
    assert!(rebuilt.nodes.iter().all(|node| node.content != NodeContent::Unknown));
}

#[test]
fn level_files_roundtrip_through_disk() {
    let level = rich_level();
    let session =
        EditorSession::from_level(&level, ShapeRegistry::standard(), MaterialRegistry::standard())
            .expect("level materializes");
    let bytes = session.export_level().expect("session exports");

    let dir = tempdir().expect("temp dir");
    let path = summit_editor::export::write_level_export(dir.path(), &bytes).expect("export writes");
    assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("level"));

    let read_back = std::fs::read(&path).expect("export file reads");
    let decoded = decode(&read_back).expect("export file decodes");
    assert_eq!(decoded, level);
    assert_eq!(summit_editor::complexity::of_level(&decoded), 2 + 3 + 2 + 5);
}
