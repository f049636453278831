use glam::Vec3;
use summit_editor::gizmo::GizmoMode;
use summit_editor::material_registry::MaterialRegistry;
use summit_editor::schema::{
    ColorData, Level, LevelNode, NodeContent, QuatData, Vec3Data, FORMAT_VERSION_CURRENT,
    MATERIAL_COLORED, SHAPE_CUBE,
};
use summit_editor::shape_registry::ShapeRegistry;
use summit_editor::EditorSession;

fn standard_session() -> EditorSession {
    EditorSession::empty(ShapeRegistry::standard(), MaterialRegistry::standard())
}

fn plain(content: NodeContent) -> LevelNode {
    LevelNode { content, is_locked: false, animations: Vec::new() }
}

fn colored_static_level() -> Level {
    Level {
        format_version: FORMAT_VERSION_CURRENT,
        title: String::new(),
        creators: String::new(),
        description: String::new(),
        max_checkpoint_count: 0,
        ambience: None,
        nodes: vec![plain(NodeContent::Static {
            shape: SHAPE_CUBE,
            material: MATERIAL_COLORED,
            position: Vec3Data { x: 1.0, y: 0.0, z: 0.0 },
            scale: Vec3Data { x: 1.0, y: 1.0, z: 1.0 },
            rotation: QuatData::default(),
            color: ColorData { r: 0.2, g: 0.4, b: 0.6, a: 1.0 },
            is_neon: false,
        })],
    }
}

#[test]
fn insert_appends_to_tree_and_registry() {
    let mut session = standard_session();
    let id = session.insert(SHAPE_CUBE).expect("insert succeeds");
    assert_eq!(session.tree().len(), 1);
    assert_eq!(session.tree().draggables(), &[id]);
    assert_eq!(session.complexity(), 2);
}

#[test]
fn insert_without_loaded_tables_is_a_no_op() {
    let mut session = EditorSession::empty(ShapeRegistry::new(), MaterialRegistry::new());
    assert!(session.insert(SHAPE_CUBE).is_none());
    assert!(session.tree().is_empty());
    assert!(session.tree().draggables().is_empty());
}

#[test]
fn clone_copies_the_transform_but_shares_the_material() {
    let level = colored_static_level();
    let mut session =
        EditorSession::from_level(&level, ShapeRegistry::standard(), MaterialRegistry::standard())
            .expect("level materializes");
    let source_id = session.tree().draggables()[0];
    let clone_id = session.clone_node(source_id).expect("clone succeeds");
    assert_ne!(source_id, clone_id);
    assert_eq!(session.tree().draggables().len(), 2);

    // Moving the clone leaves the source alone.
    assert!(session.set_node_position(clone_id, Vec3::new(9.0, 9.0, 9.0)));
    let source = session.tree().get(source_id).expect("source alive");
    assert_eq!(source.position, Vec3::new(1.0, 0.0, 0.0));

    // The material handle is shared, so a uniform edit through the clone is
    // visible through the source.
    let clone_material = session
        .tree()
        .get(clone_id)
        .and_then(|node| node.material.clone())
        .expect("clone has a material");
    clone_material.lock().unwrap().uniforms.diffuse_color = glam::Vec4::new(1.0, 0.0, 0.0, 1.0);
    let source_material = session
        .tree()
        .get(source_id)
        .and_then(|node| node.material.clone())
        .expect("source has a material");
    assert_eq!(
        source_material.lock().unwrap().uniforms.diffuse_color,
        glam::Vec4::new(1.0, 0.0, 0.0, 1.0)
    );

    // Geometry is shared outright.
    let source_geometry =
        session.tree().get(source_id).and_then(|node| node.geometry.clone()).expect("geometry");
    let clone_geometry =
        session.tree().get(clone_id).and_then(|node| node.geometry.clone()).expect("geometry");
    assert!(std::sync::Arc::ptr_eq(&source_geometry, &clone_geometry));
}

#[test]
fn cloning_a_group_is_shallow() {
    let level = Level {
        nodes: vec![plain(NodeContent::Group {
            position: Vec3Data::default(),
            scale: Vec3Data { x: 1.0, y: 1.0, z: 1.0 },
            rotation: QuatData::default(),
            children: vec![plain(NodeContent::Static {
                shape: SHAPE_CUBE,
                material: 0,
                position: Vec3Data::default(),
                scale: Vec3Data { x: 1.0, y: 1.0, z: 1.0 },
                rotation: QuatData::default(),
                color: ColorData::default(),
                is_neon: false,
            })],
        })],
        ..colored_static_level()
    };
    let mut session =
        EditorSession::from_level(&level, ShapeRegistry::standard(), MaterialRegistry::standard())
            .expect("level materializes");
    let group_id = session.tree().roots()[0];
    let clone_id = session.clone_node(group_id).expect("clone succeeds");
    let clone = session.tree().get(clone_id).expect("clone alive");
    assert!(clone.children().is_empty());
    assert_eq!(session.tree().roots().len(), 2);
}

#[test]
fn delete_clears_tree_registry_selection_and_gizmo() {
    let mut session = standard_session();
    let id = session.insert(SHAPE_CUBE).expect("insert succeeds");
    session.select(Some(id));
    assert_eq!(session.gizmo().attached(), Some(id));

    assert!(session.delete_selected());
    assert!(session.tree().get(id).is_none());
    assert!(session.tree().draggables().is_empty());
    assert_eq!(session.selection(), None);
    assert_eq!(session.gizmo().attached(), None);

    // Nothing selected anymore: a further delete is a quiet no-op.
    assert!(!session.delete_selected());
    assert!(!session.delete(id));
}

#[test]
fn deleting_a_group_cascades_to_its_children() {
    let level = Level {
        nodes: vec![plain(NodeContent::Group {
            position: Vec3Data::default(),
            scale: Vec3Data { x: 1.0, y: 1.0, z: 1.0 },
            rotation: QuatData::default(),
            children: vec![
                plain(NodeContent::Static {
                    shape: SHAPE_CUBE,
                    material: 0,
                    position: Vec3Data::default(),
                    scale: Vec3Data { x: 1.0, y: 1.0, z: 1.0 },
                    rotation: QuatData::default(),
                    color: ColorData::default(),
                    is_neon: false,
                }),
                plain(NodeContent::Sign {
                    position: Vec3Data::default(),
                    rotation: QuatData::default(),
                    text: "gone soon".to_string(),
                }),
            ],
        })],
        ..colored_static_level()
    };
    let mut session =
        EditorSession::from_level(&level, ShapeRegistry::standard(), MaterialRegistry::standard())
            .expect("level materializes");
    assert_eq!(session.tree().draggables().len(), 3);

    let group_id = session.tree().roots()[0];
    let child_id = session.tree().get(group_id).expect("group alive").children()[0];
    // Select a child, then delete the whole group: the selection and gizmo
    // must not survive pointing at a dead subtree.
    session.select(Some(child_id));
    assert!(session.delete(group_id));
    assert!(session.tree().is_empty());
    assert!(session.tree().draggables().is_empty());
    assert_eq!(session.selection(), None);
    assert_eq!(session.gizmo().attached(), None);
}

#[test]
fn transform_mode_switches_the_gizmo() {
    let mut session = standard_session();
    assert_eq!(session.gizmo().mode(), GizmoMode::Translate);
    session.set_transform_mode(GizmoMode::Rotate);
    assert_eq!(session.gizmo().mode(), GizmoMode::Rotate);
    session.set_transform_mode(GizmoMode::Scale);
    assert_eq!(session.gizmo().mode(), GizmoMode::Scale);
}

#[test]
fn inserted_and_cloned_nodes_read_back_into_the_document() {
    let mut session = standard_session();
    let id = session.insert(SHAPE_CUBE).expect("insert succeeds");
    assert!(session.set_node_position(id, Vec3::new(0.0, 3.0, 0.0)));
    session.clone_node(id).expect("clone succeeds");

    let document = session.level_document();
    assert_eq!(document.nodes.len(), 2);
    let NodeContent::Static { shape, position, .. } = &document.nodes[0].content else {
        panic!("expected a static node");
    };
    assert_eq!(*shape, SHAPE_CUBE);
    assert_eq!(position.y, 3.0);
}
