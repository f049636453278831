pub mod codec;
pub mod complexity;
pub mod config;
pub mod editor;
pub mod export;
pub mod gizmo;
pub mod material_registry;
pub mod materializer;
pub mod mesh;
pub mod readback;
pub mod scene_tree;
pub mod schema;
pub mod shape_registry;
pub mod source;

pub use codec::{decode, encode, LevelFormatError};
pub use editor::EditorSession;
pub use materializer::{materialize, MaterializeError};
pub use schema::Level;
