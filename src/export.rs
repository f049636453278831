use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// File extension for exported levels.
pub const LEVEL_FILE_EXTENSION: &str = "level";

/// Export file names come from the wall clock, unix milliseconds.
pub fn export_file_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0);
    format!("{millis}.{LEVEL_FILE_EXTENSION}")
}

/// Write encoded level bytes into `dir` under a timestamp name, creating
/// the directory if needed. Returns the written path.
pub fn write_level_export(dir: impl AsRef<Path>, bytes: &[u8]) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)
        .with_context(|| format!("Creating export directory {}", dir.display()))?;
    let path = dir.join(export_file_name());
    fs::write(&path, bytes)
        .with_context(|| format!("Writing level export {}", path.display()))?;
    Ok(path)
}
