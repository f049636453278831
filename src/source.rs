use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Where level bytes come from: a file the user picked, or a published
/// level addressed by id (and optionally a specific iteration). The core
/// only consumes the bytes; everything here is plumbing for that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelSource {
    LocalFile(PathBuf),
    Remote { id: String, iteration: Option<u32> },
}

impl LevelSource {
    /// CLI-friendly parse: an existing path (or anything path-shaped) is a
    /// local file, anything else is treated as a published level id,
    /// optionally suffixed `@<iteration>`.
    pub fn parse(arg: &str) -> Self {
        let path = Path::new(arg);
        if path.exists() || arg.contains(std::path::MAIN_SEPARATOR) || arg.ends_with(".level") {
            return LevelSource::LocalFile(path.to_path_buf());
        }
        match arg.split_once('@') {
            Some((id, iteration)) => match iteration.parse() {
                Ok(iteration) => {
                    LevelSource::Remote { id: id.to_string(), iteration: Some(iteration) }
                }
                Err(_) => LevelSource::LocalFile(path.to_path_buf()),
            },
            None => LevelSource::Remote { id: arg.to_string(), iteration: None },
        }
    }

    pub fn fetch(&self, base_url: &str) -> Result<Vec<u8>> {
        match self {
            LevelSource::LocalFile(path) => {
                fs::read(path).with_context(|| format!("Reading level file {}", path.display()))
            }
            LevelSource::Remote { id, iteration } => fetch_remote(base_url, id, *iteration),
        }
    }
}

/// `<base>/download/<id>/<iteration>`; a bare id goes through the details
/// lookup first to learn its newest iteration.
pub fn download_url(base_url: &str, id: &str, iteration: u32) -> String {
    format!("{}/download/{}/{}", base_url.trim_end_matches('/'), id, iteration)
}

pub fn details_url(base_url: &str, id: &str) -> String {
    format!("{}/details/{}", base_url.trim_end_matches('/'), id)
}

#[cfg(feature = "remote_levels")]
fn fetch_remote(base_url: &str, id: &str, iteration: Option<u32>) -> Result<Vec<u8>> {
    use serde::Deserialize;
    use std::io::Read;

    #[derive(Deserialize)]
    struct LevelDetails {
        iteration: u32,
    }

    let iteration = match iteration {
        Some(iteration) => iteration,
        None => {
            let url = details_url(base_url, id);
            let details: LevelDetails = ureq::get(&url)
                .call()
                .with_context(|| format!("Requesting level details from {url}"))?
                .into_json()
                .with_context(|| format!("Parsing level details from {url}"))?;
            details.iteration
        }
    };

    let url = download_url(base_url, id, iteration);
    let response =
        ureq::get(&url).call().with_context(|| format!("Downloading level from {url}"))?;
    let mut bytes = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut bytes)
        .with_context(|| format!("Reading level bytes from {url}"))?;
    Ok(bytes)
}

#[cfg(not(feature = "remote_levels"))]
fn fetch_remote(_base_url: &str, id: &str, _iteration: Option<u32>) -> Result<Vec<u8>> {
    anyhow::bail!("level '{id}' is remote but this build has no remote_levels support")
}
