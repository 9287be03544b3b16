//! On-disk store for competition definitions
//!
//! Competitions are kept as pretty-printed JSON, one file per competition,
//! named after the competition inside a flat directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{GenResult, GenerateError};
use crate::types::Competition;

/// Save a competition as `{dir}/{name}.json`, creating the directory if
/// needed. Returns the path written.
pub fn save(dir: &Path, competition: &Competition) -> GenResult<PathBuf> {
    if competition.name.trim().is_empty() {
        return Err(GenerateError::Validation(
            "competition name cannot be empty".to_string(),
        ));
    }
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.json", competition.name));
    let data = serde_json::to_string_pretty(competition)?;
    fs::write(&path, data)?;
    debug!(path = %path.display(), "saved competition");
    Ok(path)
}

/// Load a competition definition from a JSON file.
pub fn load(path: &Path) -> GenResult<Competition> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// File names of every competition stored in `dir`. A missing directory is
/// an empty store, not an error.
pub fn list(dir: &Path) -> GenResult<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}
