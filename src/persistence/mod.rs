//! Save/load persistence for options and high scores
//!
//! Features:
//! - Versioned JSON envelope
//! - Write to a temp file, then rename over the old save
//! - Missing files are not errors (first run)

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current on-disk format version
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported save version: expected {expected}, got {actual}")]
    Version { expected: u32, actual: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct Envelope<T> {
    version: u32,
    data: T,
}

/// Load a value saved by [`save_json`].
///
/// Returns `Ok(None)` when the file does not exist.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    // Payload stays untyped until the version matches, so a newer layout
    // reports a version error rather than a field error
    let envelope: Envelope<serde_json::Value> = serde_json::from_str(&text)?;
    if envelope.version != FORMAT_VERSION {
        return Err(Error::Version {
            expected: FORMAT_VERSION,
            actual: envelope.version,
        });
    }

    Ok(Some(serde_json::from_value(envelope.data)?))
}

/// Save a value inside a versioned envelope.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(&EnvelopeRef {
        version: FORMAT_VERSION,
        data: value,
    })?;

    let tmp = tmp_path(path);
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    log::debug!("Saved {}", path.display());
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        level: u8,
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded: Option<Sample> = load_json(&dir.path().join("nope.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sample.json");
        let sample = Sample {
            name: "ACE".to_string(),
            level: 2,
        };

        save_json(&path, &sample).unwrap();
        assert!(!tmp_path(&path).exists());

        let loaded: Option<Sample> = load_json(&path).unwrap();
        assert_eq!(loaded, Some(sample));
    }

    #[test]
    fn test_wrong_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.json");
        fs::write(&path, r#"{"version": 0, "data": {"name": "X", "level": 1}}"#).unwrap();

        let err = load_json::<Sample>(&path).unwrap_err();
        assert!(matches!(
            err,
            Error::Version {
                expected: FORMAT_VERSION,
                actual: 0
            }
        ));
    }

    #[test]
    fn test_newer_layout_reports_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.json");
        fs::write(&path, r#"{"version": 2, "data": ["ACE", 2]}"#).unwrap();

        let err = load_json::<Sample>(&path).unwrap_err();
        assert!(matches!(err, Error::Version { actual: 2, .. }));
    }

    #[test]
    fn test_garbage_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(load_json::<Sample>(&path), Err(Error::Json(_))));
    }
}
