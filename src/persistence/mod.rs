//! JSON save/load helpers
//!
//! Writes go to a `.tmp` sibling first and are renamed over the target, so a
//! crash mid-write never leaves a truncated file behind.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{} does not exist", path.display())]
    Missing { path: PathBuf },
    #[error("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Read and deserialize a JSON file
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, PersistError> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            PersistError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            PersistError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_str(&text).map_err(|source| PersistError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize to pretty JSON and replace `path`
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| PersistError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = tmp_path(path);
    let io_err = |source: io::Error| PersistError::Io {
        path: path.to_path_buf(),
        source,
    };
    std::fs::write(&tmp, json).map_err(io_err)?;
    std::fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_save_replaces_and_cleans_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        let mut value = BTreeMap::new();
        value.insert("a".to_string(), 1u32);
        save_json(&path, &value).unwrap();
        value.insert("b".to_string(), 2u32);
        save_json(&path, &value).unwrap();

        let loaded: BTreeMap<String, u32> = load_json(&path).unwrap();
        assert_eq!(loaded, value);
        assert!(!dir.path().join("data.json.tmp").exists());
    }

    #[test]
    fn test_error_kinds() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            load_json::<Vec<u32>>(&missing),
            Err(PersistError::Missing { .. })
        ));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "[1, 2,").unwrap();
        assert!(matches!(
            load_json::<Vec<u32>>(&bad),
            Err(PersistError::Json { .. })
        ));

        let unwritable = dir.path().join("no_such_dir").join("x.json");
        assert!(matches!(
            save_json(&unwritable, &vec![1u32]),
            Err(PersistError::Io { .. })
        ));
    }
}
