//! Write-through persistence for the subject collection.
//!
//! The whole collection lives under a single JSON file in the data
//! directory. It is read once at startup and rewritten wholesale on every
//! mutation; there is no diffing or batching. A missing or unreadable file
//! degrades silently to an empty collection.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::warn;

use crate::models::Subject;

/// File name holding the serialized subject collection.
const STORE_FILE: &str = "subjects.json";

pub struct SubjectStore {
    data_dir: PathBuf,
}

impl SubjectStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE)
    }

    /// Load the persisted collection.
    ///
    /// An absent file is the normal first-run case. A file that fails to
    /// read or parse is logged and treated as empty rather than surfaced to
    /// the user.
    pub fn load(&self) -> Vec<Subject> {
        let path = self.store_path();
        if !path.exists() {
            return Vec::new();
        }

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read subject store");
                return Vec::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(subjects) => subjects,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to parse subject store");
                Vec::new()
            }
        }
    }

    /// Rewrite the whole collection.
    pub fn save(&self, subjects: &[Subject]) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("Failed to create data directory: {}", self.data_dir.display()))?;
        let contents = serde_json::to_string_pretty(subjects)?;
        std::fs::write(self.store_path(), contents)
            .context("Failed to write subject store")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SubjectStore::new(dir.path().to_path_buf());
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SubjectStore::new(dir.path().to_path_buf());

        let subjects = vec![
            Subject {
                name: "Math".into(),
                attended: 3,
                total: 4,
            },
            Subject {
                name: "Physics".into(),
                attended: 2,
                total: 10,
            },
        ];
        store.save(&subjects).unwrap();

        assert_eq!(store.load(), subjects);
    }

    #[test]
    fn test_save_overwrites_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let store = SubjectStore::new(dir.path().to_path_buf());

        store.save(&[Subject::new("Math"), Subject::new("Physics")]).unwrap();
        store.save(&[Subject::new("Chemistry")]).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Chemistry");
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SubjectStore::new(dir.path().to_path_buf());
        std::fs::write(dir.path().join(STORE_FILE), "not json").unwrap();
        assert!(store.load().is_empty());
    }
}
