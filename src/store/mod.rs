// SPDX-FileCopyrightText: 2026 the notemap authors
// SPDX-License-Identifier: MIT

//! Persistence for viewer preferences on disk.
//!
//! Preferences live in a single JSON file inside a caller-chosen folder.
//! Loads tolerate a missing file (first run) by falling back to defaults;
//! saves go through a temp-file-plus-rename so a crash mid-write never
//! leaves a truncated file behind.

use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::LinkKind;
use crate::optimize::PerformanceMode;

const PREFERENCES_FILENAME: &str = "notemap-preferences.json";

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

/// Viewer settings that survive restarts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub render_mode: LinkKind,
    pub performance_mode: PerformanceMode,
}

/// Folder holding the preferences file.
#[derive(Debug, Clone)]
pub struct PreferencesFolder {
    root: PathBuf,
}

impl PreferencesFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.root.join(PREFERENCES_FILENAME)
    }

    /// Loads preferences, falling back to defaults when the file does not
    /// exist yet. Malformed JSON is still an error so a typo in a
    /// hand-edited file does not get silently discarded.
    pub fn load_or_default(&self) -> Result<Preferences, StoreError> {
        let path = self.preferences_path();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                return Ok(Preferences::default());
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        serde_json::from_str(&text).map_err(|source| StoreError::Json { path, source })
    }

    pub fn save(&self, preferences: &Preferences) -> Result<(), StoreError> {
        fs::create_dir_all(self.root()).map_err(|source| StoreError::Io {
            path: self.root.clone(),
            source,
        })?;

        let path = self.preferences_path();
        let text = serde_json::to_string_pretty(preferences)
            .map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?;

        write_atomic(&path, format!("{text}\n").as_bytes())
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let tmp_path = path.with_extension("json.tmp");

    let io_err = |source: io::Error| StoreError::Io {
        path: tmp_path.clone(),
        source,
    };

    let mut file = fs::File::create(&tmp_path).map_err(io_err)?;
    file.write_all(bytes).map_err(io_err)?;
    drop(file);

    fs::rename(&tmp_path, path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    // Rename durability is filesystem-dependent; this is best effort.
    let _ = fs::File::open(dir).and_then(|d| d.sync_all());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let folder = PreferencesFolder::new(dir.path());
        let prefs = folder.load_or_default().expect("load");
        assert_eq!(prefs, Preferences::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let folder = PreferencesFolder::new(dir.path().join("nested"));
        let prefs = Preferences {
            render_mode: LinkKind::Tag,
            performance_mode: PerformanceMode::Performance,
        };
        folder.save(&prefs).expect("save");
        assert_eq!(folder.load_or_default().expect("load"), prefs);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let folder = PreferencesFolder::new(dir.path());
        fs::write(folder.preferences_path(), "{ not json").expect("write");
        assert!(matches!(
            folder.load_or_default(),
            Err(StoreError::Json { .. })
        ));
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let dir = tempfile::tempdir().expect("tempdir");
        let folder = PreferencesFolder::new(dir.path());
        fs::write(
            folder.preferences_path(),
            r#"{"renderMode":"similarity","futureKnob":42}"#,
        )
        .expect("write");
        let prefs = folder.load_or_default().expect("load");
        assert_eq!(prefs.render_mode, LinkKind::Similarity);
        assert_eq!(prefs.performance_mode, PerformanceMode::default());
    }
}
