//! File System Event Definitions
//!
//! Defines the stable event kinds and payloads delivered to watch callbacks
//! after debouncing.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Kind of stable file change delivered to a watch callback
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FileEventKind {
    /// File was created
    Add,
    /// File was modified
    Change,
    /// File was removed
    Unlink,
}

impl FileEventKind {
    /// String form used in callbacks, logs, and the activity store
    pub fn as_str(&self) -> &'static str {
        match self {
            FileEventKind::Add => "add",
            FileEventKind::Change => "change",
            FileEventKind::Unlink => "unlink",
        }
    }
}

impl std::fmt::Display for FileEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stable file change event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StableFileEvent {
    /// Kind of change
    pub kind: FileEventKind,
    /// Full path to the changed file
    pub path: String,
    /// Path relative to the project root, when the file is inside it
    pub relative_path: Option<String>,
    /// Project ID (derived from the project directory name)
    pub project_id: Option<String>,
    /// Timestamp of the event
    pub timestamp: String,
}

impl StableFileEvent {
    /// Create a new stable file event
    pub fn new(kind: FileEventKind, path: &Path, project_path: &Path) -> Self {
        let relative_path = path
            .strip_prefix(project_path)
            .ok()
            .map(|p| p.to_string_lossy().to_string());

        let project_id = project_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string());

        Self {
            kind,
            path: path.to_string_lossy().to_string(),
            relative_path,
            project_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Full path as a PathBuf
    pub fn path_buf(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }
}
