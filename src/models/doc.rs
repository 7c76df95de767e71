use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A directory level of the documentation tree, keyed by entry name.
pub type DocDir = BTreeMap<String, DocNode>;

/// A node in the documentation tree.
///
/// Serialized without a tag: directories are plain JSON objects of their
/// children, files are `{ path, size, modified }` objects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DocNode {
    File(DocFile),
    Dir(DocDir),
}

impl DocNode {
    pub fn as_dir(&self) -> Option<&DocDir> {
        match self {
            Self::Dir(dir) => Some(dir),
            Self::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&DocFile> {
        match self {
            Self::File(file) => Some(file),
            Self::Dir(_) => None,
        }
    }
}

/// A Markdown document found in the documentation tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DocFile {
    /// Path relative to the documentation root, always `/`-separated.
    pub path: String,
    /// Size in bytes.
    pub size: u64,
    pub modified: DateTime<Utc>,
}
