//! Documentation tree: a nested view of the Markdown files under `docs/`.

pub mod tree_render;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::{DocDir, DocFile, DocNode};

#[derive(Debug, Error)]
pub enum DocTreeError {
    #[error("Directory cycle detected at {path}")]
    CycleDetected { path: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, DocTreeError>;

/// Builds the documentation tree rooted at a fixed directory.
#[derive(Debug, Clone)]
pub struct DocTreeBuilder {
    root: PathBuf,
}

impl DocTreeBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn build(&self) -> Result<DocDir> {
        build_tree(&self.root)
    }
}

/// Walk `root` and collect its Markdown files.
///
/// Directories (including symlinked ones) become nested maps, `.md` files
/// become [`DocFile`] leaves and everything else is skipped. A missing root
/// yields an empty tree. Re-entering a directory already on the current
/// descent path fails with [`DocTreeError::CycleDetected`].
pub fn build_tree(root: &Path) -> Result<DocDir> {
    let meta = match fs::metadata(root) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(DocDir::new()),
        Err(source) => return Err(io_error(root, source)),
    };

    let mut ancestors = Vec::new();
    walk(root, root, &meta, &mut ancestors)
}

fn walk(
    root: &Path,
    dir: &Path,
    meta: &fs::Metadata,
    ancestors: &mut Vec<DirId>,
) -> Result<DocDir> {
    let id = dir_id(dir, meta).map_err(|e| io_error(dir, e))?;
    if ancestors.contains(&id) {
        tracing::warn!(path = %dir.display(), "Symlink cycle in documentation tree");
        return Err(DocTreeError::CycleDetected {
            path: dir.display().to_string(),
        });
    }
    ancestors.push(id);

    let mut children = DocDir::new();
    let entries = fs::read_dir(dir).map_err(|e| io_error(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_error(dir, e))?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        // Follows symlinks: a linked directory is walked like a real one
        let entry_meta = fs::metadata(&path).map_err(|e| io_error(&path, e))?;

        if entry_meta.is_dir() {
            let subtree = walk(root, &path, &entry_meta, ancestors)?;
            children.insert(name, DocNode::Dir(subtree));
        } else if name.ends_with(".md") {
            let modified = entry_meta.modified().map_err(|e| io_error(&path, e))?;
            children.insert(
                name,
                DocNode::File(DocFile {
                    path: relative_path(root, &path),
                    size: entry_meta.len(),
                    modified: modified.into(),
                }),
            );
        }
    }

    ancestors.pop();
    Ok(children)
}

/// `/`-separated path of `path` relative to `root`.
fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(unix)]
type DirId = (u64, u64);

#[cfg(unix)]
fn dir_id(_dir: &Path, meta: &fs::Metadata) -> std::io::Result<DirId> {
    use std::os::unix::fs::MetadataExt;
    Ok((meta.dev(), meta.ino()))
}

#[cfg(not(unix))]
type DirId = PathBuf;

#[cfg(not(unix))]
fn dir_id(dir: &Path, _meta: &fs::Metadata) -> std::io::Result<DirId> {
    fs::canonicalize(dir)
}

fn io_error(path: &Path, source: std::io::Error) -> DocTreeError {
    DocTreeError::Io {
        path: path.display().to_string(),
        source,
    }
}
