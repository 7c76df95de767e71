//! Per-branch context files.
//!
//! Each pipeline branch may have a JSON context document committed under the
//! context directory. The file name is the branch name with its first `/`
//! replaced by `-`, so `modules/auth` maps to `context/modules-auth.json`.
//!
//! Only the first separator is replaced. A branch such as `modules/auth/oauth`
//! therefore resolves to the nested path `modules-auth/oauth.json`, and names
//! outside the category convention can collide (`a/b-c` and `a-b/c` both map
//! to `a-b-c.json`).

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("No context file for branch {branch}")]
    NotFound { branch: String },

    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ContextError>;

/// File name holding the context of `branch`.
pub fn context_file_name(branch: &str) -> String {
    format!("{}.json", branch.replacen('/', "-", 1))
}

/// Resolves branch names to their JSON context documents.
#[derive(Debug, Clone)]
pub struct ContextLookup {
    dir: PathBuf,
}

impl ContextLookup {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the context file for `branch`, or `None` when the derived
    /// name would leave the context directory.
    pub fn context_path(&self, branch: &str) -> Option<PathBuf> {
        let file_name = context_file_name(branch);
        if file_name.contains(['\\', '\0']) {
            return None;
        }
        let relative = Path::new(&file_name);
        if !relative.components().all(|c| matches!(c, Component::Normal(_))) {
            return None;
        }
        Some(self.dir.join(relative))
    }

    /// Load and parse the context document of `branch`.
    pub fn get_context(&self, branch: &str) -> Result<serde_json::Value> {
        let not_found = || ContextError::NotFound {
            branch: branch.to_string(),
        };

        let path = match self.context_path(branch) {
            Some(path) => path,
            None => {
                tracing::warn!(branch, "Rejected context lookup outside context directory");
                return Err(not_found());
            }
        };

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found()),
            Err(source) => {
                return Err(ContextError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        serde_json::from_str(&content).map_err(|source| ContextError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn lookup_with(files: &[(&str, &str)]) -> (tempfile::TempDir, ContextLookup) {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }
        let lookup = ContextLookup::new(dir.path());
        (dir, lookup)
    }

    #[test]
    fn file_name_replaces_first_separator_only() {
        assert_eq!(context_file_name("modules/foo"), "modules-foo.json");
        assert_eq!(context_file_name("modules/foo/bar"), "modules-foo/bar.json");
        assert_eq!(context_file_name("main"), "main.json");
    }

    #[test]
    fn file_name_is_injective_for_single_slash_category_branches() {
        let branches = [
            "discovery/a-b",
            "discovery/a",
            "integration/a-b",
            "modules/a-b",
            "modules/b",
            "context/a-b",
        ];
        let mut names: Vec<String> = branches.iter().map(|b| context_file_name(b)).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), branches.len());
    }

    #[test]
    fn unconventional_names_can_collide() {
        assert_eq!(context_file_name("a/b-c"), context_file_name("a-b/c"));
        assert_eq!(context_file_name("a/b-c"), context_file_name("a-b-c"));
    }

    #[test]
    fn returns_parsed_context() {
        let (_dir, lookup) = lookup_with(&[("modules-foo.json", r#"{"owner": "team-a", "deps": [1, 2]}"#)]);

        let context = lookup.get_context("modules/foo").unwrap();
        assert_eq!(context["owner"], "team-a");
        assert_eq!(context["deps"], serde_json::json!([1, 2]));
    }

    #[test]
    fn missing_file_is_not_found() {
        let (_dir, lookup) = lookup_with(&[]);

        let err = lookup.get_context("modules/foo").unwrap_err();
        assert!(matches!(err, ContextError::NotFound { ref branch } if branch == "modules/foo"));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let (_dir, lookup) = lookup_with(&[("discovery-ux.json", "{ not json")]);

        let err = lookup.get_context("discovery/ux").unwrap_err();
        assert!(matches!(err, ContextError::Parse { .. }));
    }

    #[test]
    fn nested_branch_resolves_to_subdirectory() {
        let (_dir, lookup) = lookup_with(&[("modules-foo/bar.json", "[]")]);

        let context = lookup.get_context("modules/foo/bar").unwrap();
        assert_eq!(context, serde_json::json!([]));
    }

    #[test]
    fn directory_in_place_of_file_is_io_error() {
        let (dir, lookup) = lookup_with(&[]);
        fs::create_dir(dir.path().join("context-x.json")).unwrap();

        let err = lookup.get_context("context/x").unwrap_err();
        assert!(matches!(err, ContextError::Io { .. }));
    }

    #[test]
    fn escaping_names_are_not_found() {
        let (dir, lookup) = lookup_with(&[]);
        fs::write(dir.path().join("secret.json"), "{}").unwrap();

        for branch in ["x/../../secret", "modules/a/../../secret", "a\\b", "a/b\0c"] {
            assert!(lookup.context_path(branch).is_none(), "{branch}");
            assert!(matches!(
                lookup.get_context(branch),
                Err(ContextError::NotFound { .. })
            ));
        }
    }
}
