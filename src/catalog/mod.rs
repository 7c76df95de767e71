//! Branch catalog: lists pipeline branches from version control and groups
//! them by workflow category.

mod git;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{BranchCategory, BranchCategoryMap, BranchListing};

pub use git::GitCli;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{message}")]
    Retrieval { message: String },
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Source of branch references, one line per ref as `git branch -a` prints them.
#[async_trait]
pub trait RefSource: Send + Sync {
    async fn list_refs(&self) -> Result<Vec<String>>;
}

/// Lists and categorizes the branches of a repository.
#[derive(Clone)]
pub struct BranchCatalog {
    source: Arc<dyn RefSource>,
}

impl BranchCatalog {
    pub fn new(source: impl RefSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    pub async fn list_branches(&self) -> Result<BranchListing> {
        let refs = self.source.list_refs().await?;
        let listing = categorize(refs.iter().map(String::as_str));
        tracing::debug!(
            refs = refs.len(),
            retained = listing.total,
            "Categorized branch listing"
        );
        Ok(listing)
    }
}

impl std::fmt::Debug for BranchCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BranchCatalog").finish_non_exhaustive()
    }
}

/// Normalize one line of branch listing output to a bare branch name.
///
/// Strips the current (`* `) or other-worktree (`+ `) checkout marker and a
/// `remotes/<remote>/` prefix. Returns `None` for blank lines.
pub fn branch_name(line: &str) -> Option<&str> {
    let name = line.trim();
    let name = name
        .strip_prefix("* ")
        .or_else(|| name.strip_prefix("+ "))
        .unwrap_or(name)
        .trim_start();
    let name = match name.strip_prefix("remotes/").and_then(|rest| rest.split_once('/')) {
        Some((_remote, branch)) => branch,
        None => name,
    };
    (!name.is_empty()).then_some(name)
}

/// Keep the branches that follow the category naming convention and group them.
///
/// Relative order and duplicates (a local branch and its remote-tracking
/// twin) are preserved. Names outside the convention are dropped.
pub fn categorize<'a>(lines: impl IntoIterator<Item = &'a str>) -> BranchListing {
    let all: Vec<String> = lines
        .into_iter()
        .filter_map(branch_name)
        .filter(|name| BranchCategory::of(name).is_some())
        .map(str::to_string)
        .collect();

    let mut branches = BranchCategoryMap::default();
    for name in &all {
        branches.insert(name.clone());
    }

    BranchListing {
        total: all.len(),
        branches,
        all,
    }
}
