use serde::{Deserialize, Serialize};

/// The fixed set of workflow categories a pipeline branch can belong to.
///
/// A branch belongs to a category when its name starts with the category's
/// prefix, e.g. `discovery/user-research`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum BranchCategory {
    Discovery,
    Integration,
    Modules,
    Context,
}

impl BranchCategory {
    pub const ALL: [BranchCategory; 4] = [
        Self::Discovery,
        Self::Integration,
        Self::Modules,
        Self::Context,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovery => "discovery",
            Self::Integration => "integration",
            Self::Modules => "modules",
            Self::Context => "context",
        }
    }

    /// Name prefix identifying branches of this category, including the separator.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Discovery => "discovery/",
            Self::Integration => "integration/",
            Self::Modules => "modules/",
            Self::Context => "context/",
        }
    }

    /// Category of a branch name, if it follows the pipeline naming convention.
    pub fn of(branch: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| branch.starts_with(category.prefix()))
    }
}

/// Branch names grouped by category.
///
/// Every category is a field, so all four keys are serialized even when a
/// category has no branches.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BranchCategoryMap {
    pub discovery: Vec<String>,
    pub integration: Vec<String>,
    pub modules: Vec<String>,
    pub context: Vec<String>,
}

impl BranchCategoryMap {
    pub fn get(&self, category: BranchCategory) -> &[String] {
        match category {
            BranchCategory::Discovery => &self.discovery,
            BranchCategory::Integration => &self.integration,
            BranchCategory::Modules => &self.modules,
            BranchCategory::Context => &self.context,
        }
    }

    fn get_mut(&mut self, category: BranchCategory) -> &mut Vec<String> {
        match category {
            BranchCategory::Discovery => &mut self.discovery,
            BranchCategory::Integration => &mut self.integration,
            BranchCategory::Modules => &mut self.modules,
            BranchCategory::Context => &mut self.context,
        }
    }

    /// Append a branch to its category. Returns false for names outside the convention.
    pub fn insert(&mut self, branch: impl Into<String>) -> bool {
        let branch = branch.into();
        match BranchCategory::of(&branch) {
            Some(category) => {
                self.get_mut(category).push(branch);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        BranchCategory::ALL
            .iter()
            .map(|category| self.get(*category).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The categorized result of a branch listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BranchListing {
    pub total: usize,
    pub branches: BranchCategoryMap,
    /// Retained branch names in listing order.
    pub all: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_of_matches_prefix_only() {
        assert_eq!(BranchCategory::of("discovery/ux"), Some(BranchCategory::Discovery));
        assert_eq!(BranchCategory::of("modules/auth/api"), Some(BranchCategory::Modules));
        assert_eq!(BranchCategory::of("feature/modules/auth"), None);
        assert_eq!(BranchCategory::of("modules"), None);
    }

    #[test]
    fn empty_map_serializes_every_category() {
        let json = serde_json::to_value(BranchCategoryMap::default()).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 4);
        for category in BranchCategory::ALL {
            assert_eq!(object[category.as_str()], serde_json::json!([]));
        }
    }

    #[test]
    fn insert_rejects_unconventional_names() {
        let mut map = BranchCategoryMap::default();
        assert!(map.insert("context/shared"));
        assert!(!map.insert("main"));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(BranchCategory::Context), ["context/shared".to_string()]);
    }
}
