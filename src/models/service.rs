use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BranchCategory, BranchCategoryMap, DocDir};

/// Response body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub environment: String,
    pub version: String,
    pub pipeline: String,
    pub branches: BranchSummary,
}

/// Configured branch layout advertised by `/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchSummary {
    pub total: usize,
    pub categories: Vec<BranchCategory>,
}

/// Response body of `GET /api/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStatus {
    pub pipeline: String,
    pub status: String,
    pub features: FeatureFlags,
    pub branches: BranchBreakdown,
    pub deployment: DeploymentInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    pub ai_optimized_branches: bool,
    pub cursor_integration: bool,
    pub specialized_workflows: bool,
    pub branch_isolation: bool,
    pub deliverable_flow: bool,
}

/// Planned number of branches per category.
///
/// These are the configured pipeline layout, not a live count; compare with
/// `GET /api/branches` for what actually exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchBreakdown {
    pub discovery: usize,
    pub integration: usize,
    pub modules: usize,
    pub context: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentInfo {
    pub environment: String,
    pub containerized: bool,
    pub version: String,
}

/// Response body of `GET /api/branches`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchesResponse {
    pub success: bool,
    pub total: usize,
    pub branches: BranchCategoryMap,
    pub all: Vec<String>,
}

/// Response body of `GET /api/branch/{branchName}/context`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchContextResponse {
    pub success: bool,
    pub branch: String,
    pub context: serde_json::Value,
}

/// Response body of `GET /api/docs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocsResponse {
    pub success: bool,
    pub documentation: DocDir,
    pub base_path: String,
}

/// Response body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub name: String,
    pub description: String,
    pub version: String,
    pub environment: String,
    pub endpoints: EndpointIndex,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointIndex {
    pub health: String,
    pub branches: String,
    pub status: String,
    pub docs: String,
    pub branch_context: String,
}
