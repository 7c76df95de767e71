use axum::{
    extract::{OriginalUri, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use super::error::ApiError;
use super::AppState;
use crate::config::{PIPELINE_NAME, VERSION};
use crate::models::*;

/// URL prefix under which the documentation files are served.
const DOCS_BASE_PATH: &str = "/docs";

// ============================================================
// Static descriptors
// ============================================================

/// Planned branch layout of the pipeline.
///
/// Deliberately static: this is what `/health` and `/api/status` advertise,
/// and it is not reconciled with the live listing of `/api/branches`.
fn planned_branches() -> BranchBreakdown {
    BranchBreakdown {
        discovery: 4,
        integration: 3,
        modules: 4,
        context: 1,
        total: 12,
    }
}

fn endpoint_index() -> EndpointIndex {
    EndpointIndex {
        health: "/health".to_string(),
        branches: "/api/branches".to_string(),
        status: "/api/status".to_string(),
        docs: "/api/docs".to_string(),
        branch_context: "/api/branch/:branchName/context".to_string(),
    }
}

const FEATURES: &[&str] = &[
    "12 specialized AI-optimized branches",
    "Cursor IDE integration with branch-specific rules",
    "Context isolation and deliverable flow",
    "Cross-project coordination capabilities",
    "Automated deployment pipeline",
];

// ============================================================
// Service
// ============================================================

pub async fn root(State(state): State<AppState>) -> Json<ServiceDescriptor> {
    Json(ServiceDescriptor {
        name: PIPELINE_NAME.to_string(),
        description: "AI-driven agile development pipeline with specialized branch workflows"
            .to_string(),
        version: VERSION.to_string(),
        environment: state.config.environment.clone(),
        endpoints: endpoint_index(),
        features: FEATURES.iter().map(|s| s.to_string()).collect(),
    })
}

/// Liveness probe. Performs no filesystem or git access.
pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        environment: state.config.environment.clone(),
        version: VERSION.to_string(),
        pipeline: PIPELINE_NAME.to_string(),
        branches: BranchSummary {
            total: planned_branches().total,
            categories: BranchCategory::ALL.to_vec(),
        },
    })
}

pub async fn pipeline_status(State(state): State<AppState>) -> Json<PipelineStatus> {
    Json(PipelineStatus {
        pipeline: PIPELINE_NAME.to_string(),
        status: "operational".to_string(),
        features: FeatureFlags {
            ai_optimized_branches: true,
            cursor_integration: true,
            specialized_workflows: true,
            branch_isolation: true,
            deliverable_flow: true,
        },
        branches: planned_branches(),
        deployment: DeploymentInfo {
            environment: state.config.environment.clone(),
            containerized: state.config.containerized,
            version: VERSION.to_string(),
        },
    })
}

// ============================================================
// Branches
// ============================================================

pub async fn list_branches(
    State(state): State<AppState>,
) -> Result<Json<BranchesResponse>, ApiError> {
    let listing = state
        .catalog
        .list_branches()
        .await
        .map_err(ApiError::branches)?;

    Ok(Json(BranchesResponse {
        success: true,
        total: listing.total,
        branches: listing.branches,
        all: listing.all,
    }))
}

pub async fn get_branch_context(
    State(state): State<AppState>,
    Path(branch_name): Path<String>,
) -> Result<Json<BranchContextResponse>, ApiError> {
    let context = state
        .contexts
        .get_context(&branch_name)
        .map_err(|e| ApiError::context(e, state.config.is_production()))?;

    Ok(Json(BranchContextResponse {
        success: true,
        branch: branch_name,
        context,
    }))
}

// ============================================================
// Documentation
// ============================================================

pub async fn get_docs(State(state): State<AppState>) -> Result<Json<DocsResponse>, ApiError> {
    let documentation = state
        .docs
        .build()
        .map_err(|e| ApiError::docs(e, state.config.is_production()))?;

    Ok(Json(DocsResponse {
        success: true,
        documentation,
        base_path: DOCS_BASE_PATH.to_string(),
    }))
}

// ============================================================
// Fallback
// ============================================================

pub async fn not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "Not Found",
            "message": "The requested resource was not found",
            "path": uri.path(),
        })),
    )
}
