mod error;
mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{handler::HandlerWithoutStateExt, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir, trace::TraceLayer};

use crate::catalog::{BranchCatalog, GitCli};
use crate::config::Config;
use crate::context::ContextLookup;
use crate::docs::DocTreeBuilder;

pub use error::{ApiError, GENERIC_MESSAGE};

/// Shared, read-only state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: BranchCatalog,
    pub contexts: ContextLookup,
    pub docs: DocTreeBuilder,
}

impl AppState {
    /// State with a custom branch catalog, e.g. one backed by a fixed ref list.
    pub fn new(config: Config, catalog: BranchCatalog) -> Self {
        Self {
            contexts: ContextLookup::new(config.context_dir()),
            docs: DocTreeBuilder::new(config.docs_dir()),
            catalog,
            config: Arc::new(config),
        }
    }

    /// State backed by the `git` binary in the configured repository root.
    pub fn from_config(config: Config) -> Self {
        let catalog = BranchCatalog::new(GitCli::new(config.root.clone(), config.git_timeout));
        Self::new(config, catalog)
    }
}

pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    let docs_files = ServeDir::new(config.docs_dir())
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(handlers::not_found.into_service());
    let deployment_files = ServeDir::new(config.deployment_dir())
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(handlers::not_found.into_service());

    let api = Router::new()
        .route("/branches", get(handlers::list_branches))
        .route("/branch/{branch_name}/context", get(handlers::get_branch_context))
        .route("/status", get(handlers::pipeline_status))
        .route("/docs", get(handlers::get_docs))
        .method_not_allowed_fallback(handlers::not_found);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .nest_service("/docs", docs_files)
        .nest_service("/deployment", deployment_files)
        // A known path with an unsupported method is reported like an unknown path
        .method_not_allowed_fallback(handlers::not_found)
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::cors_layer(&config.cors_origins))
                .layer(CatchPanicLayer::custom(middleware::panic_response(
                    config.is_production(),
                ))),
        )
        // Applied to the layered routes, so panic and preflight responses get the headers too
        .layer(axum::middleware::map_response(middleware::security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
