//! Server configuration, built once at startup and passed into the router.

use std::path::PathBuf;
use std::time::Duration;

/// Name reported by the service descriptor, `/health` and `/api/status`.
pub const PIPELINE_NAME: &str = "AutomatedAgilev1";

/// Crate version reported by the service endpoints.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_ENVIRONMENT: &str = "development";
const DEFAULT_GIT_TIMEOUT_SECS: u64 = 10;
const PRODUCTION_ORIGINS: &[&str] = &["https://yourdomain.com"];
const DEVELOPMENT_ORIGINS: &[&str] = &["http://localhost:3000", "http://localhost:3001"];

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Deployment environment name (from `NODE_ENV`).
    pub environment: String,
    /// Whether the server runs inside a container (`DOCKER_CONTAINER=true`).
    pub containerized: bool,
    /// Repository root. Git runs here and the served directories live under it.
    pub root: PathBuf,
    /// Upper bound on a single `git branch -a` invocation.
    pub git_timeout: Duration,
    /// Origins allowed by CORS.
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let environment = lookup("NODE_ENV")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());

        let port = lookup("PORT")
            .and_then(|s| s.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let containerized = lookup("DOCKER_CONTAINER").as_deref() == Some("true");

        let root = lookup("PIPELINE_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let git_timeout = lookup("GIT_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_GIT_TIMEOUT_SECS));

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| default_origins(&environment));

        Self {
            host,
            port,
            environment,
            containerized,
            root,
            git_timeout,
            cors_origins,
        }
    }

    /// Development defaults rooted at `root` (for tests and offline commands).
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::from_lookup(|_| None)
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn docs_dir(&self) -> PathBuf {
        self.root.join("docs")
    }

    pub fn deployment_dir(&self) -> PathBuf {
        self.root.join("deployment")
    }

    pub fn context_dir(&self) -> PathBuf {
        self.root.join("context")
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_origins(environment: &str) -> Vec<String> {
    let origins = if environment == "production" {
        PRODUCTION_ORIGINS
    } else {
        DEVELOPMENT_ORIGINS
    };
    origins.iter().map(|s| s.to_string()).collect()
}
