use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agile_pipeline::{
    api,
    config::{Config, PIPELINE_NAME},
    docs::tree_render,
    models::HealthReport,
};

#[derive(Parser)]
#[command(name = "agile-pipeline")]
#[command(about = "Branch and documentation introspection for the AI development pipeline")]
struct Cli {
    /// Repository root containing docs/, deployment/ and context/
    #[arg(long, global = true, env = "PIPELINE_ROOT")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port for HTTP API [default: $PORT, else 3000]
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind [default: $HOST, else 0.0.0.0]
        #[arg(long)]
        host: Option<String>,
    },
    /// Print the categorized branch listing as JSON
    Branches,
    /// Print the documentation tree
    Docs {
        /// Print JSON instead of an ASCII tree
        #[arg(long)]
        json: bool,
    },
    /// Print the context document of a branch
    Context {
        /// Branch name, e.g. modules/auth
        branch: String,
    },
    /// Check whether a server is running
    Status {
        /// Base URL of the server
        #[arg(long, default_value = "http://localhost:3000")]
        url: String,
    },
}

/// Initialize tracing with output to stderr (for commands that print data) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "agile_pipeline=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // Keep stdout clean for JSON output
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = !matches!(cli.command, None | Some(Commands::Serve { .. }));
    init_tracing(use_stderr);

    let mut config = Config::from_env();
    if let Some(root) = cli.root {
        config.root = root;
    }

    match cli.command {
        Some(Commands::Serve { port, host }) => {
            // PORT and HOST are read by Config; flags only override them
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }
            serve(config).await?;
        }
        None => serve(config).await?,
        Some(Commands::Branches) => {
            let state = api::AppState::from_config(config);
            let listing = state.catalog.list_branches().await?;
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        Some(Commands::Docs { json }) => {
            let state = api::AppState::from_config(config);
            let tree = state.docs.build()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tree)?);
            } else {
                print!("{}", tree_render::render_tree("docs/", &tree));
            }
        }
        Some(Commands::Context { branch }) => {
            let state = api::AppState::from_config(config);
            let context = state.contexts.get_context(&branch)?;
            println!("{}", serde_json::to_string_pretty(&context)?);
        }
        Some(Commands::Status { url }) => {
            let health_url = format!("{}/health", url.trim_end_matches('/'));
            let report: HealthReport = reqwest::get(&health_url)
                .await
                .and_then(|r| r.error_for_status())
                .with_context(|| format!("No server responding at {}", url))?
                .json()
                .await
                .context("Unexpected /health response")?;
            println!(
                "{} is {} ({} environment, version {})",
                report.pipeline, report.status, report.environment, report.version
            );
        }
    }

    Ok(())
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    tracing::info!(
        environment = %config.environment,
        root = %config.root.display(),
        "Starting {} server on {}",
        PIPELINE_NAME,
        addr
    );

    let app = api::create_router(api::AppState::from_config(config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("{} server listening on http://{}", PIPELINE_NAME, addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Ctrl-C received, shutting down gracefully"),
        _ = terminate => tracing::info!("SIGTERM received, shutting down gracefully"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_without_flags_leaves_bind_to_config() {
        let cli = Cli::try_parse_from(["agile-pipeline", "serve"]).unwrap();
        match cli.command {
            Some(Commands::Serve { port, host }) => {
                assert_eq!(port, None);
                assert_eq!(host, None);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn serve_flags_are_parsed() {
        let cli =
            Cli::try_parse_from(["agile-pipeline", "serve", "-p", "8080", "--host", "127.0.0.1"])
                .unwrap();
        match cli.command {
            Some(Commands::Serve { port, host }) => {
                assert_eq!(port, Some(8080));
                assert_eq!(host.as_deref(), Some("127.0.0.1"));
            }
            _ => panic!("expected serve"),
        }
    }
}
