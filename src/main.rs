use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use storefront::{
    api::routes::build_app,
    db::SqlStore,
    utils::{config::Config, logging::init_tracing},
    AppState,
};

/// Storefront - e-commerce REST backend
///
/// Configuration is read from the environment (and `.env`); see the
/// README for the full list of variables.
#[derive(Parser, Debug)]
#[command(name = "storefront-server", version, about)]
struct Cli {
    /// Extra env file loaded before `.env`
    #[arg(long, env = "STOREFRONT_ENV_FILE")]
    env_file: Option<PathBuf>,

    /// Enable debug logging (ignored when RUST_LOG is set)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.env_file {
        dotenvy::from_path(path)
            .with_context(|| format!("failed to load env file {}", path.display()))?;
    }

    init_tracing(cli.verbose);

    let config = Config::from_env().context("invalid configuration")?;
    if config.uses_default_secret() {
        tracing::warn!("JWT_SECRET is not set; using the insecure placeholder secret");
    }

    let store = SqlStore::new_local(&config.database.url)
        .await
        .context("unable to open the database")?;

    let addr = config.bind_address();
    let public_host = config.public_host.clone();
    let app = build_app(AppState::new(config, Arc::new(store)));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("unable to bind {}", addr))?;

    tracing::info!(%addr, %public_host, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
