//! Cinelog - movie catalogue API with bearer-token authentication

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use cinelog_api::{AppState, create_router};
use cinelog_auth::JwtManager;
use cinelog_db::Database;
use config::{Config, ConfigOverrides, LogFormat};

/// Cinelog - movie catalogue API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "CINELOG_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "CINELOG_PORT")]
    port: Option<u16>,

    /// SQLite database file
    #[arg(long, env = "CINELOG_DATABASE")]
    database: Option<String>,

    /// Token signing secret
    #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
    secret_key: Option<String>,

    /// Token signing algorithm (HS256, HS384 or HS512)
    #[arg(long, env = "ALGORITHM")]
    algorithm: Option<String>,

    /// Access token lifetime in minutes
    #[arg(long, env = "ACCESS_TOKEN_EXPIRE_MINUTES")]
    access_token_expire_minutes: Option<i64>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            bind_address: self.bind.clone(),
            port: self.port,
            database_path: self.database.clone(),
            secret_key: self.secret_key.clone(),
            algorithm: self.algorithm.clone(),
            access_token_expire_minutes: self.access_token_expire_minutes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.config)?.with_overrides(args.overrides());

    init_logging(&config.logging.level, config.logging.format);

    info!("Starting Cinelog v{}", env!("CARGO_PKG_VERSION"));

    // Refuse to start without a usable signing configuration
    let auth = config
        .auth_settings()
        .context("Invalid token signing configuration")?;

    if let Some(parent) = Path::new(&config.database.path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let db_path = format!("sqlite:{}?mode=rwc", config.database.path);
    let db = Database::new(&db_path).await?;

    let jwt = Arc::new(JwtManager::new(
        &auth.secret_key,
        auth.algorithm,
        auth.access_token_expire_minutes,
    )?);
    info!(
        "Issuing {:?} tokens valid for {} minutes",
        auth.algorithm, auth.access_token_expire_minutes
    );

    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install metrics recorder")?;

    let state = AppState::new(db, jwt);

    let mut app = create_router(state, Some(Arc::new(metrics_handle)))
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = config.cors.layer()? {
        info!("CORS enabled for {:?}", config.cors.allowed_origins);
        app = app.layer(cors);
    }

    let addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.port)
        .parse()
        .context("Invalid bind address")?;

    info!("Listening on {}", addr);
    info!("Database: {}", config.database.path);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Text => registry.with(fmt::layer()).init(),
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}
