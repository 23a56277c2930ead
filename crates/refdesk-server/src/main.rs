//! Refdesk Match-Management Server
//!
//! HTTP backend for a sports officiating association: user accounts,
//! match registry, role registrations, end-of-match reports, and
//! administrative review.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use refdesk_core::tracing_init::init_tracing;
use refdesk_server::auth::JwtManager;
use refdesk_server::routes::{AppState, build_router};
use refdesk_server::storage::Database;
use refdesk_server::uploads::UploadStore;

#[derive(Parser, Debug)]
#[command(name = "refdesk-server")]
#[command(version, about = "Refdesk match-management server")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:8080", env = "REFDESK_ADDR")]
    addr: SocketAddr,

    /// Path to SQLite database file.
    #[arg(long, env = "REFDESK_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Directory for uploaded match artifacts.
    #[arg(long, env = "REFDESK_UPLOAD_DIR")]
    upload_dir: Option<PathBuf>,

    /// JWT secret key.
    #[arg(long, env = "REFDESK_JWT_SECRET", default_value = "dev-secret-change-me")]
    jwt_secret: String,

    /// Session token TTL in seconds.
    #[arg(long, default_value_t = 86400)]
    session_ttl: i64,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_tracing("refdesk_server=info", args.log_json);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %args.addr,
        "Starting refdesk-server"
    );

    let db_path = match args.db_path {
        Some(path) => path,
        None => default_data_dir()?.join("refdesk.db"),
    };
    info!(path = %db_path.display(), "Opening database");
    let db = Database::open(&db_path).await?;

    let upload_dir = match args.upload_dir {
        Some(dir) => dir,
        None => default_data_dir()?.join("uploads"),
    };

    let jwt = Arc::new(JwtManager::new(
        args.jwt_secret.as_bytes(),
        args.session_ttl,
    ));

    let state = AppState {
        db,
        jwt,
        uploads: UploadStore::new(upload_dir),
    };

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(args.addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Received shutdown signal");
}

fn default_data_dir() -> anyhow::Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home.join(".refdesk"))
}
