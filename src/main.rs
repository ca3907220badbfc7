use anyhow::Context;
use clap::Parser;
use std::net::IpAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use cloud_notes_api::auth::{Identity, SystemClock, TokenCodec};
use cloud_notes_api::config::AppConfig;
use cloud_notes_api::database::{DatabaseManager, MemoryNoteStore, NoteStore, PgNoteStore};
use cloud_notes_api::middleware::cors_layer;
use cloud_notes_api::AppState;

#[derive(Parser, Debug)]
#[command(name = "cloud-notes-api", about = "Notes REST API with bearer-token auth")]
struct Args {
    /// Address to bind (overrides HOST)
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Keep notes in process memory instead of Postgres
    #[arg(long)]
    in_memory: bool,

    /// Validate configuration and exit without serving
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cloud_notes_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    tracing::info!("Starting Cloud Notes API in {:?} mode", config.environment);

    // No secret, no server.
    let codec = TokenCodec::from_config(&config.security, Arc::new(SystemClock))
        .context("token signing is not configured")?;
    let login_identity = Identity::new(config.security.demo_user.clone())?;

    if args.check_config {
        if !args.in_memory {
            config.database.require_url()?;
        }
        let dump = serde_json::to_string_pretty(&config).context("failed to render configuration")?;
        tracing::info!("Configuration OK:\n{}", dump);
        return Ok(());
    }

    let notes: Arc<dyn NoteStore> = if args.in_memory {
        tracing::warn!("Using in-memory note store; notes are lost on exit");
        Arc::new(MemoryNoteStore::new())
    } else {
        let url = config.database.require_url()?;
        let pool = DatabaseManager::connect(url, &config.database)
            .await
            .context("db connection failed")?;
        DatabaseManager::ensure_schema(&pool)
            .await
            .context("failed to ensure notes schema")?;
        Arc::new(PgNoteStore::new(pool))
    };

    let state = AppState::new(codec, notes, login_identity);
    let app = cloud_notes_api::app(state).layer(cors_layer(&config.security.cors_origins));

    let bind_addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Cloud Notes API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
