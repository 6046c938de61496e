use std::{future::Future, net::SocketAddr};

use configs::{AppConfig, ServerConfig, SweeperConfig};
use service::sweeper::Sweeper;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

pub fn bind_addr(cfg: &ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.host, cfg.port).parse()?)
}

/// Resolves on Ctrl+C. If the handler cannot be installed, never resolves.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
}

/// Open the store named by the config, creating the SQLite directory and
/// applying migrations as needed.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    common::env::ensure_sqlite_dir(&cfg.database.url).await?;
    let db = models::db::connect_with_config(&cfg.database).await?;
    models::db::migrate(&db).await?;
    Ok(ServerState::new(db))
}

/// Serve on an already bound listener until `shutdown` resolves, running the
/// completion sweeper alongside when enabled.
pub async fn serve<F>(
    listener: TcpListener,
    state: ServerState,
    sweeper: &SweeperConfig,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let sweeper = if sweeper.enabled {
        Some(Sweeper::spawn(state.pickups.clone(), sweeper.interval()))
    } else {
        info!("sweeper disabled by configuration");
        None
    };

    let app = routes::build_router(state, build_cors());
    let served = axum::serve(listener, app).with_graceful_shutdown(shutdown).await;

    if let Some(sweeper) = sweeper {
        sweeper.shutdown().await;
    }
    served?;
    Ok(())
}

/// Public entry: load config, open the store and run the HTTP server until Ctrl+C.
pub async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::load_and_validate()?;
    let state = build_state(&cfg).await?;

    let addr = bind_addr(&cfg.server)?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    serve(listener, state, &cfg.sweeper, shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}
