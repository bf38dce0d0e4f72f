//! Server crate: Axum-based REST API over the notes core.
//!
//! # Modules
//!
//! - [`app`]: Router, CORS and request logging
//! - [`config`]: Flags/environment configuration
//! - [`controller`]: Route handlers for the notes collection
//! - [`error`]: Error type with HTTP status mapping
//! - [`state`]: Shared store handle

pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod state;

pub use app::create_app;
pub use config::ServerConfig;
pub use error::{ApiError, ApiResult, ErrorBody};
pub use state::AppState;

use anyhow::Context;
use log::{info, warn};
use notes_core::SharedDb;
use tokio::net::TcpListener;
use tokio::signal;

/// Initializes logging, binds the listener and serves until shutdown.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    notes_core::init_logging(config.log_level(), config.log_dir.as_deref())
        .map_err(|err| anyhow::anyhow!(err))?;

    let cors_origin = config.cors_origin_header()?;
    let target = config.db_target();
    info!(
        "event=server_init module=server status=ok store_mode={} cors_origin={}",
        target.mode(),
        config.cors_origin
    );

    // Open and migrate up front so a bad store path fails startup.
    let db = SharedDb::new(target);
    db.warm_up().context("failed to open notes store")?;
    let state = AppState::new(db);
    let app = create_app(state, cors_origin);

    let address = config.bind_addr();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("event=server_listen module=server status=ok address={address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("event=signal module=server status=error error={err}");
            std::future::pending::<()>().await;
        }
        info!("event=signal module=server status=ok signal=ctrl_c");
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("event=signal module=server status=ok signal=terminate");
            }
            Err(err) => {
                warn!("event=signal module=server status=error error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
