//! Server mode
//!
//! Builds the shared components, binds the listener and runs until the server
//! stops on its own or a shutdown signal arrives.

use actix_web::{App, HttpServer, middleware::DefaultHeaders};
use anyhow::{Context, Result};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::api::middleware::RequestIdMiddleware;
use crate::config::get_config;
use crate::runtime::lifetime::{self, shutdown::SHUTDOWN_TIMEOUT_SECS};

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let config = get_config();

    let ctx = lifetime::startup::prepare_server_startup(&config).map_err(|e| {
        error!("Server startup failed: {:#}", e);
        e
    })?;

    let workers = config.server.workers.clamp(1, 32);
    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-store")))
            .configure(|cfg| ctx.configure(cfg))
    })
    .workers(workers)
    .keep_alive(Duration::from_secs(30))
    .disable_signals()
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    warn!(
        "Starting server at http://{} with {} workers",
        bind_address, workers
    );

    let handle = server.handle();

    tokio::select! {
        res = server => {
            res.context("HTTP server terminated with an error")?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            match timeout(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS), handle.stop(true)).await {
                Ok(()) => info!("Graceful shutdown completed"),
                Err(_) => error!(
                    "Graceful shutdown timed out after {} seconds",
                    SHUTDOWN_TIMEOUT_SECS
                ),
            }
        }
    }

    Ok(())
}
