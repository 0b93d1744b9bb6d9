//! Trolley JSON API Server

use std::{process, sync::Arc};

use salvo::{
    affix_state::inject, oapi::OpenApi, oapi::swagger_ui::SwaggerUi, prelude::*,
    trailing_slash::remove_slash,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use trolley_app::context::AppContext;

use crate::{config::ServerConfig, state::State};

mod carts;
mod config;
mod extensions;
mod healthcheck;
mod observability;
mod router;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

/// Trolley JSON API Server entry point
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    if let Err(init_error) = observability::init_subscriber(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("{init_error}");
        }

        process::exit(1);
    }

    let app = match &config.database.database_url {
        Some(url) => match AppContext::from_database_url(url, config.store.currency).await {
            Ok(app) => app,
            Err(init_error) => {
                error!("failed to initialize app context: {init_error}");

                process::exit(1);
            }
        },
        None => {
            warn!("DATABASE_URL not set; carts and products are kept in memory");

            AppContext::in_memory(config.store.currency)
        }
    };

    let sweeper = Arc::new(app.sweeper(config.sweeper.policy()))
        .spawn(config.sweeper.interval(), CancellationToken::new());

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    // Bind server
    let listener = TcpListener::new(addr).bind().await;

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(inject(State::from_app_context(app)))
        .push(router::app_router());

    let doc = OpenApi::new("Trolley API", env!("CARGO_PKG_VERSION")).merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();
    let sweeper_token = sweeper.token();

    // Listen for shutdown signal
    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle, sweeper_token).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    // Start serving requests
    server.serve(router).await;

    if let Err(error) = sweeper.shutdown().await {
        error!("sweeper task failed: {error}");
    }

    info!("server stopped");
}
