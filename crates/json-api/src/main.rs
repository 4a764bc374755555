//! Patisserie JSON API Server

use std::process;

use salvo::{
    affix_state::inject, catch_panic::CatchPanic, oapi::OpenApi, oapi::swagger_ui::SwaggerUi,
    prelude::*, trailing_slash::remove_slash,
};
use tracing::{error, info};

use patisserie::catalog::RulesCatalog;
use patisserie_app::context::AppContext;

use crate::{config::ServerConfig, state::State};

mod config;
mod drafts;
mod extensions;
mod healthcheck;
mod observability;
mod pricing;
mod promos;
mod rate_limit;
mod router;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;
mod totals;

async fn build_app(config: &ServerConfig) -> Result<AppContext, String> {
    let catalog = match &config.pricing.catalog {
        Some(path) => RulesCatalog::from_path(path)
            .map_err(|source| format!("failed to load catalog {}: {source}", path.display()))?,
        None => RulesCatalog::standard(),
    };

    info!(version = catalog.version(), "pricing catalog loaded");

    let policy = config.pricing.rate_limit_policy();

    match &config.database.database_url {
        Some(url) => AppContext::from_database_url(url, catalog, policy)
            .await
            .map_err(|source| format!("failed to initialize app context: {source}")),
        None => {
            info!("DATABASE_URL not set, keeping drafts and promo codes in memory");

            Ok(AppContext::in_memory(catalog, policy))
        }
    }
}

/// Patisserie JSON API Server entry point
#[tokio::main]
pub async fn main() {
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

    if let Err(source) = observability::init_logging(&config) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialize, must use eprintln"
        )]
        {
            eprintln!("{source}");
        }

        process::exit(1);
    }

    let app = match build_app(&config).await {
        Ok(app) => app,
        Err(init_error) => {
            error!("{init_error}");

            process::exit(1);
        }
    };

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    let listener = TcpListener::new(addr).bind().await;

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(observability::request_logging)
        .hoop(remove_slash())
        .hoop(inject(State::from_app_context(app)))
        .push(router::app_router());

    let doc = OpenApi::new("Patisserie API", env!("CARGO_PKG_VERSION")).merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();

    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    server.serve(router).await;

    info!("server stopped");
}
