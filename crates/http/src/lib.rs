//! HTTP server facade for the catalog with Axum, HTML error pages and views.

use anyhow::Context;
use axum::{response::Redirect, routing::get, Router};

use catalog_kernel::{settings::Settings, ModuleRegistry};

pub mod error;
pub mod router;
pub mod views;

use router::RouterBuilder;

/// Start the HTTP server and serve until Ctrl-C
pub async fn start_server(registry: &ModuleRegistry, settings: &Settings) -> anyhow::Result<()> {
    tracing::info!(
        "starting HTTP server on {}:{}",
        settings.server.host,
        settings.server.port
    );

    let app = build_router(registry, settings);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", settings.server.host, settings.server.port))
            .await
            .context("failed to bind to address")?;

    tracing::info!(
        "HTTP server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Build the main HTTP router with all module routes mounted
pub fn build_router(registry: &ModuleRegistry, settings: &Settings) -> Router {
    let base_path = settings.server.base_path.clone();
    let index = if base_path.is_empty() {
        "/".to_string()
    } else {
        base_path.clone()
    };

    let mut router_builder = RouterBuilder::new(base_path)
        .with_tracing()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms)
        .route("/healthz", get(health_check));

    if index != "/" {
        router_builder = router_builder.route(
            "/",
            get(move || {
                let index = index.clone();
                async move { Redirect::to(&index) }
            }),
        );
    }

    for module in registry.modules() {
        router_builder = router_builder.mount_module(module.name(), module.routes());
    }

    router_builder.build()
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
