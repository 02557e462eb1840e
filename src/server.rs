//! HTTP surface and service lifecycle
//!
//! A single `GET /` route backed by the request pipeline. Startup warms the
//! browser pool (non-fatal on failure, requests get 503 until a later attempt
//! succeeds) and shutdown closes the pool after the listener drains.

use crate::engine::BrowserEngine;
use crate::error::GatewayError;
use crate::proxy_service::ProxyService;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ScrapeQuery {
    key: Option<String>,
    url: Option<String>,
}

pub fn build_router<E: BrowserEngine>(service: Arc<ProxyService<E>>) -> Router {
    Router::new()
        .route("/", get(scrape::<E>))
        .with_state(service)
}

async fn scrape<E: BrowserEngine>(
    State(service): State<Arc<ProxyService<E>>>,
    Query(query): Query<ScrapeQuery>,
) -> Response {
    match service
        .handle_scrape(query.key.as_deref(), query.url.as_deref())
        .await
    {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            let status = StatusCode::from_u16(e.status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, e.to_string()).into_response()
        }
    }
}

/// Bind, serve until SIGINT/SIGTERM, then close the browser pool.
pub async fn run_server<E: BrowserEngine>(
    service: Arc<ProxyService<E>>,
    port: u16,
) -> Result<(), GatewayError> {
    if let Err(e) = service.pool().initialize().await {
        warn!("Browser pool startup failed, will retry on demand: {}", e);
    }

    let router = build_router(service.clone());
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Listening on 0.0.0.0:{}", port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Safe even when startup initialization never succeeded.
    service.pool().close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())
        .expect("Failed to create SIGINT handler");
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
        .expect("Failed to create SIGTERM handler");

    tokio::select! {
        _ = sigint.recv() => {
            info!("Received SIGINT");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM");
        }
    }
}
