use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{Method, StatusCode},
    routing::get,
    Json, Router,
};
use server_api::{fetch_tab, HttpSheetSource, ProxyContext};
use shared::{
    error::{ApiError, ErrorCode, ErrorEnvelope},
    protocol::SheetQuery,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::load_settings;

/// Path the hosted frontend already calls; kept alongside the plain routes.
const LEGACY_FUNCTION_ROUTE: &str = "/.netlify/functions/fetchSheetData";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings()?;
    let credentials = settings.credentials();
    if credentials.is_none() {
        warn!("SHEET_ID or API_KEY is not set; sheet requests will fail with 500");
    }

    let proxy = ProxyContext {
        config: settings.proxy_config(),
        credentials,
        upstream_base: settings.upstream_base()?,
        source: Arc::new(HttpSheetSource::default()),
    };
    info!(
        require_tab = proxy.config.require_tab_param,
        default_tab = ?proxy.config.default_tab,
        range = ?proxy.config.range,
        allowed_tabs = proxy.config.allowed_tabs.len(),
        "sheet proxy configured"
    );

    let app = build_router(Arc::new(AppState { proxy }));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/fetchSheetData", get(fetch_sheet_data))
        .route("/api/sheets", get(fetch_sheet_data))
        .route(LEGACY_FUNCTION_ROUTE, get(fetch_sheet_data))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn fetch_sheet_data(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SheetQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorEnvelope>)> {
    // Malformed query strings get the same JSON envelope as every other failure.
    let Query(q) =
        query.map_err(|rejection| http_error(ApiError::validation(rejection.body_text())))?;
    fetch_tab(&state.proxy, q.tab.as_deref())
        .await
        .map(Json)
        .map_err(http_error)
}

fn http_error(err: ApiError) -> (StatusCode, Json<ErrorEnvelope>) {
    let status = match err.code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Configuration | ErrorCode::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorEnvelope::from(err)))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
