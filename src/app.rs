/*
 * Responsibility
 * - Config読み込み → 依存生成 → Router 組み立て
 * - Middleware の適用順をここで明示的に決める (外側から):
 *   http (request id / trace / body limit / timeout) → AuthenticationGate → routes
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::{Router, extract::OriginalUri};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::error::AppError;
use crate::middleware::{self, auth::AuthenticationGate};
use crate::services::auth::build_token_validator;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,auth_gateway=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();

    // A blank or short JWT_SECRET stops the process here, before any traffic is served.
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting gateway in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Process-level services, built once and shared read-only by every request.
pub fn build_state(config: &Config) -> AppState {
    let validator = build_token_validator(config);
    AppState::new(Arc::new(AuthenticationGate::new(validator)))
}

pub fn build_router(state: AppState) -> Router {
    let routes = Router::new()
        .nest("/actuator", api::actuator::routes())
        .nest("/api/v1", api::v1::routes())
        .fallback(not_found);

    // Gate goes on after every route and the fallback, so unknown paths are
    // authenticated before they can 404.
    let routes = middleware::auth::apply(routes, state.clone()).with_state(state);

    middleware::http::apply(routes)
}

async fn not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::NotFound {
        path: uri.path().to_string(),
    }
}
