/*
 * Responsibility
 * - Tracing / panic hook setup
 * - Config → MongoDB, Casdoor middleware, management client
 * - Router assembly (v1 routes, CORS, transport layers) and axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::repos::{EntityService, MongoEntityService, Widget};
use crate::services::{auth::build_auth_middleware, casdoor::CasdoorClient};
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // RUST_LOG wins, e.g. RUST_LOG=info,resource_server=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(
            "resource_server=debug,tower_http=debug,axum::rejection=trace",
        )
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: crash loudly
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting resource server in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let client = mongodb::Client::with_uri_str(&config.mongodb_uri)
        .await
        .context("connecting to mongodb")?;
    let db = client.database(&config.mongodb_database);
    let widgets: Arc<dyn EntityService<Widget>> = Arc::new(MongoEntityService::<Widget>::new(&db));

    let state = build_state(&config)?;
    let app = build_router(state, &config, widgets);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_state(config: &Config) -> Result<AppState> {
    let auth = build_auth_middleware(&config.casdoor).context("building casdoor middleware")?;
    let state = AppState::new(auth);

    if config.casdoor.endpoint.is_empty() {
        tracing::info!("CASDOOR_ENDPOINT not set; management API routes are unavailable");
        return Ok(state);
    }
    let client = CasdoorClient::new(&config.casdoor).context("building casdoor client")?;
    Ok(state.with_casdoor_client(client))
}

pub fn build_router(
    state: AppState,
    config: &Config,
    widgets: Arc<dyn EntityService<Widget>>,
) -> Router {
    let v1 = api::v1::routes(&state, widgets);
    let app = Router::new().nest("/api/v1", v1).with_state(state);

    let app = middleware::cors::apply(app, config);
    middleware::http::apply(app, &config.http)
}
