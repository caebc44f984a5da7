mod browser_pool;
mod config;
mod content;
mod error;
mod normalize;
mod product;
mod routes;
mod template;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::Method;
use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

use browser_pool::BrowserPool;
use config::{AppConfig, AppEnv};
use content::ContentClient;
use routes::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;

    let default_filter = match config.env {
        AppEnv::Production => "info",
        AppEnv::Development => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let browser_pool = Arc::new(BrowserPool::new(config.render_idle_timeout).await?);
    let content = Arc::new(ContentClient::new(
        config.strapi_url.clone(),
        config.strapi_api_token.clone(),
    ));

    let app_state = AppState {
        content,
        browser_pool,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(false);

    let app = Router::new()
        .route("/html/{slug}", get(routes::product_html))
        .route("/pdf/{slug}", get(routes::product_pdf))
        .route("/healthz", get(routes::healthz))
        .fallback(routes::not_found)
        .layer(cors)
        .with_state(app_state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
