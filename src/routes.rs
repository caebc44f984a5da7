use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};

use crate::browser_pool::BrowserPool;
use crate::content::ContentClient;
use crate::error::HttpError;
use crate::product::ProductRecord;
use crate::template;

const NOT_FOUND_PAGE: &str = "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Not Found</title></head><body><h1>404</h1><p>The page you are looking for does not exist.</p></body></html>";

#[derive(Clone)]
pub struct AppState {
    pub content: Arc<ContentClient>,
    pub browser_pool: Arc<BrowserPool>,
}

async fn fetch(state: &AppState, slug: &str) -> Result<ProductRecord, HttpError> {
    state
        .content
        .fetch_product(slug)
        .await
        .map_err(HttpError::from_fetch)
}

pub async fn product_html(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, HttpError> {
    let product = fetch(&state, &slug).await?;
    Ok(Html(template::render(&product)))
}

pub async fn product_pdf(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, HttpError> {
    let product = fetch(&state, &slug).await?;
    let html = template::render(&product);

    // Detached task: the page still gets closed if the client goes away
    // mid-render.
    let pool = state.browser_pool.clone();
    let pdf = tokio::spawn(async move { pool.print_to_pdf(&html).await }).await??;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{slug}.pdf\""),
        ),
    ];
    Ok((headers, pdf).into_response())
}

pub async fn healthz() -> &'static str {
    "Pong"
}

pub async fn not_found() -> impl IntoResponse {
    (axum::http::StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE))
}
