use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Outcome of a content-store lookup.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("no product matches the requested slug")]
    NotFound,

    #[error("content api returned status {0}")]
    UpstreamStatus(u16),

    #[error("content api request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("content api response is not a product envelope")]
    MalformedEnvelope,
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("page did not reach network idle within {0:?}")]
    Timeout(Duration),

    #[error("browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    MissingVar(&'static str),

    #[error("invalid {name} value: {reason}")]
    Invalid { name: &'static str, reason: String },
}

pub enum HttpError {
    NotFound,
    InternalServerError(anyhow::Error),
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        match self {
            HttpError::NotFound => {
                (StatusCode::NOT_FOUND, "Product not found").into_response()
            }
            HttpError::InternalServerError(err) => {
                tracing::error!("Internal Server Error: {:#}", err);

                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

// This enables using `?` on functions that return `Result<_, anyhow::Error>` to turn them into
// `Result<_, HttpError>`. That way you don't need to do that manually.
impl<E> From<E> for HttpError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::InternalServerError(err.into())
    }
}

impl HttpError {
    /// Maps pipeline fetch outcomes at the route boundary: a missing record
    /// is user-visible, everything else is an opaque server error.
    pub fn from_fetch(err: FetchError) -> Self {
        match err {
            FetchError::NotFound => HttpError::NotFound,
            other => HttpError::InternalServerError(other.into()),
        }
    }
}
