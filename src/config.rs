use std::time::Duration;

use dotenv::dotenv;
use url::Url;

use crate::error::ConfigError;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_RENDER_IDLE_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum AppEnv {
    #[default]
    Development,
    Production,
}

/// Process configuration, read once at startup and injected into the
/// components that need it. Required values missing here abort startup;
/// requests never see a half-configured service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: AppEnv,
    pub port: u16,
    /// Content-store origin; also the base for relative media URLs.
    pub strapi_url: Url,
    pub strapi_api_token: String,
    /// Upper bound on the PDF page quiescence wait.
    pub render_idle_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let env = match std::env::var("APP_ENV").ok().as_deref() {
            Some("production") => AppEnv::Production,
            _ => AppEnv::Development,
        };

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                reason: format!("not a port number: {raw}"),
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let strapi_url =
            std::env::var("STRAPI_URL").map_err(|_| ConfigError::MissingVar("STRAPI_URL"))?;
        let strapi_url = Url::parse(&strapi_url).map_err(|err| ConfigError::Invalid {
            name: "STRAPI_URL",
            reason: err.to_string(),
        })?;

        let strapi_api_token = std::env::var("STRAPI_API_TOKEN")
            .map_err(|_| ConfigError::MissingVar("STRAPI_API_TOKEN"))?;

        let render_idle_timeout = match std::env::var("RENDER_IDLE_TIMEOUT_MS") {
            Ok(raw) => {
                let millis = raw.parse().map_err(|_| ConfigError::Invalid {
                    name: "RENDER_IDLE_TIMEOUT_MS",
                    reason: format!("not a millisecond count: {raw}"),
                })?;
                Duration::from_millis(millis)
            }
            Err(_) => Duration::from_millis(DEFAULT_RENDER_IDLE_TIMEOUT_MS),
        };

        Ok(AppConfig {
            env,
            port,
            strapi_url,
            strapi_api_token,
            render_idle_timeout,
        })
    }
}
