use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::error::FetchError;
use crate::normalize::normalize;
use crate::product::ProductRecord;

/// Client for the headless CMS serving product records.
///
/// Holds the injected base URL and bearer credential; issues exactly one
/// request per lookup. Retries are the caller's concern.
pub struct ContentClient {
    http_client: Client,
    base_url: Url,
    api_token: String,
}

impl ContentClient {
    pub fn new(base_url: Url, api_token: String) -> Self {
        ContentClient {
            http_client: Client::new(),
            base_url,
            api_token,
        }
    }

    /// Looks up a product by slug and returns its normalized view.
    pub async fn fetch_product(&self, slug: &str) -> Result<ProductRecord, FetchError> {
        let endpoint = format!(
            "{}/api/products",
            self.base_url.as_str().trim_end_matches('/')
        );

        let response = self
            .http_client
            .get(&endpoint)
            .query(&[("filters[slug][$eq]", slug), ("populate", "deep")])
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%slug, status = status.as_u16(), "content api returned non-success");
            return Err(FetchError::UpstreamStatus(status.as_u16()));
        }

        let envelope: Value = response.json().await.map_err(|err| {
            if err.is_decode() {
                FetchError::MalformedEnvelope
            } else {
                FetchError::Transport(err)
            }
        })?;

        let record = envelope
            .get("data")
            .and_then(Value::as_array)
            .ok_or(FetchError::MalformedEnvelope)?
            .first()
            .ok_or(FetchError::NotFound)?;

        Ok(normalize(slug, record, &self.base_url))
    }
}
