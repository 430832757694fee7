use reqwest::Client;
use shared::{error::ErrorEnvelope, protocol::SheetValues};
use thiserror::Error;
use tracing::debug;
use url::Url;

pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:8888/fetchSheetData";

#[derive(Debug, Error)]
pub enum SheetClientError {
    #[error("invalid proxy url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("sheet proxy request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("sheet proxy returned {status}: {message}")]
    Proxy { status: u16, message: String },
}

/// Client for the sheet proxy endpoint.
#[derive(Clone)]
pub struct SheetProxyClient {
    http: Client,
    endpoint: Url,
}

impl SheetProxyClient {
    pub fn new(endpoint: &str) -> Result<Self, SheetClientError> {
        Ok(Self {
            http: Client::new(),
            endpoint: Url::parse(endpoint)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Omitting `tab` lets the proxy apply its default, if it has one.
    pub async fn fetch_tab(&self, tab: Option<&str>) -> Result<SheetValues, SheetClientError> {
        let mut url = self.endpoint.clone();
        if let Some(tab) = tab {
            url.query_pairs_mut().append_pair("tab", tab);
        }

        debug!(%url, "requesting sheet values");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<SheetValues>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|envelope| envelope.error)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected response")
                    .to_string()
            });
        Err(SheetClientError::Proxy {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
#[path = "tests/sheet_client_tests.rs"]
mod tests;
