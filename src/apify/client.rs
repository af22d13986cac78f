// client.rs
use crate::apify::FetchError;
use reqwest::blocking::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("apartment_finder/", env!("CARGO_PKG_VERSION"));

/// Anything that can hand back the raw listings payload.
pub trait ListingSource: Send + Sync {
    fn fetch_payload(&self) -> Result<String, FetchError>;
}

/// Reads the dataset items of an Apify scraping run. One attempt per call.
pub struct ApifyClient {
    client: Client,
    url: String,
}

impl ApifyClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl ListingSource for ApifyClient {
    fn fetch_payload(&self) -> Result<String, FetchError> {
        let start = std::time::Instant::now();

        let resp = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let text = resp
            .text()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        tracing::info!(
            url = %self.url,
            bytes = text.len(),
            elapsed = ?start.elapsed(),
            "fetched upstream listings"
        );
        Ok(text)
    }
}
