//! Catalogue REST client implementation.

use reqwest::Client;
use thiserror::Error;

use super::models::*;

/// Release years the service can plausibly hold; anything outside is
/// rejected before a request is made.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1000..=9999;

/// API client errors.
#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server returned status {code}")]
    Status { code: u16 },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("invalid filter input: {0}")]
    Validation(String),
}

/// Client for the songs catalogue service.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    /// HTTP client
    client: Client,

    /// Base server URL
    base_url: String,
}

impl CatalogClient {
    /// Create a new API client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build the URL for an endpoint path.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Make a GET request and decode the JSON body.
    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiClientError> {
        let response = self.client.get(self.url(path)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiClientError::Status {
                code: status.as_u16(),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiClientError::InvalidResponse(format!(
                "Failed to parse response: {}. Body: {}",
                e,
                &text[..text.len().min(500)]
            ))
        })
    }

    // =========================================================================
    // Catalogue endpoints
    // =========================================================================

    /// Fetch the whole songs catalogue.
    pub async fn get_songs(&self) -> Result<Vec<SongRow>, ApiClientError> {
        let songs: Vec<WireSong> = self.get("songs").await?;
        Ok(songs.into_iter().map(SongRow::from).collect())
    }

    /// Fetch all authors (reference data for the filter dialog).
    pub async fn get_authors(&self) -> Result<Vec<Author>, ApiClientError> {
        self.get("authors").await
    }

    /// Fetch all genres (reference data for the filter dialog).
    pub async fn get_genres(&self) -> Result<Vec<Genre>, ApiClientError> {
        self.get("genres").await
    }

    /// Fetch songs matching the given criteria. Unset criteria are sent
    /// as empty strings; the response passes through the same
    /// normalization as the unfiltered path.
    pub async fn get_filtered_songs(
        &self,
        selection: &FilterSelection,
    ) -> Result<Vec<SongRow>, ApiClientError> {
        validate_selection(selection)?;

        let body = FilterRequest::from(selection);
        let response = self
            .client
            .post(self.url("songs/filter"))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiClientError::Status {
                code: status.as_u16(),
            });
        }

        let text = response.text().await?;
        let songs: Vec<WireSong> = serde_json::from_str(&text).map_err(|e| {
            ApiClientError::InvalidResponse(format!(
                "Failed to parse response: {}. Body: {}",
                e,
                &text[..text.len().min(500)]
            ))
        })?;

        Ok(songs.into_iter().map(SongRow::from).collect())
    }
}

/// Reject filter input the service cannot answer sensibly.
fn validate_selection(selection: &FilterSelection) -> Result<(), ApiClientError> {
    if let Some(year) = selection.year {
        if !YEAR_RANGE.contains(&year) {
            return Err(ApiClientError::Validation(format!(
                "release year {year} is out of range"
            )));
        }
    }
    Ok(())
}
