//! Narrow request/response seams over the external data sources.
//!
//! Stages only see these traits. The HTTP implementations live in the
//! submodules and are constructed in `main` when their credentials exist.

pub mod adzuna;
pub mod bls;
pub mod careeronestop;
pub mod youtube;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use thiserror::Error;

use crate::models::occupation::OccupationCandidate;
use crate::models::resource::VideoCandidate;

pub use adzuna::AdzunaClient;
pub use bls::BlsClient;
pub use careeronestop::CareerOneStopClient;
pub use youtube::YouTubeClient;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed upstream payload: {0}")]
    Malformed(String),
}

/// One page of job-posting descriptions. An empty page means the source is exhausted.
#[async_trait]
pub trait PostingsSource: Send + Sync {
    async fn fetch_page(
        &self,
        query: &str,
        max_age_days: u32,
        page: u32,
    ) -> Result<Vec<String>, ProviderError>;

    fn name(&self) -> &'static str;
}

/// Candidate occupations for a free-text title, in the source's own order.
#[async_trait]
pub trait OccupationLookup: Send + Sync {
    async fn search(&self, title: &str) -> Result<Vec<OccupationCandidate>, ProviderError>;
}

/// A single statistics series: `(year, value)` observations.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesData {
    pub series_id: String,
    pub observations: Vec<(i32, f64)>,
}

#[async_trait]
pub trait StatisticsSource: Send + Sync {
    async fn fetch_series(
        &self,
        series_ids: &[String],
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<SeriesData>, ProviderError>;
}

/// Video search restricted to one channel, with view and duration details filled in.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search(
        &self,
        query: &str,
        channel_id: &str,
        max_results: u32,
    ) -> Result<Vec<VideoCandidate>, ProviderError>;
}

/// Shared HTTP client for the non-LLM providers.
pub fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to build HTTP client")
}

/// Turns a non-2xx response into `ProviderError::Status`.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ProviderError::Status {
        status: status.as_u16(),
        message: message.chars().take(200).collect(),
    })
}
