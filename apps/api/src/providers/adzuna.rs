use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{ensure_success, PostingsSource, ProviderError};

const ADZUNA_SEARCH_URL: &str = "https://api.adzuna.com/v1/api/jobs/us/search";
const RESULTS_PER_PAGE: u32 = 50;

pub struct AdzunaClient {
    client: Client,
    app_id: String,
    app_key: String,
}

impl AdzunaClient {
    pub fn new(client: Client, app_id: String, app_key: String) -> Self {
        Self {
            client,
            app_id,
            app_key,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Posting>,
}

#[derive(Debug, Deserialize)]
struct Posting {
    #[serde(default)]
    description: Option<String>,
}

fn descriptions(response: SearchResponse) -> Vec<String> {
    response
        .results
        .into_iter()
        .filter_map(|p| p.description)
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .collect()
}

#[async_trait]
impl PostingsSource for AdzunaClient {
    async fn fetch_page(
        &self,
        query: &str,
        max_age_days: u32,
        page: u32,
    ) -> Result<Vec<String>, ProviderError> {
        let response = self
            .client
            .get(format!("{ADZUNA_SEARCH_URL}/{page}"))
            .query(&[
                ("app_id", self.app_id.as_str()),
                ("app_key", self.app_key.as_str()),
                ("what", query),
            ])
            .query(&[
                ("results_per_page", RESULTS_PER_PAGE),
                ("max_days_old", max_age_days),
            ])
            .send()
            .await?;

        let body: SearchResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        Ok(descriptions(body))
    }

    fn name(&self) -> &'static str {
        "Adzuna"
    }
}
