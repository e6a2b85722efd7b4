use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ensure_success, ProviderError, SeriesData, StatisticsSource};

const BLS_V2_URL: &str = "https://api.bls.gov/publicAPI/v2/timeseries/data/";
const BLS_V1_URL: &str = "https://api.bls.gov/publicAPI/v1/timeseries/data/";
const REQUEST_SUCCEEDED: &str = "REQUEST_SUCCEEDED";

/// Uses v2 registered access when a key is configured, otherwise v1 public access.
pub struct BlsClient {
    client: Client,
    api_key: Option<String>,
}

impl BlsClient {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }
}

#[derive(Debug, Deserialize)]
struct BlsResponse {
    status: String,
    #[serde(default)]
    message: Value,
    #[serde(rename = "Results", default)]
    results: Option<BlsResults>,
}

#[derive(Debug, Deserialize)]
struct BlsResults {
    #[serde(default)]
    series: Vec<BlsSeries>,
}

#[derive(Debug, Deserialize)]
struct BlsSeries {
    #[serde(rename = "seriesID")]
    series_id: String,
    #[serde(default)]
    data: Vec<BlsObservation>,
}

#[derive(Debug, Deserialize)]
struct BlsObservation {
    year: String,
    value: String,
}

fn into_series(response: BlsResponse) -> Result<Vec<SeriesData>, ProviderError> {
    if response.status != REQUEST_SUCCEEDED {
        return Err(ProviderError::Malformed(format!(
            "statistics request {}: {}",
            response.status, response.message
        )));
    }

    let series = response
        .results
        .map(|r| r.series)
        .unwrap_or_default()
        .into_iter()
        .map(|s| {
            let observations = s
                .data
                .iter()
                .filter_map(|o| {
                    let year = o.year.trim().parse::<i32>().ok()?;
                    let value = o.value.trim().replace(',', "").parse::<f64>().ok()?;
                    Some((year, value))
                })
                .collect();
            SeriesData {
                series_id: s.series_id,
                observations,
            }
        })
        .collect();

    Ok(series)
}

#[async_trait]
impl StatisticsSource for BlsClient {
    async fn fetch_series(
        &self,
        series_ids: &[String],
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<SeriesData>, ProviderError> {
        let request = match &self.api_key {
            Some(key) => self.client.post(BLS_V2_URL).json(&json!({
                "seriesid": series_ids,
                "startyear": start_year.to_string(),
                "endyear": end_year.to_string(),
                "registrationkey": key,
                "annualaverage": true,
            })),
            None => self.client.post(BLS_V1_URL).json(&json!({
                "seriesid": series_ids,
                "startyear": start_year.to_string(),
                "endyear": end_year.to_string(),
            })),
        };

        let body: BlsResponse = ensure_success(request.send().await?)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        into_series(body)
    }
}
