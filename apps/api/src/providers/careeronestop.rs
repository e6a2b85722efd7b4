use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{ensure_success, OccupationLookup, ProviderError};
use crate::models::occupation::OccupationCandidate;

const OCCUPATION_URL: &str = "https://api.careeronestop.org/v1/occupation";

pub struct CareerOneStopClient {
    client: Client,
    user_id: String,
    token: String,
}

impl CareerOneStopClient {
    pub fn new(client: Client, user_id: String, token: String) -> Self {
        Self {
            client,
            user_id,
            token,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OccupationResponse {
    #[serde(rename = "OccupationList", default)]
    occupation_list: Vec<OccupationRecord>,
}

#[derive(Debug, Deserialize)]
struct OccupationRecord {
    #[serde(rename = "OccupationTitle", default)]
    title: Option<String>,
    #[serde(rename = "OnetCode", default)]
    code: Option<String>,
    #[serde(rename = "AlternateTitles", default)]
    alternate_titles: Option<Vec<String>>,
}

fn candidates(response: OccupationResponse) -> Vec<OccupationCandidate> {
    response
        .occupation_list
        .into_iter()
        .map(|r| OccupationCandidate {
            title: r.title.unwrap_or_default(),
            code: r.code.unwrap_or_default(),
            alternate_titles: r.alternate_titles.unwrap_or_default(),
        })
        .collect()
}

#[async_trait]
impl OccupationLookup for CareerOneStopClient {
    async fn search(&self, title: &str) -> Result<Vec<OccupationCandidate>, ProviderError> {
        let mut url = reqwest::Url::parse(OCCUPATION_URL)
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::Malformed("occupation URL cannot take a path".into()))?
            .extend([self.user_id.as_str(), title, "0", "0"]);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .send()
            .await?;

        let body: OccupationResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        Ok(candidates(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_tolerate_missing_fields() {
        let body: OccupationResponse = serde_json::from_value(serde_json::json!({
            "OccupationList": [
                {"OccupationTitle": "Data Scientists", "OnetCode": "15-2051.00"},
                {"OnetCode": "15-2051.01"}
            ]
        }))
        .unwrap();

        let list = candidates(body);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].title, "Data Scientists");
        assert_eq!(list[1].title, "");
        assert!(list[1].alternate_titles.is_empty());
    }
}
