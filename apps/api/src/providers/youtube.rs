use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use super::{ensure_success, ProviderError, VideoSearch};
use crate::models::resource::VideoCandidate;

const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const VIDEOS_URL: &str = "https://www.googleapis.com/youtube/v3/videos";

pub struct YouTubeClient {
    client: Client,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct SearchId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    #[serde(rename = "channelTitle")]
    channel_title: String,
    #[serde(rename = "publishedAt")]
    published_at: String,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    #[serde(rename = "contentDetails")]
    content_details: ContentDetails,
    #[serde(default)]
    statistics: Statistics,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: String,
}

#[derive(Debug, Default, Deserialize)]
struct Statistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
}

/// Parses an ISO 8601 duration such as `PT1H30M20S` into whole minutes.
pub fn parse_iso_duration_minutes(raw: &str) -> u32 {
    let Some(time) = raw.split('T').nth(1) else {
        return 0;
    };
    let mut seconds = 0_u64;
    let mut digits = String::new();
    for ch in time.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        let value = digits.parse::<u64>().unwrap_or(0);
        digits.clear();
        seconds += match ch {
            'H' => value * 3600,
            'M' => value * 60,
            'S' => value,
            _ => 0,
        };
    }
    (seconds / 60) as u32
}

fn published_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()
}

impl YouTubeClient {
    async fn video_details(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, (u32, u64)>, ProviderError> {
        let response = self
            .client
            .get(VIDEOS_URL)
            .query(&[
                ("part", "contentDetails,statistics"),
                ("id", ids.join(",").as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let body: VideosResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        Ok(body
            .items
            .into_iter()
            .map(|v| {
                let minutes = parse_iso_duration_minutes(&v.content_details.duration);
                let views = v
                    .statistics
                    .view_count
                    .and_then(|c| c.parse::<u64>().ok())
                    .unwrap_or(0);
                (v.id, (minutes, views))
            })
            .collect())
    }
}

#[async_trait]
impl VideoSearch for YouTubeClient {
    async fn search(
        &self,
        query: &str,
        channel_id: &str,
        max_results: u32,
    ) -> Result<Vec<VideoCandidate>, ProviderError> {
        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("part", "snippet"),
                ("q", query),
                ("channelId", channel_id),
                ("type", "video"),
                ("order", "relevance"),
                ("key", self.api_key.as_str()),
            ])
            .query(&[("maxResults", max_results)])
            .send()
            .await?;

        let body: SearchResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let hits: Vec<(String, Snippet)> = body
            .items
            .into_iter()
            .filter_map(|item| Some((item.id.video_id?, item.snippet)))
            .collect();
        if hits.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = hits.iter().map(|(id, _)| id.clone()).collect();
        let details = self.video_details(&ids).await?;

        Ok(hits
            .into_iter()
            .filter_map(|(video_id, snippet)| {
                let upload_date = published_date(&snippet.published_at)?;
                let (duration_minutes, views) = details.get(&video_id).copied().unwrap_or((0, 0));
                Some(VideoCandidate {
                    video_id,
                    title: snippet.title,
                    channel: snippet.channel_title,
                    views,
                    duration_minutes,
                    upload_date,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_duration_minutes() {
        assert_eq!(parse_iso_duration_minutes("PT1H30M20S"), 90);
        assert_eq!(parse_iso_duration_minutes("PT45M"), 45);
        assert_eq!(parse_iso_duration_minutes("PT59S"), 0);
        assert_eq!(parse_iso_duration_minutes("PT4H"), 240);
        assert_eq!(parse_iso_duration_minutes("garbage"), 0);
    }

    #[test]
    fn test_published_date_takes_calendar_day() {
        assert_eq!(
            published_date("2023-04-05T12:00:00Z"),
            NaiveDate::from_ymd_opt(2023, 4, 5)
        );
        assert_eq!(published_date("bad"), None);
    }
}
