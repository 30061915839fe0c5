//! YouTube Data API v3 client.
//!
//! One call per search, fixed timeout, no retries. Zero results is a
//! successful outcome; a non-success status or a transport failure is
//! `AppError::SearchUnavailable`, carrying the status and raw body for the
//! logs (never for the user).

use serde::Deserialize;

use crate::core::config;
use crate::core::error::AppError;

const SEARCH_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/search";
const VIDEOS_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/videos";

/// One search result the user may pick for conversion. Ephemeral: lives
/// only for the duration of the interaction turn, with the video id round-
/// tripped through the callback token.
#[derive(Debug, Clone)]
pub struct SearchCandidate {
    /// Video ID in the external service, unique per result
    pub video_id: String,
    /// Human-readable title (truncated later, at presentation)
    pub title: String,
    /// Channel name, kept for logs and future display
    pub channel: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Snippet,
}

#[derive(Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct Snippet {
    title: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
}

#[derive(Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Deserialize)]
struct VideoItem {
    snippet: Snippet,
}

/// Client for the external video-search service.
pub struct SearchClient {
    http: reqwest::Client,
    api_key: String,
}

impl SearchClient {
    /// Builds a client with the configured API key and request timeout.
    pub fn new(api_key: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config::search::timeout())
            .build()
            .unwrap_or_default();
        Self { http, api_key }
    }

    /// Builds the client from the process environment.
    pub fn from_env() -> Self {
        Self::new(config::YT_API_KEY.clone())
    }

    /// Searches for videos matching `query`, preserving the service's
    /// relevance ordering and returning at most `limit` candidates.
    ///
    /// An empty list is success ("no results"), not a failure.
    pub async fn search(&self, query: &str, limit: u8) -> Result<Vec<SearchCandidate>, AppError> {
        let max_results = limit.to_string();
        let response = self
            .http
            .get(SEARCH_ENDPOINT)
            .query(&[
                ("part", "snippet"),
                ("q", query),
                ("type", "video"),
                ("maxResults", max_results.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::SearchUnavailable {
                status: None,
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::SearchUnavailable {
                status: Some(status),
                detail: body,
            });
        }

        let data: SearchResponse = response.json().await.map_err(|e| AppError::SearchUnavailable {
            status: Some(status),
            detail: format!("malformed response body: {}", e),
        })?;

        Ok(map_candidates(data, limit))
    }

    /// Best-effort title lookup via the detail endpoint.
    ///
    /// Returns `None` on any failure — callers fall back to the raw video
    /// id, this is enrichment, never a failure mode.
    pub async fn video_title(&self, video_id: &str) -> Option<String> {
        let response = self
            .http
            .get(VIDEOS_ENDPOINT)
            .query(&[("part", "snippet"), ("id", video_id), ("key", self.api_key.as_str())])
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            log::debug!(
                "Title lookup for {} returned status {}",
                video_id,
                response.status()
            );
            return None;
        }

        let data: VideosResponse = response.json().await.ok()?;
        data.items.into_iter().next().map(|item| item.snippet.title)
    }
}

/// Maps the raw API payload into candidates, dropping items without a
/// video id (channels/playlists should already be filtered by `type=video`,
/// but the field is optional in the schema).
fn map_candidates(data: SearchResponse, limit: u8) -> Vec<SearchCandidate> {
    data.items
        .into_iter()
        .filter_map(|item| {
            Some(SearchCandidate {
                video_id: item.id.video_id?,
                title: item.snippet.title,
                channel: item.snippet.channel_title,
            })
        })
        .take(limit as usize)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "items": [
            {
                "id": {"videoId": "abc123"},
                "snippet": {"title": "Never Gonna Give You Up", "channelTitle": "Rick Astley"}
            },
            {
                "id": {},
                "snippet": {"title": "A channel result without a videoId", "channelTitle": "Noise"}
            },
            {
                "id": {"videoId": "def456"},
                "snippet": {"title": "Together Forever", "channelTitle": "Rick Astley"}
            }
        ]
    }"#;

    #[test]
    fn test_map_candidates_preserves_order_and_drops_idless_items() {
        let data: SearchResponse = serde_json::from_str(SAMPLE).unwrap();
        let candidates = map_candidates(data, 8);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].video_id, "abc123");
        assert_eq!(candidates[0].title, "Never Gonna Give You Up");
        assert_eq!(candidates[1].video_id, "def456");
    }

    #[test]
    fn test_map_candidates_respects_limit() {
        let data: SearchResponse = serde_json::from_str(SAMPLE).unwrap();
        let candidates = map_candidates(data, 1);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].video_id, "abc123");
    }

    #[test]
    fn test_empty_response_is_success() {
        let data: SearchResponse = serde_json::from_str(r#"{"items": []}"#).unwrap();
        assert!(map_candidates(data, 8).is_empty());

        // A body with no items key at all also parses.
        let data: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(map_candidates(data, 8).is_empty());
    }
}
