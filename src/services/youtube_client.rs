use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

static ISO_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^P(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?)?$",
    )
    .expect("ISO_DURATION is a valid regex pattern")
});

#[derive(Debug, Clone, PartialEq)]
pub struct VideoDetails {
    pub id: String,
    pub title: String,
    /// ISO-8601 duration as reported by the platform, e.g. `PT12M3S`.
    pub duration: String,
    pub thumbnail: Option<String>,
    pub channel: String,
}

impl VideoDetails {
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}

/// Video-platform collaborator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoSearchClient: Send + Sync {
    async fn search_ids(&self, query: &str, max_results: u32) -> AppResult<Vec<String>>;
    /// One batched metadata call for all ids.
    async fn video_details(&self, ids: &[String]) -> AppResult<Vec<VideoDetails>>;
}

/// Parses an ISO-8601 duration into seconds. `None` for anything that is not
/// a well-formed duration.
pub fn parse_iso8601_duration(value: &str) -> Option<f64> {
    let caps = ISO_DURATION.captures(value.trim())?;
    if caps.iter().skip(1).all(|c| c.is_none()) {
        return None;
    }

    let part = |i: usize| -> f64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
    };

    Some(part(1) * 604_800.0 + part(2) * 86_400.0 + part(3) * 3_600.0 + part(4) * 60.0 + part(5))
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    snippet: Snippet,
    #[serde(rename = "contentDetails")]
    content_details: ContentDetails,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    #[serde(default)]
    duration: String,
}

impl From<VideoItem> for VideoDetails {
    fn from(item: VideoItem) -> Self {
        let thumbnails = item.snippet.thumbnails;
        VideoDetails {
            id: item.id,
            title: item.snippet.title,
            duration: item.content_details.duration,
            thumbnail: thumbnails.medium.or(thumbnails.default).map(|t| t.url),
            channel: item.snippet.channel_title,
        }
    }
}

/// YouTube Data API v3.
pub struct YouTubeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl YouTubeClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        Self::with_base_url(
            &config.youtube_api_base,
            config.youtube_api_key.clone(),
            config.video_timeout(),
        )
    }

    pub fn with_base_url(
        base_url: &str,
        api_key: Option<SecretString>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn key(&self) -> AppResult<&str> {
        self.api_key
            .as_ref()
            .map(|k| k.expose_secret())
            .ok_or_else(|| AppError::Upstream("video API key is not configured".to_string()))
    }
}

#[async_trait]
impl VideoSearchClient for YouTubeClient {
    async fn search_ids(&self, query: &str, max_results: u32) -> AppResult<Vec<String>> {
        let key = self.key()?;
        let max_results = max_results.to_string();

        let response: SearchResponse = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("part", "id"),
                ("type", "video"),
                ("q", query),
                ("maxResults", max_results.as_str()),
                ("key", key),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect())
    }

    async fn video_details(&self, ids: &[String]) -> AppResult<Vec<VideoDetails>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let key = self.key()?;
        let joined = ids.join(",");

        let response: VideosResponse = self
            .http
            .get(format!("{}/videos", self.base_url))
            .query(&[
                ("part", "snippet,contentDetails"),
                ("id", joined.as_str()),
                ("key", key),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.items.into_iter().map(VideoDetails::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    #[test]
    fn parses_common_durations() {
        assert_eq!(parse_iso8601_duration("PT59S"), Some(59.0));
        assert_eq!(parse_iso8601_duration("PT1M"), Some(60.0));
        assert_eq!(parse_iso8601_duration("PT1H2M3S"), Some(3723.0));
        assert_eq!(parse_iso8601_duration("P1DT1S"), Some(86_401.0));
        assert_eq!(parse_iso8601_duration("PT0.5S"), Some(0.5));
    }

    #[test]
    fn rejects_malformed_durations() {
        assert_eq!(parse_iso8601_duration(""), None);
        assert_eq!(parse_iso8601_duration("P"), None);
        assert_eq!(parse_iso8601_duration("PT"), None);
        assert_eq!(parse_iso8601_duration("12:30"), None);
        assert_eq!(parse_iso8601_duration("P5Y"), None);
    }

    #[tokio::test]
    async fn missing_key_is_upstream_error() {
        let client =
            YouTubeClient::with_base_url("http://127.0.0.1:9", None, Duration::from_secs(1))
                .unwrap();
        let result = client.search_ids("rust", 5).await;
        assert!(matches!(result, Err(AppError::Upstream(_))));
    }

    #[tokio::test]
    async fn search_and_details_round_trip_against_api_shape() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "rust tutorial"))
            .and(query_param("maxResults", "15"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"id": {"kind": "youtube#video", "videoId": "abc"}},
                    {"id": {"kind": "youtube#channel"}},
                    {"id": {"kind": "youtube#video", "videoId": "def"}}
                ]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/videos"))
            .and(query_param("id", "abc,def"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {
                        "id": "abc",
                        "snippet": {
                            "title": "Rust in 100 seconds",
                            "channelTitle": "Fireship",
                            "thumbnails": {"medium": {"url": "https://i.ytimg.com/abc.jpg"}}
                        },
                        "contentDetails": {"duration": "PT2M5S"}
                    },
                    {
                        "id": "def",
                        "snippet": {"title": "Short", "thumbnails": {}},
                        "contentDetails": {"duration": "PT30S"}
                    }
                ]
            })))
            .mount(&server)
            .await;

        let client = YouTubeClient::with_base_url(
            &server.uri(),
            Some(SecretString::from("key".to_string())),
            Duration::from_secs(2),
        )
        .unwrap();

        let ids = client.search_ids("rust tutorial", 15).await.unwrap();
        assert_eq!(ids, vec!["abc", "def"]);

        let details = client.video_details(&ids).await.unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(details[0].channel, "Fireship");
        assert_eq!(details[0].thumbnail.as_deref(), Some("https://i.ytimg.com/abc.jpg"));
        assert_eq!(details[0].watch_url(), "https://www.youtube.com/watch?v=abc");
        assert_eq!(details[1].thumbnail, None);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = YouTubeClient::with_base_url(
            &server.uri(),
            Some(SecretString::from("key".to_string())),
            Duration::from_secs(2),
        )
        .unwrap();

        assert!(client.search_ids("rust", 5).await.is_err());
    }
}
