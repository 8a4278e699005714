use std::{collections::HashSet, sync::Arc};

use crate::{
    errors::AppResult,
    models::domain::{Resource, ResourceBundle, ResourceKind, RoadmapMode, Topic},
    repositories::ProgressRepository,
    services::{
        search_client::{SearchHit, WebSearchClient},
        sentiment,
        youtube_client::{parse_iso8601_duration, VideoSearchClient},
    },
};

pub const VIDEO_CAP: usize = 5;
pub const ARTICLE_CAP: usize = 5;
pub const PDF_CAP: usize = 4;

const VIDEO_OVERFETCH: u32 = 15;
const MIN_VIDEO_SECONDS: f64 = 60.0;

pub const ARTICLE_DOMAINS: &[&str] = &[
    "geeksforgeeks.org",
    "w3schools.com",
    "freecodecamp.org",
    "developer.mozilla.org",
    "tutorialspoint.com",
];

const PDF_SUFFIXES: &[&str] = &["cheat sheet filetype:pdf", "lecture notes filetype:pdf"];

const FALLBACK_SEARCH_URL: &str = "https://www.google.com/search?q=";

/// Fans out to the video platform, the article scrape and the document scrape
/// at once. Each source degrades on its own; nothing here returns an error.
pub struct ResourceService {
    videos: Arc<dyn VideoSearchClient>,
    search: Arc<dyn WebSearchClient>,
    progress: Arc<dyn ProgressRepository>,
}

impl ResourceService {
    pub fn new(
        videos: Arc<dyn VideoSearchClient>,
        search: Arc<dyn WebSearchClient>,
        progress: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            videos,
            search,
            progress,
        }
    }

    pub async fn get_resources(&self, topic: &Topic, mode: RoadmapMode) -> ResourceBundle {
        let (videos, articles, pdfs, reviews) = tokio::join!(
            self.videos_or_empty(topic, mode),
            self.articles_or_fallback(topic),
            self.pdfs_or_fallback(topic),
            self.review_summary(topic),
        );

        let mut bundle = ResourceBundle {
            videos,
            articles,
            pdfs,
            ..Default::default()
        };
        if let Some((count, mean)) = reviews {
            let trust = sentiment::satisfaction_percent(mean);
            bundle.trust_score = Some(trust);
            bundle.satisfaction_level = Some(satisfaction_label(trust).to_string());
            bundle.review_count = Some(count);
        }
        bundle
    }

    async fn videos_or_empty(&self, topic: &Topic, mode: RoadmapMode) -> Vec<Resource> {
        match self.fetch_videos(topic, mode).await {
            Ok(videos) => videos,
            Err(e) => {
                log::warn!("video lookup for '{}' failed: {}", topic, e);
                Vec::new()
            }
        }
    }

    async fn fetch_videos(&self, topic: &Topic, mode: RoadmapMode) -> AppResult<Vec<Resource>> {
        let query = match mode {
            RoadmapMode::Standard => format!("{} tutorial", topic),
            RoadmapMode::Crash => format!("{} crash course in 10 minutes", topic),
        };

        let ids = self.videos.search_ids(&query, VIDEO_OVERFETCH).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let details = self.videos.video_details(&ids).await?;
        let videos = details
            .into_iter()
            .filter(|v| !is_short(&v.duration))
            .take(VIDEO_CAP)
            .map(|v| {
                let mut resource = Resource::new(ResourceKind::Video, v.title.clone(), v.watch_url());
                resource.thumbnail = v.thumbnail;
                resource.channel = Some(v.channel);
                resource
            })
            .collect();
        Ok(videos)
    }

    async fn articles_or_fallback(&self, topic: &Topic) -> Vec<Resource> {
        let sites = ARTICLE_DOMAINS
            .iter()
            .map(|d| format!("site:{}", d))
            .collect::<Vec<_>>()
            .join(" OR ");
        let query = format!("{} tutorial {}", topic, sites);

        match self.search.search(&query, ARTICLE_CAP).await {
            Ok(hits) if !hits.is_empty() => hits
                .into_iter()
                .take(ARTICLE_CAP)
                .map(|hit| to_resource(hit, ResourceKind::Article))
                .collect(),
            Ok(_) => {
                log::info!("no article results for '{}', using search links", topic);
                article_fallback(topic)
            }
            Err(e) => {
                log::warn!("article scrape for '{}' failed: {}", topic, e);
                article_fallback(topic)
            }
        }
    }

    async fn pdfs_or_fallback(&self, topic: &Topic) -> Vec<Resource> {
        let cheat_sheet = format!("{} {}", topic, PDF_SUFFIXES[0]);
        let lecture_notes = format!("{} {}", topic, PDF_SUFFIXES[1]);
        let (first, second) = tokio::join!(
            self.search.search(&cheat_sheet, PDF_CAP),
            self.search.search(&lecture_notes, PDF_CAP),
        );

        let mut seen = HashSet::new();
        let mut pdfs = Vec::new();
        for result in [first, second] {
            let hits = match result {
                Ok(hits) => hits,
                Err(e) => {
                    log::warn!("document scrape for '{}' failed: {}", topic, e);
                    continue;
                }
            };
            for hit in hits {
                if pdfs.len() >= PDF_CAP {
                    break;
                }
                if seen.insert(dedup_key(&hit.url)) {
                    pdfs.push(to_resource(hit, ResourceKind::Pdf));
                }
            }
        }

        if pdfs.is_empty() {
            return pdf_fallback(topic);
        }
        pdfs
    }

    /// `(review_count, mean_sentiment)` over stored feedback for the topic.
    async fn review_summary(&self, topic: &Topic) -> Option<(u64, f64)> {
        let scores = match self.progress.sentiment_scores(Some(topic)).await {
            Ok(scores) => scores,
            Err(e) => {
                log::warn!("review summary for '{}' unavailable: {}", topic, e);
                return None;
            }
        };
        sentiment::mean(&scores).map(|mean| (scores.len() as u64, mean))
    }
}

/// Only durations that parse and fall under a minute count as short.
fn is_short(duration: &str) -> bool {
    parse_iso8601_duration(duration).is_some_and(|secs| secs < MIN_VIDEO_SECONDS)
}

fn satisfaction_label(trust: u8) -> &'static str {
    match trust {
        75..=100 => "Highly Rated",
        55..=74 => "Positive",
        40..=54 => "Mixed",
        _ => "Needs Improvement",
    }
}

fn to_resource(hit: SearchHit, kind: ResourceKind) -> Resource {
    Resource::new(kind, hit.title, hit.url).with_snippet(hit.snippet)
}

fn dedup_key(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    let url = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    url.strip_prefix("www.").unwrap_or(url).to_lowercase()
}

fn search_link(query: &str) -> String {
    format!("{}{}", FALLBACK_SEARCH_URL, urlencoding::encode(query))
}

pub fn article_fallback(topic: &Topic) -> Vec<Resource> {
    ARTICLE_DOMAINS
        .iter()
        .take(ARTICLE_CAP)
        .map(|domain| {
            Resource::new(
                ResourceKind::SearchFallback,
                format!("Search {} for {}", domain, topic),
                search_link(&format!("{} site:{}", topic, domain)),
            )
        })
        .collect()
}

pub fn pdf_fallback(topic: &Topic) -> Vec<Resource> {
    PDF_SUFFIXES
        .iter()
        .map(|suffix| {
            let label = suffix.trim_end_matches(" filetype:pdf");
            Resource::new(
                ResourceKind::SearchFallback,
                format!("{} {} (PDF search)", topic, label),
                search_link(&format!("{} {}", topic, suffix)),
            )
        })
        .collect()
}
