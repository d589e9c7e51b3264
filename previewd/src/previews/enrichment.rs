//! Style suggestions attached to every preview.
//!
//! [`Enricher`] is the seam for a real analysis backend. Until one exists,
//! [`MockEnricher`] fills the reply with fixed data templated on the metadata.

use super::upload::PreviewMetadata;
use async_trait::async_trait;
use thiserror::Error;

/// Subject used in the first similar-video title when no theme is given.
pub const DEFAULT_ACTIVITY: &str = "играть";
/// Subject used in the last similar-video title when no theme is given.
pub const DEFAULT_GAME: &str = "Minecraft";
/// Suggested style when the caller did not ask for one.
pub const DEFAULT_RECOMMENDED_STYLE: &str = "Яркий и драматичный";
pub const COLOR_SCHEME: [&str; 3] = ["#FF6B6B", "#4ECDC4", "#FFE66D"];
pub const FONT_SUGGESTIONS: [&str; 3] = ["Impact", "Bebas Neue", "Montserrat Bold"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarVideo {
    pub title: String,
    /// Human formatted view count, e.g. `1.2M`
    pub views: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    pub similar_videos: Vec<SimilarVideo>,
    pub recommended_style: String,
    pub color_scheme: Vec<String>,
    pub font_suggestions: Vec<String>,
}

#[derive(Error, Debug)]
pub enum EnrichmentError {
    #[error("Analysis backend unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait Enricher: Send + Sync {
    async fn enrich(&self, metadata: &PreviewMetadata) -> Result<Enrichment, EnrichmentError>;
}

/// Fixed suggestions; only the video titles and the style depend on the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockEnricher;

impl MockEnricher {
    pub fn suggestions(metadata: &PreviewMetadata) -> Enrichment {
        let recommended_style = non_empty_or(&metadata.style, DEFAULT_RECOMMENDED_STYLE).to_string();

        Enrichment {
            similar_videos: vec![
                SimilarVideo {
                    title: format!("Топ 10 способов {}", non_empty_or(&metadata.theme, DEFAULT_ACTIVITY)),
                    views: "1.2M".to_string(),
                },
                SimilarVideo {
                    title: format!("{} - ГАЙД", metadata.title),
                    views: "850K".to_string(),
                },
                SimilarVideo {
                    title: format!("Как стать ПРО в {}", non_empty_or(&metadata.theme, DEFAULT_GAME)),
                    views: "2.1M".to_string(),
                },
            ],
            recommended_style,
            color_scheme: COLOR_SCHEME.iter().map(|c| c.to_string()).collect(),
            font_suggestions: FONT_SUGGESTIONS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}

#[async_trait]
impl Enricher for MockEnricher {
    async fn enrich(&self, metadata: &PreviewMetadata) -> Result<Enrichment, EnrichmentError> {
        Ok(Self::suggestions(metadata))
    }
}
