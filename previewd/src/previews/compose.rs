use super::{Enrichment, ObjectKey, PreviewMetadata};
use crate::api::models::previews::{AiAnalysis, PreviewResponse, SimilarVideoResponse};
use url::Url;

/// Confirmation sent with every successful upload.
pub const SUCCESS_MESSAGE: &str = "Превью создано! ИИ нашёл похожие видео и подобрал стиль";

/// `{base_url}/projects/{account_id}/{bucket_segment}/{key}`
pub fn public_url(base_url: &Url, account_id: &str, bucket_segment: &str, key: &ObjectKey) -> String {
    format!(
        "{}/projects/{}/{}/{}",
        base_url.as_str().trim_end_matches('/'),
        account_id,
        bucket_segment.trim_matches('/'),
        key
    )
}

pub fn success_response(image_url: String, metadata: PreviewMetadata, enrichment: Enrichment) -> PreviewResponse {
    let PreviewMetadata { title, theme, style } = metadata;

    PreviewResponse {
        success: true,
        image_url,
        title,
        theme,
        style,
        ai_analysis: AiAnalysis {
            similar_videos: enrichment
                .similar_videos
                .into_iter()
                .map(|video| SimilarVideoResponse {
                    title: video.title,
                    views: video.views,
                })
                .collect(),
            recommended_style: enrichment.recommended_style,
            color_scheme: enrichment.color_scheme,
            font_suggestions: enrichment.font_suggestions,
        },
        message: SUCCESS_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::previews::MockEnricher;
    use chrono::{TimeZone, Utc};

    fn key() -> ObjectKey {
        ObjectKey::derive("previews", Utc.with_ymd_and_hms(2024, 5, 18, 14, 23, 1).unwrap(), b"hello")
    }

    #[test]
    fn test_public_url() {
        let base: Url = "https://cdn.poehali.dev".parse().unwrap();
        assert_eq!(
            public_url(&base, "project-1", "bucket", &key()),
            "https://cdn.poehali.dev/projects/project-1/bucket/previews/20240518_142301_5d41402a.jpg"
        );
    }

    #[test]
    fn test_public_url_with_trailing_slashes() {
        let base: Url = "https://cdn.example.com/".parse().unwrap();
        assert_eq!(
            public_url(&base, "acc", "/bucket/", &key()),
            "https://cdn.example.com/projects/acc/bucket/previews/20240518_142301_5d41402a.jpg"
        );
    }

    #[test]
    fn test_success_response_serialization() {
        let metadata = PreviewMetadata {
            title: "Мой дом".to_string(),
            theme: String::new(),
            style: String::new(),
        };
        let enrichment = MockEnricher::suggestions(&metadata);
        let response = success_response("https://cdn/x.jpg".to_string(), metadata, enrichment);

        let json = serde_json::to_string(&response).unwrap();
        // Non-ASCII text is written literally
        assert!(json.contains(r#""title":"Мой дом""#));
        assert!(json.contains(SUCCESS_MESSAGE));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["image_url"], "https://cdn/x.jpg");
        assert_eq!(value["theme"], "");
        assert_eq!(value["ai_analysis"]["similar_videos"][1]["title"], "Мой дом - ГАЙД");
        assert_eq!(value["ai_analysis"]["similar_videos"][1]["views"], "850K");
        assert_eq!(value["ai_analysis"]["recommended_style"], "Яркий и драматичный");
    }
}
