use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /generate-preview`.
///
/// Required fields are optional here so that their absence surfaces as a
/// validation error with a readable message instead of a parse failure.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PreviewRequest {
    /// Base64 image, optionally as a data URI (`data:image/jpeg;base64,...`)
    #[schema(example = "data:image/jpeg;base64,/9j/4AAQSkZJRg...")]
    pub image: Option<String>,
    /// Video title
    #[schema(example = "КАК ПОСТРОИТЬ ДОМ В МАЙНКРАФТ")]
    pub title: Option<String>,
    /// Video theme, e.g. "выживание"
    pub theme: Option<String>,
    /// Desired preview style, e.g. "яркий"
    pub style: Option<String>,
}

/// Successful upload reply.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PreviewResponse {
    /// Always `true`
    pub success: bool,
    /// Public CDN address of the stored image
    pub image_url: String,
    pub title: String,
    /// Echoed back, empty when not provided
    pub theme: String,
    /// Echoed back, empty when not provided
    pub style: String,
    pub ai_analysis: AiAnalysis,
    pub message: String,
}

/// Style suggestions for the preview.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AiAnalysis {
    pub similar_videos: Vec<SimilarVideoResponse>,
    pub recommended_style: String,
    /// Hex colour codes
    #[schema(example = json!(["#FF6B6B", "#4ECDC4", "#FFE66D"]))]
    pub color_scheme: Vec<String>,
    pub font_suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SimilarVideoResponse {
    pub title: String,
    #[schema(example = "1.2M")]
    pub views: String,
}

/// Body of every non-2xx reply.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
