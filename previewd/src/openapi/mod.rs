//! OpenAPI documentation for the preview service.
//!
//! The document is served as JSON at `/api-docs/openapi.json` and rendered with
//! Scalar at `/docs`.

use utoipa::OpenApi;

use crate::api::{
    handlers,
    models::previews::{AiAnalysis, ErrorResponse, PreviewRequest, PreviewResponse, SimilarVideoResponse},
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "previewd",
        description = "Upload video previews to object storage and get CDN links with style suggestions."
    ),
    paths(handlers::previews::create_preview, handlers::health::healthz),
    components(schemas(PreviewRequest, PreviewResponse, AiAnalysis, SimilarVideoResponse, ErrorResponse)),
    tags(
        (name = "previews", description = "Preview upload"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_preview_route() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/generate-preview"));
        assert!(doc.paths.paths.contains_key("/healthz"));

        let schemas = &doc.components.as_ref().unwrap().schemas;
        assert!(schemas.contains_key("PreviewResponse"));
        assert!(schemas.contains_key("ErrorResponse"));
    }
}
