use crate::api::models::previews::{ErrorResponse, PreviewRequest, PreviewResponse};
use crate::errors::{Error, Result};
use crate::metrics::{self, UploadOutcome};
use crate::previews::{ObjectKey, PreviewUpload, compose};
use crate::storage::PREVIEW_CONTENT_TYPE;
use crate::previews::upload::MALFORMED_BODY_MESSAGE;
use crate::AppState;
use axum::{
    Json,
    extract::{State, rejection::BytesRejection},
    http::StatusCode,
};
use bytes::Bytes;
use chrono::Utc;

#[utoipa::path(
    post,
    path = "/generate-preview",
    tag = "previews",
    summary = "Upload preview",
    description = "Store a preview image and get back its public URL together with style suggestions. \
                   The image is always stored as `image/jpeg` under a key derived from the upload second \
                   and a hash of its first 1000 bytes.",
    request_body = PreviewRequest,
    responses(
        (status = 200, description = "Image stored", body = PreviewResponse),
        (status = 400, description = "Missing image or title, or malformed body", body = ErrorResponse),
        (status = 405, description = "Method other than POST or OPTIONS", body = ErrorResponse),
        (status = 413, description = "Payload too large", body = ErrorResponse),
        (status = 500, description = "Undecodable image, storage or analysis backend failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_preview(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<PreviewResponse>> {
    let result = match body {
        Ok(body) => store_preview(&state, &body).await,
        Err(rejection) => Err(body_rejection(&state, rejection)),
    };

    let outcome = match &result {
        Ok(_) => UploadOutcome::Stored,
        Err(Error::Validation { .. } | Error::PayloadTooLarge { .. }) => UploadOutcome::Rejected,
        Err(_) => UploadOutcome::Failed,
    };
    metrics::record_upload(outcome);

    result.map(Json)
}

/// Route body extraction failures through [`Error`] so they get a JSON body too.
fn body_rejection(state: &AppState, rejection: BytesRejection) -> Error {
    tracing::debug!("Failed to read request body: {}", rejection.body_text());
    match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => Error::PayloadTooLarge {
            limit: state.config.limits.max_body_bytes,
        },
        _ => Error::Validation {
            message: MALFORMED_BODY_MESSAGE.to_string(),
        },
    }
}

async fn store_preview(state: &AppState, body: &[u8]) -> Result<PreviewResponse> {
    let PreviewUpload { image, metadata } = PreviewUpload::from_body(body)?;

    let key = ObjectKey::derive(&state.config.storage.folder, Utc::now(), &image);
    let size = image.len();

    // Checked before writing so a misconfigured CDN never leaves an orphaned object
    let account_id = state.config.cdn_account_id().ok_or_else(|| Error::Internal {
        operation: "resolve CDN account id".to_string(),
    })?;

    state.store.put_object(key.as_str(), image, PREVIEW_CONTENT_TYPE).await?;

    tracing::info!(key = %key, bytes = size, "Stored preview image");
    metrics::record_stored_bytes(size);

    let image_url = compose::public_url(&state.config.cdn.base_url, account_id, &state.config.cdn.bucket_segment, &key);
    let enrichment = state.enricher.enrich(&metadata).await?;

    Ok(compose::success_response(image_url, metadata, enrichment))
}

/// Fallback for every method the preview route does not serve. OPTIONS never
/// gets here: the CORS layer answers it first.
pub async fn method_not_allowed() -> Error {
    Error::MethodNotAllowed
}
