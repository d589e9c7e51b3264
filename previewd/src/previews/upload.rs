use crate::api::models::previews::PreviewRequest;
use crate::errors::{Error, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use bytes::Bytes;

/// Returned when `image` or `title` is absent or empty.
pub const MISSING_FIELDS_MESSAGE: &str = "Необходимо загрузить фото и указать название";
/// Returned when the body is not a JSON object.
pub const MALFORMED_BODY_MESSAGE: &str = "Некорректный запрос: тело должно быть JSON-объектом";

/// Descriptive fields echoed back to the caller and fed to enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreviewMetadata {
    pub title: String,
    /// Empty when not provided
    pub theme: String,
    /// Empty when not provided
    pub style: String,
}

/// A request that passed validation, with the image already decoded.
#[derive(Debug, Clone)]
pub struct PreviewUpload {
    pub image: Bytes,
    pub metadata: PreviewMetadata,
}

impl PreviewUpload {
    /// Parse and validate a raw request body.
    ///
    /// An empty body is treated as `{}` and therefore fails with the missing-fields message.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        let request: PreviewRequest = if body.iter().all(u8::is_ascii_whitespace) {
            PreviewRequest::default()
        } else {
            serde_json::from_slice(body).map_err(|e| {
                tracing::debug!(error = %e, "Request body is not a valid preview request");
                Error::Validation {
                    message: MALFORMED_BODY_MESSAGE.to_string(),
                }
            })?
        };

        Self::from_request(request)
    }

    pub fn from_request(request: PreviewRequest) -> Result<Self> {
        let PreviewRequest { image, title, theme, style } = request;

        let (Some(image), Some(title)) = (image.filter(|s| !s.is_empty()), title.filter(|s| !s.is_empty())) else {
            return Err(Error::Validation {
                message: MISSING_FIELDS_MESSAGE.to_string(),
            });
        };

        let image = decode_image(&image)?;

        Ok(Self {
            image,
            metadata: PreviewMetadata {
                title,
                theme: theme.unwrap_or_default(),
                style: style.unwrap_or_default(),
            },
        })
    }
}

/// Drop a `data:<mime>;base64,` style prefix. With a comma present the payload
/// is the second comma-separated segment; anything after a further comma is dropped.
pub fn strip_data_uri(value: &str) -> &str {
    value.split(',').nth(1).unwrap_or(value)
}

/// Decode a bare base64 string or a data URI into raw bytes.
///
/// Line breaks and other ASCII whitespace inside the payload are ignored.
pub fn decode_image(value: &str) -> Result<Bytes> {
    let payload: String = strip_data_uri(value).chars().filter(|c| !c.is_ascii_whitespace()).collect();

    let bytes = STANDARD.decode(payload.as_bytes()).map_err(|e| Error::Decode { reason: e.to_string() })?;

    if bytes.is_empty() {
        return Err(Error::Decode {
            reason: "image payload is empty".to_string(),
        });
    }

    Ok(Bytes::from(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{SAMPLE_JPEG, sample_image_base64, sample_image_data_uri};
    use serde_json::json;

    fn body(value: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn test_valid_request_with_defaults() {
        let upload = PreviewUpload::from_body(&body(json!({
            "image": sample_image_base64(),
            "title": "My Video",
        })))
        .unwrap();

        assert_eq!(upload.image.as_ref(), SAMPLE_JPEG);
        assert_eq!(upload.metadata.title, "My Video");
        assert_eq!(upload.metadata.theme, "");
        assert_eq!(upload.metadata.style, "");
    }

    #[test]
    fn test_null_optional_fields_default_to_empty() {
        let upload = PreviewUpload::from_body(&body(json!({
            "image": sample_image_base64(),
            "title": "My Video",
            "theme": null,
            "style": "мемный",
        })))
        .unwrap();

        assert_eq!(upload.metadata.theme, "");
        assert_eq!(upload.metadata.style, "мемный");
    }

    #[test]
    fn test_missing_or_empty_required_fields() {
        let cases = [
            json!({ "title": "My Video" }),
            json!({ "image": "", "title": "My Video" }),
            json!({ "image": sample_image_base64() }),
            json!({ "image": sample_image_base64(), "title": "" }),
            json!({ "image": null, "title": null }),
            json!({}),
        ];

        for case in cases {
            let err = PreviewUpload::from_body(&body(case.clone())).unwrap_err();
            match err {
                Error::Validation { message } => assert_eq!(message, MISSING_FIELDS_MESSAGE, "case: {case}"),
                other => panic!("expected validation error for {case}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_whitespace_title_is_not_missing() {
        let upload = PreviewUpload::from_body(&body(json!({
            "image": sample_image_base64(),
            "title": "   ",
        })))
        .unwrap();

        assert_eq!(upload.metadata.title, "   ");
    }

    #[test]
    fn test_empty_body_is_missing_fields() {
        let err = PreviewUpload::from_body(b"").unwrap_err();
        assert!(matches!(err, Error::Validation { ref message } if message == MISSING_FIELDS_MESSAGE));
    }

    #[test]
    fn test_malformed_body() {
        for raw in [&b"not json"[..], b"[1, 2, 3]", br#"{"image": 42, "title": "x"}"#] {
            let err = PreviewUpload::from_body(raw).unwrap_err();
            assert!(matches!(err, Error::Validation { ref message } if message == MALFORMED_BODY_MESSAGE));
        }
    }

    #[test]
    fn test_data_uri_and_bare_base64_decode_identically() {
        let from_uri = decode_image(&sample_image_data_uri()).unwrap();
        let from_bare = decode_image(&sample_image_base64()).unwrap();

        assert_eq!(from_uri, from_bare);
        assert_eq!(from_uri.as_ref(), SAMPLE_JPEG);
    }

    #[test]
    fn test_strip_data_uri() {
        assert_eq!(strip_data_uri("data:image/png;base64,AAAA"), "AAAA");
        assert_eq!(strip_data_uri("AAAA"), "AAAA");
        assert_eq!(strip_data_uri(",AAAA"), "AAAA");
        assert_eq!(strip_data_uri("data:image/png;base64,AAAA,trailing"), "AAAA");
    }

    #[test]
    fn test_segment_after_second_comma_is_ignored() {
        let value = format!("{},not base64 at all", sample_image_data_uri());

        assert_eq!(decode_image(&value).unwrap().as_ref(), SAMPLE_JPEG);
    }

    #[test]
    fn test_wrapped_base64_is_accepted() {
        let encoded = sample_image_base64();
        let (head, tail) = encoded.split_at(8);
        let wrapped = format!("{head}\r\n{tail}\n");

        assert_eq!(decode_image(&wrapped).unwrap().as_ref(), SAMPLE_JPEG);
    }

    #[test]
    fn test_invalid_base64_is_decode_error() {
        let err = decode_image("data:image/jpeg;base64,@@not-base64@@").unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_empty_payload_after_prefix_is_decode_error() {
        let err = decode_image("data:image/jpeg;base64,").unwrap_err();
        assert!(matches!(err, Error::Decode { ref reason } if reason.contains("empty")));
    }
}
