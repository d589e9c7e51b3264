use crate::previews::enrichment::EnrichmentError;
use crate::storage::StorageError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

/// Message returned when the preview endpoint is called with anything but POST or OPTIONS.
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";

#[derive(ThisError, Debug)]
pub enum Error {
    /// Missing or malformed request fields
    #[error("{message}")]
    Validation { message: String },

    /// Request used a method other than POST (OPTIONS never reaches the handlers)
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// The image payload could not be turned into bytes
    #[error("Failed to decode image: {reason}")]
    Decode { reason: String },

    /// Request body exceeded the configured size limit
    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Object storage write failed, including missing credentials
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The analysis backend could not produce suggestions
    #[error(transparent)]
    Enrichment(#[from] EnrichmentError),

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Error::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Error::Decode { .. } | Error::Storage(_) | Error::Enrichment(_) | Error::Internal { .. } | Error::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns a user-safe error message, without leaking backend failure details
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation { message } => message.clone(),
            Error::MethodNotAllowed => METHOD_NOT_ALLOWED_MESSAGE.to_string(),
            Error::PayloadTooLarge { .. } => "Файл слишком большой".to_string(),
            Error::Decode { .. } => "Ошибка: не удалось прочитать изображение".to_string(),
            Error::Storage(StorageError::MissingCredentials) => "Ошибка: хранилище не настроено".to_string(),
            Error::Storage(_) => "Ошибка: не удалось сохранить изображение".to_string(),
            Error::Enrichment(_) => "Ошибка: не удалось подобрать стиль превью".to_string(),
            Error::Internal { .. } | Error::Other(_) => "Ошибка: внутренняя ошибка сервера".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::Storage(_) | Error::Enrichment(_) | Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Decode { .. } => {
                tracing::warn!("Rejected undecodable image: {}", self);
            }
            Error::Validation { .. } | Error::MethodNotAllowed | Error::PayloadTooLarge { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_per_kind() {
        let validation = Error::Validation {
            message: "missing".to_string(),
        };
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::MethodNotAllowed.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            Error::Decode {
                reason: "bad padding".to_string()
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::PayloadTooLarge { limit: 64 }.status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            Error::Storage(StorageError::MissingCredentials).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::Other(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_backend_details_are_not_exposed() {
        let err = Error::Storage(StorageError::Put {
            key: "previews/x.jpg".to_string(),
            source: "InvalidAccessKeyId: AKIA-secret".into(),
        });

        let message = err.user_message();
        assert!(message.starts_with("Ошибка: "));
        assert!(!message.contains("AKIA"));
        // The full chain is still available for logs
        assert!(format!("{err:#}").contains("previews/x.jpg"));
    }

    #[test]
    fn test_decode_message_hides_decoder_text() {
        let err = Error::Decode {
            reason: "Invalid symbol 37, offset 0.".to_string(),
        };

        let message = err.user_message();
        assert!(message.starts_with("Ошибка: "));
        assert!(!message.contains("Invalid symbol"));
    }

    #[test_log::test(tokio::test)]
    async fn test_error_body_is_json_with_literal_text() {
        let response = Error::Validation {
            message: "Необходимо загрузить фото и указать название".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = std::str::from_utf8(&body).unwrap();
        assert_eq!(text, r#"{"error":"Необходимо загрузить фото и указать название"}"#);
    }
}
