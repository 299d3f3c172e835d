use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application-wide error type
///
/// Every pipeline failure is scoped to one request; nothing here is fatal to
/// the process. The original error detail stays in the message string so
/// repository/backend outages remain debuggable from the response alone.
#[derive(Debug)]
pub enum AppError {
    /// Malformed request body (missing/invalid fields)
    BadRequest(String),
    /// The requested document or container does not exist
    NotFound(String),
    /// A container listing matched no PDF documents
    NoDocuments(String),
    /// Network/read failure while fetching document bytes
    Transfer(String),
    /// The fetched bytes could not be parsed as a PDF
    CorruptDocument(String),
    /// Nothing extractable: the assembled context was empty
    EmptyContext,
    /// The answering backend call failed or timed out
    Backend(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::NoDocuments(msg) => write!(f, "{}", msg),
            AppError::Transfer(msg) => write!(f, "Transfer failed: {}", msg),
            AppError::CorruptDocument(msg) => write!(f, "Corrupt document: {}", msg),
            AppError::EmptyContext => write!(f, "No text could be extracted from the documents"),
            AppError::Backend(msg) => write!(f, "Answering backend failed: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();

        // 400/404 responses carry a bare {error}; pipeline failures answer
        // with 500 and {status: "error", error}.
        let (status, body) = match self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
            AppError::NotFound(_) | AppError::NoDocuments(_) => {
                (StatusCode::NOT_FOUND, json!({ "error": message }))
            }
            AppError::Transfer(_)
            | AppError::CorruptDocument(_)
            | AppError::EmptyContext
            | AppError::Backend(_) => {
                tracing::error!("Pipeline error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "status": "error", "error": message }),
                )
            }
            AppError::Internal(_) => {
                tracing::error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "status": "error", "error": message }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_keeps_detail() {
        let err = AppError::NotFound("document abc123 does not exist".to_string());
        assert!(err.to_string().contains("abc123"));
    }

    #[test]
    fn test_not_found_maps_to_404_not_500() {
        let status = AppError::NotFound("document x".to_string())
            .into_response()
            .status();
        assert_eq!(status, StatusCode::NOT_FOUND);

        let status = AppError::NoDocuments("No PDF files found in folder y".to_string())
            .into_response()
            .status();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let status = AppError::BadRequest("question is required".to_string())
            .into_response()
            .status();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_pipeline_failures_map_to_500() {
        for err in [
            AppError::Transfer("interrupted".to_string()),
            AppError::CorruptDocument("bad header".to_string()),
            AppError::EmptyContext,
            AppError::Backend("timed out".to_string()),
        ] {
            assert_eq!(
                err.into_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }

    #[test]
    fn test_no_documents_message_is_distinct() {
        let no_docs = AppError::NoDocuments("No PDF files found in folder xyz".to_string());
        let corrupt = AppError::CorruptDocument("bad header".to_string());
        assert!(no_docs.to_string().contains("No PDF files found"));
        assert!(corrupt.to_string().contains("Corrupt document"));
        assert_ne!(no_docs.to_string(), corrupt.to_string());
    }
}
