use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::error;

use crate::{NoteError, Tag};

/// Error returned by HTTP handlers, rendered as `{"error": "<message>"}`.
#[derive(Debug)]
pub enum AppError {
    Internal(anyhow::Error),
    NotFound(String),
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Internal(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<NoteError> for AppError {
    fn from(err: NoteError) -> Self {
        match err {
            NoteError::NotFound(_) => AppError::NotFound(err.to_string()),
            NoteError::InvalidTag(_) => AppError::BadRequest(format!(
                "{err}. Allowed tags: {}",
                Tag::allowed_values()
            )),
            NoteError::Validation(_)
            | NoteError::InvalidSortField(_)
            | NoteError::InvalidPage(_) => AppError::BadRequest(err.to_string()),
            NoteError::Store(e) => {
                error!(error = %e, "note store failure");
                AppError::BadRequest(format!("Error: {e}"))
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(format!("Error: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(format!("Error: {}", rejection.body_text()))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NoteId;

    #[test]
    fn not_found_maps_to_404() {
        let response = AppError::from(NoteError::NotFound(NoteId::new("x"))).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_tag_names_allowed_values() {
        let err = AppError::from(NoteError::InvalidTag("urgent".into()));
        match err {
            AppError::BadRequest(msg) => {
                assert!(msg.contains("urgent"));
                assert!(msg.contains("BUSINESS, PERSONAL, IMPORTANT"));
            }
            other => panic!("expected bad request, got {other:?}"),
        }
    }

    #[test]
    fn store_failure_is_generic_bad_request() {
        let err = AppError::from(NoteError::Store(anyhow::anyhow!("database is locked")));
        match err {
            AppError::BadRequest(msg) => assert_eq!(msg, "Error: database is locked"),
            other => panic!("expected bad request, got {other:?}"),
        }
    }

    #[test]
    fn internal_maps_to_500() {
        let response = AppError::Internal(anyhow::anyhow!("task panicked")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
