use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use gamr_core::params::ParamError;

use crate::store::StoreError;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    /// The request body is in a format the handler cannot read.
    UnsupportedMediaType(String),
    Internal(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(m)
            | Self::NotFound(m)
            | Self::UnsupportedMediaType(m)
            | Self::Internal(m) => write!(f, "{m}"),
        }
    }
}

impl From<ParamError> for AppError {
    fn from(err: ParamError) -> Self {
        match err {
            // Well-formed id that no row can carry.
            ParamError::IdOutOfRange(_) => Self::NotFound(err.to_string()),
            _ => Self::BadRequest(err.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(m) => Self::NotFound(m),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            Self::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            Self::UnsupportedMediaType(m) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, m.clone()),
            Self::Internal(m) => {
                tracing::error!(error = %m, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            },
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_errors_map_to_client_errors() {
        assert!(matches!(
            AppError::from(ParamError::TopCountNotInteger),
            AppError::BadRequest(_)
        ));
        assert!(matches!(
            AppError::from(ParamError::IdOutOfRange("9".repeat(30))),
            AppError::NotFound(_)
        ));
    }

    #[test]
    fn store_errors_map_by_kind() {
        assert!(matches!(
            AppError::from(StoreError::NotFound("gone".to_string())),
            AppError::NotFound(m) if m == "gone"
        ));
        assert!(matches!(
            AppError::from(StoreError::Task("panicked".to_string())),
            AppError::Internal(_)
        ));
    }

    #[test]
    fn status_codes() {
        let cases = [
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                AppError::UnsupportedMediaType("x".into()),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (
                AppError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
