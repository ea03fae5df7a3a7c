use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. Callers match on these —
// never on the human-readable message string.

/// Stable error code constants.
///
/// Every failure category the admin panel distinguishes has its own code:
/// how a failure is surfaced (redirect, inline form message, banner,
/// warning) is decided by the variant, not by string matching.
pub mod error_code {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const MUTATION_FAILED: &str = "MUTATION_FAILED";
    pub const UPLOAD_FAILED: &str = "UPLOAD_FAILED";
    pub const FETCH_FAILED: &str = "FETCH_FAILED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const INTERNAL: &str = "INTERNAL";
}

// ── ServiceError ────────────────────────────────────────────────────

/// Unified error type shared by the backend client and the admin server.
///
/// Each variant corresponds to one surfacing strategy in the panel:
///
/// - [`Unauthorized`](ServiceError::Unauthorized) — no session or not an
///   admin; the caller redirects to the login page.
/// - [`Validation`](ServiceError::Validation) — the backend rejected a
///   write; the message is shown verbatim next to the form.
/// - [`MutationFailed`](ServiceError::MutationFailed) — a delete or
///   field-level update failed; shown as a page banner followed by a full
///   re-render of server truth.
/// - [`UploadFailed`](ServiceError::UploadFailed) — the secondary file
///   upload after a successful primary write failed; non-blocking warning,
///   the primary record is kept.
/// - [`FetchFailed`](ServiceError::FetchFailed) — a read during page load
///   failed even after retry; the page renders an explicit error state.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Missing session or insufficient privileges. HTTP 401.
    #[error("{0}")]
    Unauthorized(String),

    /// The backend rejected the submitted data. HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// A delete or single-field update was refused. HTTP 409.
    #[error("{0}")]
    MutationFailed(String),

    /// File upload or image linking failed after the primary write. HTTP 502.
    #[error("{0}")]
    UploadFailed(String),

    /// A read from the backend failed. HTTP 502.
    #[error("{0}")]
    FetchFailed(String),

    /// Record does not exist. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Unexpected internal error. HTTP 500.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Unauthorized(_) => error_code::UNAUTHORIZED,
            ServiceError::Validation(_) => error_code::VALIDATION_FAILED,
            ServiceError::MutationFailed(_) => error_code::MUTATION_FAILED,
            ServiceError::UploadFailed(_) => error_code::UPLOAD_FAILED,
            ServiceError::FetchFailed(_) => error_code::FETCH_FAILED,
            ServiceError::NotFound(_) => error_code::NOT_FOUND,
            ServiceError::Internal(_) => error_code::INTERNAL,
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::MutationFailed(_) => StatusCode::CONFLICT,
            ServiceError::UploadFailed(_) => StatusCode::BAD_GATEWAY,
            ServiceError::FetchFailed(_) => StatusCode::BAD_GATEWAY,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_mapping() {
        assert_eq!(ServiceError::Unauthorized("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ServiceError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ServiceError::MutationFailed("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(ServiceError::UploadFailed("x".into()).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(ServiceError::FetchFailed("x".into()).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(ServiceError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ServiceError::Internal("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_code_mapping() {
        assert_eq!(ServiceError::Unauthorized("x".into()).error_code(), "UNAUTHORIZED");
        assert_eq!(ServiceError::Validation("x".into()).error_code(), "VALIDATION_FAILED");
        assert_eq!(ServiceError::MutationFailed("x".into()).error_code(), "MUTATION_FAILED");
        assert_eq!(ServiceError::UploadFailed("x".into()).error_code(), "UPLOAD_FAILED");
        assert_eq!(ServiceError::FetchFailed("x".into()).error_code(), "FETCH_FAILED");
    }

    #[test]
    fn error_display_is_just_message() {
        // The backend's message passes through verbatim, no prefix.
        assert_eq!(
            ServiceError::Validation("price must be positive".into()).to_string(),
            "price must be positive"
        );
        assert_eq!(
            ServiceError::FetchFailed("connection refused".into()).to_string(),
            "connection refused"
        );
    }
}
