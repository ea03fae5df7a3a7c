//! HTTP plumbing shared by every resource surface.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use carhouse_core::ServiceError;

use crate::config::BackendConfig;

/// Which failure category a request belongs to. Decides how transport and
/// HTTP errors are classified — the message itself always passes through
/// verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailureKind {
    Read,
    Write,
    Upload,
}

/// Client for the hosted backend. Cheap to clone, holds one connection
/// pool. Constructed once at application start and injected everywhere.
#[derive(Clone)]
pub struct Backend {
    http: reqwest::Client,
    base_url: String,
    bucket: String,
}

impl Backend {
    /// Build a client from connection settings.
    pub fn new(config: &BackendConfig) -> Result<Self, ServiceError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.anon_key)
            .map_err(|e| ServiceError::Internal(format!("invalid anon key: {}", e)))?;
        headers.insert("apikey", key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ServiceError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
        })
    }

    /// Object-store bucket for image uploads.
    pub(crate) fn bucket(&self) -> &str {
        &self.bucket
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    /// GET a JSON document. Idempotent, so a timeout or connect failure is
    /// retried exactly once before giving up.
    pub(crate) async fn get_json(&self, path: &str) -> Result<Value, ServiceError> {
        self.get_json_auth(path, None).await
    }

    /// [`get_json`] with an optional bearer token, for authenticated reads.
    pub(crate) async fn get_json_auth(
        &self,
        path: &str,
        bearer: Option<&str>,
    ) -> Result<Value, ServiceError> {
        let build = || {
            let builder = self.request(Method::GET, path);
            match bearer {
                Some(token) => builder.bearer_auth(token),
                None => builder,
            }
        };

        let resp = match build().send().await {
            Ok(resp) => resp,
            Err(e) if e.is_timeout() || e.is_connect() => {
                tracing::warn!(path, error = %e, "read failed, retrying once");
                build()
                    .send()
                    .await
                    .map_err(|e| ServiceError::FetchFailed(e.to_string()))?
            }
            Err(e) => return Err(ServiceError::FetchFailed(e.to_string())),
        };
        Self::decode_response(resp, FailureKind::Read).await
    }

    /// Send a prepared mutation request. Issued exactly once — a write that
    /// times out may have landed, and re-sending it is not ours to decide.
    pub(crate) async fn execute(
        &self,
        builder: RequestBuilder,
        kind: FailureKind,
    ) -> Result<Value, ServiceError> {
        let resp = builder.send().await.map_err(|e| transport_error(kind, &e))?;
        Self::decode_response(resp, kind).await
    }

    /// Map a response to JSON or to the appropriate [`ServiceError`].
    pub(crate) async fn decode_response(
        resp: Response,
        kind: FailureKind,
    ) -> Result<Value, ServiceError> {
        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| transport_error(kind, &e))?;

        if status.is_success() {
            if bytes.is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_slice(&bytes).map_err(|e| {
                ServiceError::Internal(format!("malformed backend response: {}", e))
            });
        }

        let message = error_message(&bytes, status);
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ServiceError::Unauthorized(message)
            }
            StatusCode::NOT_FOUND => ServiceError::NotFound(message),
            _ => match kind {
                FailureKind::Read => ServiceError::FetchFailed(message),
                FailureKind::Upload => ServiceError::UploadFailed(message),
                FailureKind::Write => {
                    if status == StatusCode::BAD_REQUEST
                        || status == StatusCode::UNPROCESSABLE_ENTITY
                    {
                        ServiceError::Validation(message)
                    } else {
                        ServiceError::MutationFailed(message)
                    }
                }
            },
        })
    }

    /// Decode the `{"items": [...]}` list envelope.
    pub(crate) fn items<T: DeserializeOwned>(
        value: Value,
        what: &str,
    ) -> Result<Vec<T>, ServiceError> {
        let items = value
            .get("items")
            .cloned()
            .unwrap_or(Value::Array(Vec::new()));
        serde_json::from_value(items)
            .map_err(|e| ServiceError::FetchFailed(format!("malformed {} list: {}", what, e)))
    }

    /// Decode a single typed record.
    pub(crate) fn record<T: DeserializeOwned>(
        value: Value,
        what: &str,
    ) -> Result<T, ServiceError> {
        serde_json::from_value(value)
            .map_err(|e| ServiceError::Internal(format!("malformed {} record: {}", what, e)))
    }
}

fn transport_error(kind: FailureKind, e: &reqwest::Error) -> ServiceError {
    let msg = e.to_string();
    match kind {
        FailureKind::Read => ServiceError::FetchFailed(msg),
        FailureKind::Write => ServiceError::MutationFailed(msg),
        FailureKind::Upload => ServiceError::UploadFailed(msg),
    }
}

/// Pull the human-readable message out of an error body.
///
/// The backend answers `{"error": "..."}`; some endpoints use `message`.
/// Whatever is found is surfaced verbatim.
fn error_message(bytes: &[u8], status: StatusCode) -> String {
    if let Ok(body) = serde_json::from_slice::<Value>(bytes) {
        for key in ["error", "message"] {
            if let Some(msg) = body.get(key).and_then(|v| v.as_str()) {
                return msg.to_string();
            }
        }
    }
    format!("HTTP {}", status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_message_prefers_error_field() {
        let body = serde_json::to_vec(&json!({"error": "stock must be >= 0"})).unwrap();
        assert_eq!(
            error_message(&body, StatusCode::BAD_REQUEST),
            "stock must be >= 0"
        );
    }

    #[test]
    fn error_message_falls_back_to_status() {
        assert_eq!(
            error_message(b"<html>gateway</html>", StatusCode::BAD_GATEWAY),
            "HTTP 502 Bad Gateway"
        );
    }

    #[test]
    fn items_envelope_decodes() {
        let v = json!({"items": [{"url": "u", "position": 1}], "total": 1});
        let images: Vec<crate::model::ProductImage> = Backend::items(v, "images").unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].position, 1);
    }

    #[test]
    fn items_envelope_tolerates_missing_key() {
        let images: Vec<crate::model::ProductImage> =
            Backend::items(json!({}), "images").unwrap();
        assert!(images.is_empty());
    }
}
