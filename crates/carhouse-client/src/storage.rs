//! File upload to the backend's object store.

use reqwest::multipart::{Form, Part};
use reqwest::Method;

use carhouse_core::ServiceError;

use crate::backend::{Backend, FailureKind};

impl Backend {
    /// Upload a file to the configured bucket and return its public URL.
    ///
    /// Called only after the primary record write succeeded; a failure here
    /// is surfaced as a warning and the primary record is kept (no rollback,
    /// no retry — uploads are writes).
    pub async fn upload_file(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ServiceError> {
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|e| ServiceError::UploadFailed(format!("invalid content type: {}", e)))?;
        let form = Form::new().part("file", part);

        let path = format!("/storage/{}/{}", self.bucket(), filename);
        let value = self
            .execute(
                self.request(Method::POST, &path).multipart(form),
                FailureKind::Upload,
            )
            .await?;

        value
            .get("url")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                ServiceError::UploadFailed("upload response missing public URL".to_string())
            })
    }
}
