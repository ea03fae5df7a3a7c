//! Backend connection settings.

use serde::{Deserialize, Serialize};

/// Connection settings for the hosted backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend (e.g. "https://api.carhouse.example").
    pub url: String,

    /// Public anon API key, sent as the `apikey` header on every request.
    pub anon_key: String,

    /// Object-store bucket for product and category images.
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_bucket() -> String {
    "product-images".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_in() {
        let config: BackendConfig = serde_json::from_str(
            r#"{"url": "http://localhost:9000", "anon_key": "k"}"#,
        )
        .unwrap();
        assert_eq!(config.bucket, "product-images");
        assert_eq!(config.timeout_secs, 10);
    }
}
