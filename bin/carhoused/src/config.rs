//! Server configuration, loaded from a TOML context file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use carhouse_client::BackendConfig;

/// Full server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,

    /// Connection to the hosted backend (URL + anon key).
    pub backend: BackendConfig,

    #[serde(default)]
    pub branding: Branding,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

/// Page titles and footer text. The defaults are the stock Car House copy.
#[derive(Debug, Clone, Deserialize)]
pub struct Branding {
    #[serde(default = "default_app_title")]
    pub app_title: String,
    #[serde(default = "default_dashboard_title")]
    pub dashboard_title: String,
    #[serde(default = "default_products_title")]
    pub products_title: String,
    #[serde(default = "default_categories_title")]
    pub categories_title: String,
    #[serde(default = "default_orders_title")]
    pub orders_title: String,
    #[serde(default = "default_users_title")]
    pub users_title: String,
    #[serde(default = "default_footer_text")]
    pub footer_text: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            app_title: default_app_title(),
            dashboard_title: default_dashboard_title(),
            products_title: default_products_title(),
            categories_title: default_categories_title(),
            orders_title: default_orders_title(),
            users_title: default_users_title(),
            footer_text: default_footer_text(),
        }
    }
}

fn default_app_title() -> String {
    "Car House".to_string()
}
fn default_dashboard_title() -> String {
    "Dashboard Overview".to_string()
}
fn default_products_title() -> String {
    "Product Management".to_string()
}
fn default_categories_title() -> String {
    "Category Management".to_string()
}
fn default_orders_title() -> String {
    "Orders".to_string()
}
fn default_users_title() -> String {
    "Users".to_string()
}
fn default_footer_text() -> String {
    "Car House · Admin Panel".to_string()
}

impl ServerConfig {
    /// Resolve a context name to `/etc/carhouse/<name>.toml`; a value
    /// containing `/` or `.` is treated as a path.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from("/etc/carhouse").join(format!("{}.toml", name_or_path))
        }
    }

    /// Load and parse the config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
        let config: ServerConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn resolve_context_name() {
        assert_eq!(
            ServerConfig::resolve_path("prod"),
            PathBuf::from("/etc/carhouse/prod.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("./local.toml"),
            PathBuf::from("./local.toml")
        );
    }

    #[test]
    fn minimal_config_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[backend]\nurl = \"http://localhost:9000\"\nanon_key = \"k\""
        )
        .unwrap();

        let config = ServerConfig::load(file.path()).unwrap();
        assert_eq!(config.server.listen, "0.0.0.0:8080");
        assert_eq!(config.branding.app_title, "Car House");
        assert_eq!(config.branding.footer_text, "Car House · Admin Panel");
        assert_eq!(config.backend.bucket, "product-images");
    }

    #[test]
    fn branding_overrides_apply() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[backend]\nurl = \"http://localhost:9000\"\nanon_key = \"k\"\n\n[branding]\napp_title = \"Parts Palace\""
        )
        .unwrap();

        let config = ServerConfig::load(file.path()).unwrap();
        assert_eq!(config.branding.app_title, "Parts Palace");
        // Untouched fields keep the stock copy.
        assert_eq!(config.branding.orders_title, "Orders");
    }
}
