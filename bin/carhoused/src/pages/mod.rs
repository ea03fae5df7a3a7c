//! Page renderers and their form/action handlers, one module per
//! navigation key. Every page follows the same loop: fetch the needed
//! collections through the backend client, build typed row structs with
//! preformatted values, render a template extending the layout shell.
//! Mutations redirect back into the page GET (full re-fetch) on success
//! and re-render with the backend's message on failure.

pub mod categories;
pub mod dashboard;
pub mod login;
pub mod orders;
pub mod products;
pub mod users;

use askama::Template;
use axum::response::{Html, IntoResponse, Response};

use carhouse_client::SessionUser;
use carhouse_core::ServiceError;

use crate::config::ServerConfig;

/// Props for the persistent header/sidebar/content shell around every page.
pub struct Shell {
    pub app_title: String,
    pub user_name: String,
    pub footer_text: String,
    /// Navigation key of the page being rendered; drives active-link styling.
    pub active: &'static str,
}

impl Shell {
    pub fn new(config: &ServerConfig, admin: &SessionUser, active: &'static str) -> Self {
        Self {
            app_title: config.branding.app_title.clone(),
            user_name: admin.display_name().to_string(),
            footer_text: config.branding.footer_text.clone(),
            active,
        }
    }
}

/// One `<option>` in a select control.
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Render a template to a response.
pub fn render(template: impl Template) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "template rendering failed");
            ServiceError::Internal("template rendering failed".to_string()).into_response()
        }
    }
}

/// Explicit error state for a page whose initial fetch failed: the failure
/// is rendered inside the same shell with the message and a retry link.
#[derive(Template)]
#[template(path = "error.html")]
struct ErrorPage {
    shell: Shell,
    message: String,
    retry_href: &'static str,
}

/// Render the fetch-failure state for a page.
pub fn error_page(
    config: &ServerConfig,
    admin: &SessionUser,
    active: &'static str,
    retry_href: &'static str,
    err: ServiceError,
) -> Response {
    tracing::error!(page = active, error = %err, "page load failed");
    render(ErrorPage {
        shell: Shell::new(config, admin, active),
        message: err.to_string(),
        retry_href,
    })
}
