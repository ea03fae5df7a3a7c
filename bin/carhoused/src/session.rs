//! Session gate: every page requires a backend session with an admin role.
//!
//! The token lives in an HttpOnly cookie and is resolved against the
//! backend on each request. The role claim is trusted as returned — this
//! is a presence/flag check, not a capability system.

use axum::extract::{Request, State};
use axum::http::header::COOKIE;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use carhouse_client::SessionUser;

use crate::routes::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "ch_session";

/// The admin behind the current request, injected by the gate.
#[derive(Debug, Clone)]
pub struct CurrentAdmin(pub SessionUser);

/// Middleware guarding all pages behind a valid admin session.
///
/// Public paths pass through. Anything else without a resolvable admin
/// session is redirected to the login page.
pub async fn session_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    if is_public_path(&path) {
        return next.run(request).await;
    }

    let token = match cookie_token(&request) {
        Some(token) => token,
        None => return Redirect::to("/login").into_response(),
    };

    match state.backend.get_session(&token).await {
        Ok(Some(user)) if user.is_admin() => {
            request.extensions_mut().insert(CurrentAdmin(user));
            next.run(request).await
        }
        Ok(Some(user)) => {
            tracing::warn!(email = %user.email, "non-admin session rejected");
            Redirect::to("/login").into_response()
        }
        Ok(None) => Redirect::to("/login").into_response(),
        Err(e) => {
            tracing::error!(error = %e, "session lookup failed");
            Redirect::to("/login").into_response()
        }
    }
}

/// Check if a request path is public (no session required). Logout is
/// public so a stale or unresolvable token still gets its cookie cleared.
fn is_public_path(path: &str) -> bool {
    matches!(path, "/login" | "/logout" | "/health" | "/version")
}

/// Pull the session token out of the Cookie header.
pub fn cookie_token(request: &Request) -> Option<String> {
    let header = request.headers().get(COOKIE)?.to_str().ok()?;
    parse_session_cookie(header)
}

fn parse_session_cookie(header: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// Set-Cookie value establishing a session.
pub fn session_cookie(token: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, token)
}

/// Set-Cookie value clearing the session.
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE)
}
