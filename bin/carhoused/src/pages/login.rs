//! Login page and session endpoints.
//!
//! Login is the only page outside the shell. A successful password check is
//! not enough: the resolved role must be an admin one, otherwise the fresh
//! session is discarded immediately.

use axum::extract::{Form, Request, State};
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::pages::render;
use crate::routes::AppState;
use crate::session;

#[derive(askama::Template)]
#[template(path = "login.html")]
struct LoginPage {
    app_title: String,
    error: String,
    email: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    email: String,
    password: String,
}

pub async fn page(State(state): State<AppState>) -> Response {
    render(LoginPage {
        app_title: state.config.branding.app_title.clone(),
        error: String::new(),
        email: String::new(),
    })
}

pub async fn submit(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let session = match state.backend.login(&form.email, &form.password).await {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(email = %form.email, error = %e, "login rejected");
            return render(LoginPage {
                app_title: state.config.branding.app_title.clone(),
                error: e.to_string(),
                email: form.email,
            });
        }
    };

    if !session.user.is_admin() {
        tracing::warn!(email = %session.user.email, "non-admin login refused");
        // Drop the session we just opened; the outcome is the same either way.
        if let Err(e) = state.backend.logout(&session.token).await {
            tracing::warn!(error = %e, "logout after refused login failed");
        }
        return render(LoginPage {
            app_title: state.config.branding.app_title.clone(),
            error: "Access denied. Admin privileges required.".to_string(),
            email: form.email,
        });
    }

    (
        [(SET_COOKIE, session::session_cookie(&session.token))],
        Redirect::to("/dashboard"),
    )
        .into_response()
}

pub async fn logout(State(state): State<AppState>, request: Request) -> Response {
    if let Some(token) = session::cookie_token(&request) {
        if let Err(e) = state.backend.logout(&token).await {
            tracing::warn!(error = %e, "backend logout failed");
        }
    }
    (
        [(SET_COOKIE, session::clear_session_cookie())],
        Redirect::to("/login"),
    )
        .into_response()
}
