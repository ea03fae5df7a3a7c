//! Users page: registration modal, block/unblock toggle and role changes.

use std::str::FromStr;

use axum::extract::{Form, Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Extension, Router};
use serde::Deserialize;

use carhouse_client::{RegisterInput, SessionUser, User, UserPatch};
use carhouse_core::{Role, ServiceError};

use crate::pages::{error_page, render, SelectOption, Shell};
use crate::routes::AppState;
use crate::session::CurrentAdmin;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(page))
        .route("/users/save", post(save))
        .route("/users/{id}/blocked", post(update_blocked))
        .route("/users/{id}/role", post(update_role))
}

#[derive(askama::Template)]
#[template(path = "users.html")]
struct UsersPage {
    shell: Shell,
    page_title: String,
    rows: Vec<UserRow>,
    modal_open: bool,
    form: UserFormView,
    form_error: String,
    notice: String,
    banner_error: String,
}

struct UserRow {
    id: String,
    initial: String,
    name: String,
    email: String,
    role_options: Vec<SelectOption>,
    status_label: &'static str,
    status_class: &'static str,
    toggle_label: &'static str,
    /// Explicit target state the toggle form submits.
    toggle_target: &'static str,
}

#[derive(Default)]
struct UserFormView {
    full_name: String,
    email: String,
    phone: String,
    role: String,
}

#[derive(Default)]
struct UsersView {
    modal_open: bool,
    form: Option<UserFormView>,
    form_error: String,
    notice: String,
    banner_error: String,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    new: Option<String>,
    saved: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveForm {
    full_name: String,
    email: String,
    phone: String,
    password: String,
    role: String,
}

#[derive(Debug, Deserialize)]
pub struct BlockedForm {
    blocked: String,
}

#[derive(Debug, Deserialize)]
pub struct RoleForm {
    role: String,
}

pub async fn page(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Query(query): Query<PageQuery>,
) -> Response {
    let users = match state.backend.get_users().await {
        Ok(users) => users,
        Err(e) => return error_page(&state.config, &admin.0, "users", "/users", e),
    };

    let mut view = UsersView::default();
    if query.saved.is_some() {
        view.notice = "User created.".to_string();
    }
    if query.new.is_some() {
        view.modal_open = true;
    }

    render_page(&state, &admin.0, &users, view)
}

pub async fn save(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Form(form): Form<SaveForm>,
) -> Response {
    let role = match Role::from_str(&form.role) {
        Ok(role) => role,
        Err(message) => {
            return rerender(&state, &admin.0, rejected(&form, message)).await;
        }
    };

    let input = RegisterInput {
        email: form.email.clone(),
        password: form.password.clone(),
        full_name: form.full_name.clone(),
        phone: form.phone.clone(),
        role,
    };

    match state.backend.register(&input).await {
        Ok(_) => Redirect::to("/users?saved=1").into_response(),
        Err(e) => rerender(&state, &admin.0, rejected(&form, e.to_string())).await,
    }
}

pub async fn update_blocked(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
    Form(form): Form<BlockedForm>,
) -> Response {
    // The form carries the explicit target state, so block and unblock
    // are two independent writes rather than a read-modify-write toggle.
    let blocked = form.blocked == "true";
    let patch = UserPatch { blocked: Some(blocked), ..Default::default() };

    match state.backend.update_user(&id, &patch).await {
        Ok(_) => Redirect::to("/users").into_response(),
        Err(e) => {
            let view = UsersView {
                banner_error: format!("Failed to update user: {}", e),
                ..Default::default()
            };
            rerender(&state, &admin.0, view).await
        }
    }
}

pub async fn update_role(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
    Form(form): Form<RoleForm>,
) -> Response {
    let role = match Role::from_str(&form.role) {
        Ok(role) => role,
        Err(message) => {
            let e = ServiceError::Validation(message);
            let view = UsersView {
                banner_error: format!("Failed to update user: {}", e),
                ..Default::default()
            };
            return rerender(&state, &admin.0, view).await;
        }
    };

    match change_role(&state, &id, role).await {
        Ok(()) => Redirect::to("/users").into_response(),
        Err(e) => {
            let view = UsersView {
                banner_error: format!("Failed to update user: {}", e),
                ..Default::default()
            };
            rerender(&state, &admin.0, view).await
        }
    }
}

/// Apply a role change and keep the admin registry in step: entering the
/// admin tier registers the user, leaving it removes them.
async fn change_role(state: &AppState, id: &str, role: Role) -> Result<(), ServiceError> {
    let users = state.backend.get_users().await?;
    let old_role = users
        .iter()
        .find(|u| u.id == id)
        .map(|u| u.role)
        .ok_or_else(|| ServiceError::NotFound(format!("no user {}", id)))?;

    let patch = UserPatch { role: Some(role), ..Default::default() };
    state.backend.update_user(id, &patch).await?;

    if !old_role.is_admin() && role.is_admin() {
        state.backend.add_admin(id, role, &["all"]).await?;
    } else if old_role.is_admin() && !role.is_admin() {
        state.backend.remove_admin(id).await?;
    }
    Ok(())
}

fn rejected(form: &SaveForm, message: String) -> UsersView {
    UsersView {
        modal_open: true,
        form: Some(UserFormView {
            full_name: form.full_name.clone(),
            email: form.email.clone(),
            phone: form.phone.clone(),
            role: form.role.clone(),
        }),
        form_error: message,
        ..Default::default()
    }
}

// ── Rendering ───────────────────────────────────────────────────────

async fn rerender(state: &AppState, admin: &SessionUser, view: UsersView) -> Response {
    match state.backend.get_users().await {
        Ok(users) => render_page(state, admin, &users, view),
        Err(e) => error_page(&state.config, admin, "users", "/users", e),
    }
}

fn render_page(
    state: &AppState,
    admin: &SessionUser,
    users: &[User],
    view: UsersView,
) -> Response {
    render(UsersPage {
        shell: Shell::new(&state.config, admin, "users"),
        page_title: state.config.branding.users_title.clone(),
        rows: user_rows(users),
        modal_open: view.modal_open,
        form: view.form.unwrap_or_default(),
        form_error: view.form_error,
        notice: view.notice,
        banner_error: view.banner_error,
    })
}

fn user_rows(users: &[User]) -> Vec<UserRow> {
    users.iter().map(user_row).collect()
}

fn user_row(user: &User) -> UserRow {
    let name = user
        .full_name
        .clone()
        .unwrap_or_else(|| user.email.clone());
    let initial = name
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default();
    UserRow {
        id: user.id.clone(),
        initial,
        name,
        email: user.email.clone(),
        role_options: role_options(user.role),
        status_label: if user.blocked { "Blocked" } else { "Active" },
        status_class: if user.blocked {
            "bg-red-100 text-red-700"
        } else {
            "bg-teal-100 text-teal-700"
        },
        toggle_label: if user.blocked { "Unblock" } else { "Block" },
        toggle_target: if user.blocked { "false" } else { "true" },
    }
}

fn role_options(current: Role) -> Vec<SelectOption> {
    Role::ALL
        .iter()
        .map(|r| SelectOption {
            value: r.as_str().to_string(),
            label: role_label(*r).to_string(),
            selected: *r == current,
        })
        .collect()
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Customer => "Customer",
        Role::Admin => "Admin",
        Role::Superadmin => "Superadmin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(blocked: bool) -> User {
        serde_json::from_value(serde_json::json!({
            "id": "u1", "full_name": "Jane Doe", "email": "jane@cars.eg",
            "role": "customer", "blocked": blocked,
        }))
        .unwrap()
    }

    #[test]
    fn active_user_gets_block_action_with_explicit_target() {
        let row = user_row(&user(false));
        assert_eq!(row.toggle_label, "Block");
        assert_eq!(row.toggle_target, "true");
        assert_eq!(row.status_label, "Active");
    }

    #[test]
    fn blocked_user_gets_unblock_action() {
        let row = user_row(&user(true));
        assert_eq!(row.toggle_label, "Unblock");
        assert_eq!(row.toggle_target, "false");
        assert_eq!(row.status_label, "Blocked");
    }

    #[test]
    fn row_falls_back_to_email_and_takes_the_initial() {
        let u: User =
            serde_json::from_value(serde_json::json!({"id": "u2", "email": "bob@cars.eg"}))
                .unwrap();
        let row = user_row(&u);
        assert_eq!(row.name, "bob@cars.eg");
        assert_eq!(row.initial, "B");
    }

    #[test]
    fn page_renders_the_block_toggle_with_its_target() {
        use askama::Template;
        use crate::pages::Shell;

        let page = UsersPage {
            shell: Shell {
                app_title: "Car House".into(),
                user_name: "Site Admin".into(),
                footer_text: String::new(),
                active: "users",
            },
            page_title: "Users".into(),
            rows: user_rows(&[user(false)]),
            modal_open: false,
            form: UserFormView::default(),
            form_error: String::new(),
            notice: String::new(),
            banner_error: String::new(),
        };

        let html = page.render().unwrap();
        assert!(html.contains("Jane Doe"));
        assert!(html.contains("action=\"/users/u1/blocked\""));
        assert!(html.contains("name=\"blocked\" value=\"true\""));
        assert!(html.contains(">Block<"));
    }

    #[test]
    fn role_options_mark_current() {
        let options = role_options(Role::Admin);
        assert_eq!(options.len(), 3);
        assert!(options[1].selected);
        assert_eq!(options[2].value, "superadmin");
    }
}
