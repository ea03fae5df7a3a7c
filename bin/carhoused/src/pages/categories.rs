//! Categories page: icon-tagged cards with create/edit modal and delete.

use axum::extract::{Multipart, Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Extension, Router};
use serde::Deserialize;

use carhouse_client::{Category, CategoryInput, SessionUser};
use carhouse_core::{CategoryIcon, ServiceError};

use crate::pages::{error_page, render, Shell};
use crate::routes::AppState;
use crate::session::CurrentAdmin;

const DEFAULT_ICON: &str = "🏷️";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(page))
        .route("/categories/save", post(save))
        .route("/categories/{id}/delete", post(delete))
}

#[derive(askama::Template)]
#[template(path = "categories.html")]
struct CategoriesPage {
    shell: Shell,
    page_title: String,
    cards: Vec<CategoryCard>,
    modal_open: bool,
    form: CategoryFormView,
    form_error: String,
    notice: String,
    warning: String,
    banner_error: String,
}

struct CategoryCard {
    id: String,
    icon_url: String,
    icon_text: String,
    name: String,
    description: String,
}

struct CategoryFormView {
    title: &'static str,
    id: String,
    name: String,
    /// Emoji text field; empty when the stored icon is an image.
    icon: String,
    description: String,
}

impl Default for CategoryFormView {
    fn default() -> Self {
        Self {
            title: "New category",
            id: String::new(),
            name: String::new(),
            icon: String::new(),
            description: String::new(),
        }
    }
}

#[derive(Default)]
struct CategoriesView {
    modal_open: bool,
    form: Option<CategoryFormView>,
    form_error: String,
    notice: String,
    warning: String,
    banner_error: String,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    edit: Option<String>,
    new: Option<String>,
    saved: Option<String>,
}

pub async fn page(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Query(query): Query<PageQuery>,
) -> Response {
    let categories = match state.backend.get_categories().await {
        Ok(categories) => categories,
        Err(e) => return error_page(&state.config, &admin.0, "categories", "/categories", e),
    };

    let mut view = CategoriesView::default();
    if query.saved.is_some() {
        view.notice = "Saved successfully!".to_string();
    }
    if query.new.is_some() {
        view.modal_open = true;
    } else if let Some(id) = &query.edit {
        if let Some(category) = categories.iter().find(|c| &c.id == id) {
            view.modal_open = true;
            view.form = Some(prefill(category));
        }
    }

    render_page(&state, &admin.0, &categories, view)
}

pub async fn save(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    multipart: Multipart,
) -> Response {
    let form = match read_save_form(multipart).await {
        Ok(form) => form,
        Err(e) => {
            let view = CategoriesView {
                modal_open: true,
                form_error: e.to_string(),
                ..Default::default()
            };
            return rerender(&state, &admin.0, view).await;
        }
    };

    // The icon is tagged at write time: an uploaded file wins over the
    // emoji field, which falls back to the stock tag when left empty.
    let emoji = if form.icon.trim().is_empty() {
        DEFAULT_ICON.to_string()
    } else {
        form.icon.trim().to_string()
    };

    let input = CategoryInput {
        name: form.name.clone(),
        icon: CategoryIcon::Emoji(emoji),
        description: form.description.clone(),
    };

    let saved = if form.id.is_empty() {
        state.backend.create_category(&input).await
    } else {
        state.backend.update_category(&form.id, &input).await
    };

    let saved = match saved {
        Ok(category) => category,
        Err(e) => return rerender(&state, &admin.0, rejected(&form, e.to_string())).await,
    };

    // Two-step, non-atomic: the record exists with the emoji icon before
    // the image lands. An upload failure leaves it that way.
    if let Some(file) = form.image {
        let retagged = async {
            let url = state
                .backend
                .upload_file(&file.filename, &file.content_type, file.bytes)
                .await?;
            let input = CategoryInput {
                name: saved.name.clone(),
                icon: CategoryIcon::ImageUrl(url),
                description: saved.description.clone().unwrap_or_default(),
            };
            state.backend.update_category(&saved.id, &input).await?;
            Ok::<(), ServiceError>(())
        }
        .await;

        if let Err(e) = retagged {
            tracing::warn!(category = %saved.id, error = %e, "icon upload failed after save");
            let view = CategoriesView {
                warning: format!("Category saved, but the icon upload failed: {}", e),
                ..Default::default()
            };
            return rerender(&state, &admin.0, view).await;
        }
    }

    Redirect::to("/categories?saved=1").into_response()
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
) -> Response {
    match state.backend.delete_category(&id).await {
        Ok(()) => Redirect::to("/categories").into_response(),
        Err(e) => {
            let view = CategoriesView {
                banner_error: format!("Failed to delete category: {}", e),
                ..Default::default()
            };
            rerender(&state, &admin.0, view).await
        }
    }
}

// ── Form plumbing ───────────────────────────────────────────────────

#[derive(Default)]
struct SaveForm {
    id: String,
    name: String,
    icon: String,
    description: String,
    image: Option<UploadedFile>,
}

struct UploadedFile {
    filename: String,
    content_type: String,
    bytes: Vec<u8>,
}

async fn read_save_form(mut multipart: Multipart) -> Result<SaveForm, ServiceError> {
    let mut form = SaveForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::Validation(format!("malformed form: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            let filename = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ServiceError::Validation(format!("malformed upload: {}", e)))?;
            if !filename.is_empty() && !bytes.is_empty() {
                form.image = Some(UploadedFile {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ServiceError::Validation(format!("malformed form: {}", e)))?;
            match name.as_str() {
                "id" => form.id = value,
                "name" => form.name = value,
                "icon" => form.icon = value,
                "description" => form.description = value,
                _ => {}
            }
        }
    }
    Ok(form)
}

fn rejected(form: &SaveForm, message: String) -> CategoriesView {
    CategoriesView {
        modal_open: true,
        form: Some(CategoryFormView {
            title: if form.id.is_empty() { "New category" } else { "Edit category" },
            id: form.id.clone(),
            name: form.name.clone(),
            icon: form.icon.clone(),
            description: form.description.clone(),
        }),
        form_error: message,
        ..Default::default()
    }
}

fn prefill(category: &Category) -> CategoryFormView {
    CategoryFormView {
        title: "Edit category",
        id: category.id.clone(),
        name: category.name.clone(),
        icon: match &category.icon {
            Some(CategoryIcon::Emoji(emoji)) => emoji.clone(),
            _ => String::new(),
        },
        description: category.description.clone().unwrap_or_default(),
    }
}

// ── Rendering ───────────────────────────────────────────────────────

async fn rerender(state: &AppState, admin: &SessionUser, view: CategoriesView) -> Response {
    match state.backend.get_categories().await {
        Ok(categories) => render_page(state, admin, &categories, view),
        Err(e) => error_page(&state.config, admin, "categories", "/categories", e),
    }
}

fn render_page(
    state: &AppState,
    admin: &SessionUser,
    categories: &[Category],
    view: CategoriesView,
) -> Response {
    render(CategoriesPage {
        shell: Shell::new(&state.config, admin, "categories"),
        page_title: state.config.branding.categories_title.clone(),
        cards: category_cards(categories),
        modal_open: view.modal_open,
        form: view.form.unwrap_or_default(),
        form_error: view.form_error,
        notice: view.notice,
        warning: view.warning,
        banner_error: view.banner_error,
    })
}

fn category_cards(categories: &[Category]) -> Vec<CategoryCard> {
    categories
        .iter()
        .map(|c| {
            let (icon_url, icon_text) = match &c.icon {
                Some(CategoryIcon::ImageUrl(url)) => (url.clone(), String::new()),
                Some(CategoryIcon::Emoji(emoji)) => (String::new(), emoji.clone()),
                None => (String::new(), DEFAULT_ICON.to_string()),
            };
            CategoryCard {
                id: c.id.clone(),
                icon_url,
                icon_text,
                name: c.name.clone(),
                description: c.description.clone().unwrap_or_default(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cards_split_icon_by_tag() {
        let categories: Vec<Category> = serde_json::from_value(serde_json::json!([
            {"id": "c1", "name": "Brakes", "icon": "🛞"},
            {"id": "c2", "name": "Filters", "icon": "https://cdn/f.png"},
            {"id": "c3", "name": "Misc"},
        ]))
        .unwrap();

        let cards = category_cards(&categories);
        assert_eq!(cards[0].icon_text, "🛞");
        assert!(cards[0].icon_url.is_empty());
        assert_eq!(cards[1].icon_url, "https://cdn/f.png");
        assert!(cards[1].icon_text.is_empty());
        assert_eq!(cards[2].icon_text, DEFAULT_ICON);
    }

    #[test]
    fn prefill_keeps_emoji_but_not_image_url() {
        let emoji: Category =
            serde_json::from_value(serde_json::json!({"id": "c1", "name": "Brakes", "icon": "🛞"}))
                .unwrap();
        assert_eq!(prefill(&emoji).icon, "🛞");

        let image: Category = serde_json::from_value(
            serde_json::json!({"id": "c2", "name": "Filters", "icon": "https://cdn/f.png"}),
        )
        .unwrap();
        // An image icon is replaced through a new upload, not edited as text.
        assert_eq!(prefill(&image).icon, "");
    }
}
