//! Products page: inventory table, create/edit modal, delete, image upload.

use axum::extract::{Multipart, Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Extension, Router};
use serde::Deserialize;

use carhouse_client::{Category, Product, ProductInput, SessionUser};
use carhouse_core::{format_currency, CategoryIcon, ServiceError};

use crate::pages::{error_page, render, SelectOption, Shell};
use crate::routes::AppState;
use crate::session::CurrentAdmin;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(page))
        .route("/products/save", post(save))
        .route("/products/{id}/delete", post(delete))
}

#[derive(askama::Template)]
#[template(path = "products.html")]
struct ProductsPage {
    shell: Shell,
    page_title: String,
    count: usize,
    rows: Vec<ProductRow>,
    category_options: Vec<SelectOption>,
    modal_open: bool,
    form: ProductFormView,
    form_error: String,
    notice: String,
    warning: String,
    banner_error: String,
}

struct ProductRow {
    id: String,
    icon_url: String,
    icon_text: String,
    name: String,
    car_model: String,
    category: String,
    brand: String,
    price_label: String,
    stock: i64,
    rating_label: String,
}

/// Modal form values, kept as strings so a rejected submission re-renders
/// exactly what the admin typed.
struct ProductFormView {
    title: &'static str,
    id: String,
    name: String,
    brand: String,
    category_id: String,
    car_model: String,
    price: String,
    stock: String,
    rating: String,
    description: String,
}

impl Default for ProductFormView {
    fn default() -> Self {
        Self {
            title: "New product",
            id: String::new(),
            name: String::new(),
            brand: String::new(),
            category_id: String::new(),
            car_model: String::new(),
            price: String::new(),
            stock: String::new(),
            rating: String::new(),
            description: String::new(),
        }
    }
}

/// Transient page state threaded through renders: flash messages, banners
/// and the modal.
#[derive(Default)]
struct ProductsView {
    modal_open: bool,
    form: Option<ProductFormView>,
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
    // Both lists load concurrently; the page waits on both.
    let (products, categories) = match tokio::try_join!(
        state.backend.get_products(),
        state.backend.get_categories(),
    ) {
        Ok(pair) => pair,
        Err(e) => return error_page(&state.config, &admin.0, "products", "/products", e),
    };

    let mut view = ProductsView::default();
    if query.saved.is_some() {
        view.notice = "Saved successfully!".to_string();
    }
    if query.new.is_some() {
        view.modal_open = true;
    } else if let Some(id) = &query.edit {
        // O(n) lookup in the freshly fetched list; an unknown id leaves the
        // modal closed.
        if let Some(product) = products.iter().find(|p| &p.id == id) {
            view.modal_open = true;
            view.form = Some(prefill(product));
        }
    }

    render_page(&state, &admin.0, &products, &categories, view)
}

pub async fn save(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    multipart: Multipart,
) -> Response {
    let form = match read_save_form(multipart).await {
        Ok(form) => form,
        Err(e) => {
            let view = ProductsView {
                modal_open: true,
                form_error: e.to_string(),
                ..Default::default()
            };
            return rerender(&state, &admin.0, view).await;
        }
    };

    let input = match parse_input(&form) {
        Ok(input) => input,
        Err(message) => return rerender(&state, &admin.0, rejected(&form, message)).await,
    };

    // Exactly one call: create or update, keyed on the hidden id.
    let saved = if form.id.is_empty() {
        state.backend.create_product(&input).await
    } else {
        state.backend.update_product(&form.id, &input).await
    };

    let saved = match saved {
        Ok(product) => product,
        Err(e) => return rerender(&state, &admin.0, rejected(&form, e.to_string())).await,
    };

    // Secondary write: upload the image and link it to the saved product.
    // A failure here keeps the primary record and surfaces a warning.
    if let Some(file) = form.image {
        let position = saved.images.len() as i64;
        let linked = async {
            let url = state
                .backend
                .upload_file(&file.filename, &file.content_type, file.bytes)
                .await?;
            state
                .backend
                .add_product_image(&saved.id, &url, &saved.name, position)
                .await?;
            Ok::<(), ServiceError>(())
        }
        .await;

        if let Err(e) = linked {
            tracing::warn!(product = %saved.id, error = %e, "image upload failed after save");
            let view = ProductsView {
                warning: format!("Product saved, but the image upload failed: {}", e),
                ..Default::default()
            };
            return rerender(&state, &admin.0, view).await;
        }
    }

    Redirect::to("/products?saved=1").into_response()
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
) -> Response {
    match state.backend.delete_product(&id).await {
        Ok(()) => Redirect::to("/products").into_response(),
        Err(e) => {
            let view = ProductsView {
                banner_error: format!("Failed to delete product: {}", e),
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
    brand: String,
    category_id: String,
    car_model: String,
    price: String,
    stock: String,
    rating: String,
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
                "brand" => form.brand = value,
                "category_id" => form.category_id = value,
                "car_model" => form.car_model = value,
                "price" => form.price = value,
                "stock" => form.stock = value,
                "rating" => form.rating = value,
                "description" => form.description = value,
                _ => {}
            }
        }
    }
    Ok(form)
}

fn parse_input(form: &SaveForm) -> Result<ProductInput, String> {
    let price: f64 = form
        .price
        .trim()
        .parse()
        .map_err(|_| "Price must be a number".to_string())?;
    let stock: i64 = form
        .stock
        .trim()
        .parse()
        .map_err(|_| "Stock must be a whole number".to_string())?;

    let rating = if form.rating.trim().is_empty() {
        None
    } else {
        let r: f64 = form
            .rating
            .trim()
            .parse()
            .map_err(|_| "Rating must be a number".to_string())?;
        if !(0.0..=5.0).contains(&r) {
            return Err("Rating must be between 0 and 5".to_string());
        }
        Some(r)
    };

    Ok(ProductInput {
        name: form.name.clone(),
        brand: form.brand.clone(),
        category_id: if form.category_id.is_empty() {
            None
        } else {
            Some(form.category_id.clone())
        },
        car_model: form.car_model.clone(),
        price,
        stock,
        rating,
        description: form.description.clone(),
    })
}

/// View state for a submission the backend (or parsing) rejected: modal
/// stays open with the typed values and the message shown verbatim.
fn rejected(form: &SaveForm, message: String) -> ProductsView {
    ProductsView {
        modal_open: true,
        form: Some(ProductFormView {
            title: if form.id.is_empty() { "New product" } else { "Edit product" },
            id: form.id.clone(),
            name: form.name.clone(),
            brand: form.brand.clone(),
            category_id: form.category_id.clone(),
            car_model: form.car_model.clone(),
            price: form.price.clone(),
            stock: form.stock.clone(),
            rating: form.rating.clone(),
            description: form.description.clone(),
        }),
        form_error: message,
        ..Default::default()
    }
}

fn prefill(product: &Product) -> ProductFormView {
    ProductFormView {
        title: "Edit product",
        id: product.id.clone(),
        name: product.name.clone(),
        brand: product.brand.clone().unwrap_or_default(),
        category_id: product.category_id.clone().unwrap_or_default(),
        car_model: product.car_model.clone().unwrap_or_default(),
        price: product.price.to_string(),
        stock: product.stock.to_string(),
        rating: product.rating.map(|r| r.to_string()).unwrap_or_default(),
        description: product.description.clone().unwrap_or_default(),
    }
}

// ── Rendering ───────────────────────────────────────────────────────

async fn rerender(state: &AppState, admin: &SessionUser, view: ProductsView) -> Response {
    match tokio::try_join!(state.backend.get_products(), state.backend.get_categories()) {
        Ok((products, categories)) => render_page(state, admin, &products, &categories, view),
        Err(e) => error_page(&state.config, admin, "products", "/products", e),
    }
}

fn render_page(
    state: &AppState,
    admin: &SessionUser,
    products: &[Product],
    categories: &[Category],
    view: ProductsView,
) -> Response {
    let form = view.form.unwrap_or_default();
    let category_options = category_options(categories, &form.category_id);
    render(ProductsPage {
        shell: Shell::new(&state.config, admin, "products"),
        page_title: state.config.branding.products_title.clone(),
        count: products.len(),
        rows: product_rows(products),
        category_options,
        modal_open: view.modal_open,
        form,
        form_error: view.form_error,
        notice: view.notice,
        warning: view.warning,
        banner_error: view.banner_error,
    })
}

fn product_rows(products: &[Product]) -> Vec<ProductRow> {
    products
        .iter()
        .map(|p| {
            let (icon_url, icon_text) = match p.category.as_ref().and_then(|c| c.icon.as_ref()) {
                Some(CategoryIcon::ImageUrl(url)) => (url.clone(), String::new()),
                Some(CategoryIcon::Emoji(emoji)) => (String::new(), emoji.clone()),
                None => (String::new(), "🛠️".to_string()),
            };
            ProductRow {
                id: p.id.clone(),
                icon_url,
                icon_text,
                name: p.name.clone(),
                car_model: p.car_model.clone().unwrap_or_else(|| "Universal".to_string()),
                category: p
                    .category
                    .as_ref()
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| "N/A".to_string()),
                brand: p.brand.clone().unwrap_or_else(|| "N/A".to_string()),
                price_label: format_currency(p.price),
                stock: p.stock,
                rating_label: p.rating.map(|r| format!("★ {:.1}", r)).unwrap_or_default(),
            }
        })
        .collect()
}

fn category_options(categories: &[Category], selected: &str) -> Vec<SelectOption> {
    categories
        .iter()
        .map(|c| SelectOption {
            value: c.id.clone(),
            label: c.name.clone(),
            selected: c.id == selected,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, name: &str) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id, "name": name, "price": 450.0, "stock": 12,
        }))
        .unwrap()
    }

    #[test]
    fn row_fallbacks_for_missing_fields() {
        let rows = product_rows(&[product("p1", "Brake pad")]);
        assert_eq!(rows[0].car_model, "Universal");
        assert_eq!(rows[0].category, "N/A");
        assert_eq!(rows[0].brand, "N/A");
        assert_eq!(rows[0].icon_text, "🛠️");
        assert_eq!(rows[0].price_label, "EGP450.00");
        assert_eq!(rows[0].rating_label, "");
    }

    #[test]
    fn prefill_fills_every_field_from_the_record() {
        let p: Product = serde_json::from_value(serde_json::json!({
            "id": "p2", "name": "Oil filter", "brand": "Mann",
            "category_id": "c1", "car_model": "Civic",
            "price": 120.5, "stock": 7, "rating": 4.5,
            "description": "OEM quality",
        }))
        .unwrap();

        let form = prefill(&p);
        assert_eq!(form.title, "Edit product");
        assert_eq!(form.id, "p2");
        assert_eq!(form.brand, "Mann");
        assert_eq!(form.category_id, "c1");
        assert_eq!(form.price, "120.5");
        assert_eq!(form.stock, "7");
        assert_eq!(form.rating, "4.5");
        assert_eq!(form.description, "OEM quality");
    }

    #[test]
    fn parse_input_rejects_bad_numbers() {
        let mut form = SaveForm { price: "abc".into(), stock: "1".into(), ..Default::default() };
        assert_eq!(parse_input(&form).unwrap_err(), "Price must be a number");

        form.price = "10".into();
        form.rating = "9".into();
        assert_eq!(parse_input(&form).unwrap_err(), "Rating must be between 0 and 5");
    }

    #[test]
    fn parse_input_maps_empty_category_to_none() {
        let form = SaveForm { price: "10".into(), stock: "2".into(), ..Default::default() };
        let input = parse_input(&form).unwrap();
        assert!(input.category_id.is_none());
        assert!(input.rating.is_none());
    }

    #[test]
    fn page_renders_rows_and_keeps_the_modal_hidden() {
        use askama::Template;

        let page = ProductsPage {
            shell: Shell {
                app_title: "Car House".into(),
                user_name: "Site Admin".into(),
                footer_text: "Car House · Admin Panel".into(),
                active: "products",
            },
            page_title: "Product Management".into(),
            count: 1,
            rows: product_rows(&[product("p1", "Brake pad")]),
            category_options: Vec::new(),
            modal_open: false,
            form: ProductFormView::default(),
            form_error: String::new(),
            notice: String::new(),
            warning: String::new(),
            banner_error: String::new(),
        };

        let html = page.render().unwrap();
        assert!(html.contains("Brake pad"));
        assert!(html.contains("EGP450.00"));
        assert!(html.contains("Showing 1 products"));
        assert!(html.contains("hidden fixed inset-0"));
        assert!(html.contains("Are you sure you want to delete this product?"));
    }

    #[test]
    fn rejected_submission_reopens_the_modal_with_the_message() {
        use askama::Template;

        let form = SaveForm { name: "Wiper".into(), price: "12".into(), ..Default::default() };
        let view = rejected(&form, "price must be positive".into());

        let page = ProductsPage {
            shell: Shell {
                app_title: "Car House".into(),
                user_name: "Site Admin".into(),
                footer_text: String::new(),
                active: "products",
            },
            page_title: "Product Management".into(),
            count: 0,
            rows: Vec::new(),
            category_options: Vec::new(),
            modal_open: view.modal_open,
            form: view.form.unwrap(),
            form_error: view.form_error,
            notice: String::new(),
            warning: String::new(),
            banner_error: String::new(),
        };

        let html = page.render().unwrap();
        assert!(html.contains("price must be positive"));
        assert!(html.contains("value=\"Wiper\""));
        assert!(!html.contains("hidden fixed inset-0"));
    }

    #[test]
    fn category_options_mark_the_selected_one() {
        let categories: Vec<Category> = serde_json::from_value(serde_json::json!([
            {"id": "c1", "name": "Brakes"},
            {"id": "c2", "name": "Filters"},
        ]))
        .unwrap();

        let options = category_options(&categories, "c2");
        assert!(!options[0].selected);
        assert!(options[1].selected);
    }
}
