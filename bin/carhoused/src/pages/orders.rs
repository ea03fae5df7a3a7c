//! Orders page: read-only rows with the VAT breakdown and a status select.

use std::str::FromStr;

use axum::extract::{Form, Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Extension, Router};
use serde::Deserialize;

use carhouse_client::{Order, SessionUser};
use carhouse_core::{format_currency, format_date, OrderStatus, ServiceError, TaxBreakdown};

use crate::pages::{error_page, render, SelectOption, Shell};
use crate::routes::AppState;
use crate::session::CurrentAdmin;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(page))
        .route("/orders/{id}/status", post(update_status))
}

#[derive(askama::Template)]
#[template(path = "orders.html")]
struct OrdersPage {
    shell: Shell,
    page_title: String,
    rows: Vec<OrderRow>,
    notice: String,
    banner_error: String,
}

struct OrderRow {
    id: String,
    short_id: String,
    customer: String,
    date: String,
    item_count: usize,
    subtotal_label: String,
    vat_label: String,
    total_label: String,
    status_label: String,
    badge_class: &'static str,
    options: Vec<SelectOption>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    saved: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    status: String,
}

pub async fn page(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Query(query): Query<PageQuery>,
) -> Response {
    let orders = match state.backend.get_orders().await {
        Ok(orders) => orders,
        Err(e) => return error_page(&state.config, &admin.0, "orders", "/orders", e),
    };

    let notice = if query.saved.is_some() {
        "Order updated.".to_string()
    } else {
        String::new()
    };
    render_page(&state, &admin.0, &orders, notice, String::new())
}

pub async fn update_status(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Response {
    let status = match OrderStatus::from_str(&form.status) {
        Ok(status) => status,
        Err(_) => {
            let e = ServiceError::Validation(format!("unknown order status: {}", form.status));
            return rerender(&state, &admin.0, format!("Failed to update: {}", e)).await;
        }
    };

    match state.backend.update_order_status(&id, status).await {
        Ok(_) => Redirect::to("/orders?saved=1").into_response(),
        // The re-fetch shows the server's state, so the select snaps back
        // to the value the change never reached.
        Err(e) => rerender(&state, &admin.0, format!("Failed to update: {}", e)).await,
    }
}

async fn rerender(state: &AppState, admin: &SessionUser, banner_error: String) -> Response {
    match state.backend.get_orders().await {
        Ok(orders) => render_page(state, admin, &orders, String::new(), banner_error),
        Err(e) => error_page(&state.config, admin, "orders", "/orders", e),
    }
}

fn render_page(
    state: &AppState,
    admin: &SessionUser,
    orders: &[Order],
    notice: String,
    banner_error: String,
) -> Response {
    render(OrdersPage {
        shell: Shell::new(&state.config, admin, "orders"),
        page_title: state.config.branding.orders_title.clone(),
        rows: order_rows(orders),
        notice,
        banner_error,
    })
}

fn order_rows(orders: &[Order]) -> Vec<OrderRow> {
    orders.iter().map(order_row).collect()
}

fn order_row(order: &Order) -> OrderRow {
    let tax = TaxBreakdown::from_total(order.total);
    OrderRow {
        id: order.id.clone(),
        short_id: order.id.chars().take(8).collect(),
        customer: order
            .user
            .as_ref()
            .and_then(|u| u.full_name.clone().or_else(|| Some(u.email.clone())))
            .unwrap_or_else(|| "Guest".to_string()),
        date: format_date(&order.created_at),
        item_count: order.items.len(),
        subtotal_label: format_currency(tax.subtotal),
        vat_label: format_currency(tax.tax),
        total_label: format_currency(tax.total),
        status_label: order.status.label().to_string(),
        badge_class: badge_class(order.status),
        options: status_options(order.status),
    }
}

fn badge_class(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "bg-orange-100 text-orange-700",
        OrderStatus::Shipped => "bg-teal-100 text-teal-700",
        _ => "bg-slate-100 text-slate-600",
    }
}

fn status_options(current: OrderStatus) -> Vec<SelectOption> {
    OrderStatus::ALL
        .iter()
        .map(|s| SelectOption {
            value: s.as_str().to_string(),
            label: s.label().to_string(),
            selected: *s == current,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(total: f64) -> Order {
        serde_json::from_value(serde_json::json!({
            "id": "a1b2c3d4e5f6",
            "user": {"id": "u1", "email": "jane@cars.eg", "full_name": "Jane"},
            "items": [
                {"quantity": 2, "price": 100.0},
                {"quantity": 1, "price": 50.0},
            ],
            "total": total,
            "status": "pending",
            "created_at": "2024-03-05T10:00:00Z",
        }))
        .unwrap()
    }

    #[test]
    fn row_breaks_the_total_into_net_and_vat() {
        let row = order_row(&order(1140.0));
        assert_eq!(row.subtotal_label, "EGP1000.00");
        assert_eq!(row.vat_label, "EGP140.00");
        assert_eq!(row.total_label, "EGP1140.00");
    }

    #[test]
    fn row_truncates_id_and_formats_date() {
        let row = order_row(&order(10.0));
        assert_eq!(row.short_id, "a1b2c3d4");
        assert_eq!(row.date, "Mar 5, 2024");
        assert_eq!(row.customer, "Jane");
        assert_eq!(row.item_count, 2);
    }

    #[test]
    fn missing_user_shows_guest() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "id": "o2", "total": 5.0, "status": "delivered",
            "created_at": "2024-01-01T00:00:00Z",
        }))
        .unwrap();
        assert_eq!(order_row(&order).customer, "Guest");
    }

    #[test]
    fn options_cover_every_status_with_current_selected() {
        let options = status_options(OrderStatus::Shipped);
        assert_eq!(options.len(), 5);
        let selected: Vec<&str> = options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.value.as_str())
            .collect();
        assert_eq!(selected, ["shipped"]);
    }

    #[test]
    fn page_renders_the_status_select_and_breakdown() {
        use askama::Template;
        use crate::pages::Shell;

        let page = OrdersPage {
            shell: Shell {
                app_title: "Car House".into(),
                user_name: "Site Admin".into(),
                footer_text: String::new(),
                active: "orders",
            },
            page_title: "Orders".into(),
            rows: order_rows(&[order(1140.0)]),
            notice: String::new(),
            banner_error: String::new(),
        };

        let html = page.render().unwrap();
        assert!(html.contains("#a1b2c3d4"));
        assert!(html.contains("EGP1000.00"));
        assert!(html.contains("EGP140.00"));
        assert!(html.contains("action=\"/orders/a1b2c3d4e5f6/status\""));
        assert!(html.contains("onchange=\"this.form.submit()\""));
        // Every status appears as an option.
        for status in OrderStatus::ALL {
            assert!(html.contains(&format!("value=\"{}\"", status.as_str())));
        }
    }

    #[test]
    fn badge_classes_by_status() {
        assert!(badge_class(OrderStatus::Pending).contains("orange"));
        assert!(badge_class(OrderStatus::Shipped).contains("teal"));
        assert!(badge_class(OrderStatus::Cancelled).contains("slate"));
    }
}
