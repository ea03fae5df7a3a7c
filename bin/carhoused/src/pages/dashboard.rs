//! Dashboard: the four aggregate stat cards.

use axum::extract::State;
use axum::response::Response;
use axum::Extension;

use carhouse_core::format_currency;

use crate::pages::{error_page, render, Shell};
use crate::routes::AppState;
use crate::session::CurrentAdmin;

#[derive(askama::Template)]
#[template(path = "dashboard.html")]
struct DashboardPage {
    shell: Shell,
    page_title: String,
    total_products: String,
    total_categories: String,
    total_orders: String,
    revenue: String,
}

pub async fn page(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
) -> Response {
    let stats = match state.backend.get_statistics().await {
        Ok(stats) => stats,
        Err(e) => return error_page(&state.config, &admin.0, "dashboard", "/dashboard", e),
    };

    render(DashboardPage {
        shell: Shell::new(&state.config, &admin.0, "dashboard"),
        page_title: state.config.branding.dashboard_title.clone(),
        total_products: stats.total_products.to_string(),
        total_categories: stats.total_categories.to_string(),
        total_orders: stats.total_orders.to_string(),
        revenue: format_currency(stats.total_revenue),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use askama::Template;

    #[test]
    fn page_renders_the_stat_cards() {
        let page = DashboardPage {
            shell: Shell {
                app_title: "Car House".into(),
                user_name: "Site Admin".into(),
                footer_text: "Car House · Admin Panel".into(),
                active: "dashboard",
            },
            page_title: "Dashboard Overview".into(),
            total_products: "42".into(),
            total_categories: "7".into(),
            total_orders: "123".into(),
            revenue: format_currency(99183.5),
        };

        let html = page.render().unwrap();
        assert!(html.contains("Dashboard Overview"));
        assert!(html.contains("42"));
        assert!(html.contains("EGP99183.50"));
        // Active nav link is highlighted, the rest are not.
        assert!(html.contains("href=\"/dashboard\" class=\"block rounded px-3 py-2 bg-slate-800"));
        assert!(!html.contains("href=\"/orders\" class=\"block rounded px-3 py-2 bg-slate-800"));
    }
}
