//! Wire records owned by the backend.
//!
//! These are plain structured values: no invariants are enforced locally
//! beyond optional-field fallbacks. Every render starts from a fresh read,
//! so nothing here caches or carries identity between pages.

use serde::{Deserialize, Serialize};

use carhouse_core::{CategoryIcon, OrderStatus, Role};

// ── Catalog ─────────────────────────────────────────────────────────

/// A spare-part product. `category` is the joined record when the read
/// includes it; `category_id` is the stored reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_model: Option<String>,

    pub price: f64,
    pub stock: i64,

    /// 0–5, only present in the rating variant of the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ProductImage>,
}

/// Secondary image record attached to a product after upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,

    #[serde(default)]
    pub position: i64,
}

/// Fields submitted when creating or updating a product. The same body is
/// used for both; which call is issued depends only on the presence of an
/// id at the call site.
#[derive(Debug, Clone, Serialize)]
pub struct ProductInput {
    pub name: String,
    pub brand: String,
    pub category_id: Option<String>,
    pub car_model: String,
    pub price: f64,
    pub stock: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub description: String,
}

/// A product category. The icon is tagged at decode time; a missing, null
/// or empty wire value all mean "no icon" and the renderers' fallback
/// applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,

    #[serde(
        default,
        deserialize_with = "empty_icon_is_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub icon: Option<CategoryIcon>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn empty_icon_is_none<'de, D>(deserializer: D) -> Result<Option<CategoryIcon>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.is_empty())
        .map(|s| CategoryIcon::classify(&s)))
}

/// Fields submitted when creating or updating a category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInput {
    pub name: String,
    pub icon: CategoryIcon,
    pub description: String,
}

// ── Orders ──────────────────────────────────────────────────────────

/// A customer order. Items are embedded, the user record is joined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<OrderItem>,

    pub total: f64,
    pub status: OrderStatus,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub quantity: i64,
    pub price: f64,
}

/// Aggregate counts and revenue for the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(default)]
    pub total_products: u64,
    #[serde(default)]
    pub total_categories: u64,
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub total_revenue: f64,
}

// ── Users & session ─────────────────────────────────────────────────

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    pub email: String,

    #[serde(default)]
    pub role: Role,

    #[serde(default)]
    pub blocked: bool,
}

/// Partial user update. Only present fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked: Option<bool>,
}

/// Registration payload for a new account.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: String,
    pub role: Role,
}

/// The user behind the current session, as the backend reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(default)]
    pub role: Role,
}

impl SessionUser {
    /// The admin flag the gate trusts. A claim, not a capability check.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Display name for the header, falling back to the email.
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.email)
    }
}

/// An authenticated session: opaque token plus the resolved user.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}
