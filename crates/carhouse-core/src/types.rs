//! Closed domain enums and the tagged category icon.
//!
//! The backend stores these as plain strings; the tagging happens once at
//! decode time so renderers never re-infer anything from string shape.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ── Order status ────────────────────────────────────────────────────

/// Order lifecycle status. Closed set, lowercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in lifecycle order. Drives the per-row select.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// The literal wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Human label for table badges and select options.
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status '{}'", other)),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── User role ───────────────────────────────────────────────────────

/// User role claim. Admin-table membership in the backend follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Admin,
    Superadmin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Customer, Role::Admin, Role::Superadmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
            Role::Superadmin => "superadmin",
        }
    }

    /// Whether this role passes the admin gate.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::Superadmin)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "admin" => Ok(Role::Admin),
            "superadmin" => Ok(Role::Superadmin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Customer
    }
}

// ── Category icon ───────────────────────────────────────────────────

/// Category icon: an emoji glyph or an image URL.
///
/// The wire value is a single string either way. Classification happens
/// exactly once, when the record is decoded (or when the admin form is
/// submitted) — renderers only match on the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryIcon {
    Emoji(String),
    ImageUrl(String),
}

const IMAGE_SUFFIXES: [&str; 5] = [".png", ".jpg", ".jpeg", ".webp", ".svg"];

impl CategoryIcon {
    /// Classify a raw backend string into a tagged icon.
    pub fn classify(raw: &str) -> CategoryIcon {
        let lower = raw.to_ascii_lowercase();
        let looks_like_url = lower.starts_with("http://")
            || lower.starts_with("https://")
            || IMAGE_SUFFIXES.iter().any(|s| lower.ends_with(s));
        if looks_like_url {
            CategoryIcon::ImageUrl(raw.to_string())
        } else {
            CategoryIcon::Emoji(raw.to_string())
        }
    }

    /// The raw string the backend stores.
    pub fn as_str(&self) -> &str {
        match self {
            CategoryIcon::Emoji(s) | CategoryIcon::ImageUrl(s) => s,
        }
    }
}

impl Serialize for CategoryIcon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CategoryIcon {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Err(D::Error::custom("empty icon value"));
        }
        Ok(CategoryIcon::classify(&raw))
    }
}

// ── Dates ───────────────────────────────────────────────────────────

/// Format an RFC 3339 timestamp as "Jan 5, 2026".
///
/// Unparseable input falls back to the raw string rather than failing the
/// whole page render.
pub fn format_date(raw: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.format("%b %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_round_trip() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert!("refunded".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn order_status_wire_values_are_literal() {
        let json = serde_json::to_string(&OrderStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
        let back: OrderStatus = serde_json::from_str("\"delivered\"").unwrap();
        assert_eq!(back, OrderStatus::Delivered);
    }

    #[test]
    fn role_admin_gate() {
        assert!(!Role::Customer.is_admin());
        assert!(Role::Admin.is_admin());
        assert!(Role::Superadmin.is_admin());
    }

    #[test]
    fn icon_classification() {
        assert_eq!(CategoryIcon::classify("🔧"), CategoryIcon::Emoji("🔧".into()));
        assert_eq!(
            CategoryIcon::classify("https://cdn.example.com/brakes.png"),
            CategoryIcon::ImageUrl("https://cdn.example.com/brakes.png".into())
        );
        assert_eq!(
            CategoryIcon::classify("uploads/filters.JPG"),
            CategoryIcon::ImageUrl("uploads/filters.JPG".into())
        );
        // Plain words stay emoji-ish text, not URLs.
        assert_eq!(CategoryIcon::classify("🏷️"), CategoryIcon::Emoji("🏷️".into()));
    }

    #[test]
    fn icon_serializes_to_plain_string() {
        let icon = CategoryIcon::ImageUrl("https://x/y.png".into());
        assert_eq!(serde_json::to_string(&icon).unwrap(), "\"https://x/y.png\"");
        let back: CategoryIcon = serde_json::from_str("\"🚗\"").unwrap();
        assert_eq!(back, CategoryIcon::Emoji("🚗".into()));
    }

    #[test]
    fn date_formatting() {
        assert_eq!(format_date("2026-01-05T10:30:00Z"), "Jan 5, 2026");
        assert_eq!(format_date("not-a-date"), "not-a-date");
    }
}
