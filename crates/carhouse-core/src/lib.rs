//! Shared domain primitives for the Car House admin panel.
//!
//! Everything durable lives in the external backend; this crate only holds
//! the value types both the backend client and the admin server agree on:
//! the unified error taxonomy, money/VAT math, and the closed enums that
//! the wire protocol treats as plain strings.

pub mod error;
pub mod money;
pub mod types;

pub use error::{error_code, ServiceError};
pub use money::{format_currency, TaxBreakdown, VAT_RATE};
pub use types::{format_date, CategoryIcon, OrderStatus, Role};
