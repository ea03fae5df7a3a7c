//! Currency formatting and the VAT breakdown derived from stored totals.

/// VAT rate applied to order totals. Stored totals are tax-inclusive.
pub const VAT_RATE: f64 = 0.14;

/// Format a value as EGP currency: `1234.5` → `"EGP1234.50"`.
///
/// The marker is a prefix and the value always carries two decimals.
pub fn format_currency(value: f64) -> String {
    format!("EGP{:.2}", value)
}

/// Tax breakdown of a tax-inclusive order total.
///
/// The backend stores only the gross total; subtotal and tax are derived:
/// `subtotal = total / (1 + VAT_RATE)`, `tax = subtotal * VAT_RATE`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxBreakdown {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl TaxBreakdown {
    /// Derive the breakdown from a stored gross total.
    pub fn from_total(total: f64) -> Self {
        let subtotal = total / (1.0 + VAT_RATE);
        let tax = subtotal * VAT_RATE;
        Self { subtotal, tax, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_two_decimals_prefix_marker() {
        assert_eq!(format_currency(1234.5), "EGP1234.50");
        assert_eq!(format_currency(0.0), "EGP0.00");
        assert_eq!(format_currency(99.999), "EGP100.00");
    }

    #[test]
    fn tax_breakdown_reconstructs_total() {
        let b = TaxBreakdown::from_total(114.0);
        assert!((b.subtotal - 100.0).abs() < 1e-9);
        assert!((b.tax - 14.0).abs() < 1e-9);
        assert!((b.subtotal + b.tax - b.total).abs() < 1e-9);
    }

    #[test]
    fn tax_breakdown_arbitrary_total() {
        let b = TaxBreakdown::from_total(2499.99);
        assert!((b.subtotal + b.tax - 2499.99).abs() < 1e-9);
        assert!((b.tax / b.subtotal - VAT_RATE).abs() < 1e-12);
    }
}
