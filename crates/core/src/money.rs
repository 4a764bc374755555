//! Money formatting

use rusty_money::{Money, iso::Currency};

/// Format a whole-unit amount in the given currency, e.g. `₽1.500,00`.
pub fn format_price(amount: i64, currency: &'static Currency) -> String {
    Money::from_major(amount, currency).to_string()
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, RUB};

    use super::*;

    #[test]
    fn formats_roubles() {
        let formatted = format_price(1500, RUB);

        assert!(formatted.contains('₽'), "rouble sign missing: {formatted}");
        assert!(formatted.contains("500"), "amount missing: {formatted}");
    }

    #[test]
    fn formats_other_currencies() {
        assert_eq!(format_price(12, GBP), "£12.00", "pound formatting");
    }

    #[test]
    fn formats_zero() {
        assert!(format_price(0, RUB).contains('0'), "zero amount");
    }
}
