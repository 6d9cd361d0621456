//! Price formatting for the cart surfaces.

use ochag_core::Money;

/// No-break space, the thousands separator used by the `ru-RU` locale.
pub const RU_GROUP_SEPARATOR: char = '\u{a0}';

/// Default currency symbol, placed after the amount.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₽";

/// How money is shown on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceFormat {
    /// Symbol appended after the amount, separated by a space.
    pub currency_symbol: String,
    /// Separator inserted between groups of three digits in totals.
    pub group_separator: char,
}

impl Default for PriceFormat {
    fn default() -> Self {
        Self {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            group_separator: RU_GROUP_SEPARATOR,
        }
    }
}

impl PriceFormat {
    /// Unit price as shown on a cart row: the raw amount, no grouping.
    ///
    /// `590 ₽`
    #[must_use]
    pub fn unit_price(&self, price: Money) -> String {
        format!("{price} {}", self.currency_symbol)
    }

    /// Cart total with thousands grouping.
    ///
    /// `12 345 ₽` (with a no-break space between the groups)
    #[must_use]
    pub fn total(&self, total: Money) -> String {
        format!(
            "{} {}",
            group_thousands(total.units(), self.group_separator),
            self.currency_symbol
        )
    }
}

/// Insert `separator` between every three digits, counting from the right.
#[must_use]
pub fn group_thousands(amount: i64, separator: char) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }

    let lead = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0, ' '), "0");
        assert_eq!(group_thousands(999, ' '), "999");
        assert_eq!(group_thousands(1000, ' '), "1 000");
        assert_eq!(group_thousands(12_345, ' '), "12 345");
        assert_eq!(group_thousands(123_456, ' '), "123 456");
        assert_eq!(group_thousands(1_234_567, ' '), "1 234 567");
        assert_eq!(group_thousands(-4500, ' '), "-4 500");
    }

    #[test]
    fn test_total_uses_no_break_space_and_trailing_symbol() {
        let format = PriceFormat::default();
        assert_eq!(format.total(Money::new(12_345)), "12\u{a0}345 ₽");
        assert_eq!(format.total(Money::ZERO), "0 ₽");
    }

    #[test]
    fn test_unit_price_is_not_grouped() {
        let format = PriceFormat::default();
        assert_eq!(format.unit_price(Money::new(1290)), "1290 ₽");
    }

    #[test]
    fn test_custom_symbol() {
        let format = PriceFormat {
            currency_symbol: "руб.".to_string(),
            group_separator: ' ',
        };
        assert_eq!(format.total(Money::new(2500)), "2 500 руб.");
    }
}
