use bigdecimal::{BigDecimal, Zero};

/// Shipping fee charged once per order when none is configured.
pub const DEFAULT_SHIPPING_FEE: &str = "5.00";

/// Exclusive upper bound on the magnitude of a stored amount.
pub const MONEY_LIMIT: i64 = 10_000_000_000;

/// Whether `amount` fits the `NUMERIC(12, 2)` money columns: no more than two
/// decimal places and a magnitude below [`MONEY_LIMIT`].
pub fn fits_money_column(amount: &BigDecimal) -> bool {
    amount.with_scale(2) == *amount && amount.abs() < BigDecimal::from(MONEY_LIMIT)
}

pub fn line_total(unit_price: &BigDecimal, quantity: u32) -> BigDecimal {
    unit_price.clone() * BigDecimal::from(quantity)
}

/// Sum of price × quantity over `(price, quantity)` pairs.
pub fn subtotal<'a, I>(lines: I) -> BigDecimal
where
    I: IntoIterator<Item = (&'a BigDecimal, u32)>,
{
    lines
        .into_iter()
        .fold(BigDecimal::zero(), |acc, (price, quantity)| {
            acc + line_total(price, quantity)
        })
}

pub fn grand_total(subtotal: &BigDecimal, shipping: &BigDecimal) -> BigDecimal {
    subtotal.clone() + shipping.clone()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn subtotal_and_grand_total_with_fixed_shipping() {
        let price = dec("99.99");
        let sub = subtotal([(&price, 2)]);
        assert_eq!(sub, dec("199.98"));
        assert_eq!(grand_total(&sub, &dec(DEFAULT_SHIPPING_FEE)), dec("204.98"));
    }

    #[test]
    fn empty_subtotal_is_zero() {
        assert_eq!(subtotal(std::iter::empty()), BigDecimal::zero());
    }

    #[test]
    fn money_column_accepts_cents_and_rejects_sub_cents_or_huge_amounts() {
        assert!(fits_money_column(&dec("99.99")));
        assert!(fits_money_column(&dec("10.500")));
        assert!(fits_money_column(&dec("9999999999.99")));
        assert!(!fits_money_column(&dec("10.005")));
        assert!(!fits_money_column(&dec("0.001")));
        assert!(!fits_money_column(&dec("10000000000")));
        assert!(!fits_money_column(&dec("-10000000000.00")));
    }

    #[test]
    fn mixed_lines() {
        let a = dec("49.99");
        let b = dec("0.01");
        assert_eq!(subtotal([(&a, 3), (&b, 1)]), dec("149.98"));
    }
}
