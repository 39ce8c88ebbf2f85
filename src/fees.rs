use std::str::FromStr;
use std::sync::LazyLock;

use fancy_regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

/// 5% service fee.
pub const SERVICE_FEE_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);
/// 14% VAT.
pub const VAT_RATE: Decimal = Decimal::from_parts(14, 0, 0, false, 2);
/// Price plus service fee plus VAT, applied to the subtotal in one step.
pub const TOTAL_RATE: Decimal = Decimal::from_parts(119, 0, 0, false, 2);

static NUMBER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d*(?:\.\d*)?").expect("number prefix pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeBreakdown {
    pub subtotal: Decimal,
    pub service_fee: Decimal,
    pub vat: Decimal,
    pub total: Decimal,
}

/// Derives the displayed fees for a ticket price.
///
/// `total` comes straight from the subtotal, so it can differ by a cent from
/// `subtotal + service_fee + vat` once those are rounded. Amounts past the
/// `Decimal` range saturate at `Decimal::MAX`.
pub fn compute_fees(subtotal: Decimal) -> FeeBreakdown {
    FeeBreakdown {
        subtotal,
        service_fee: round2(subtotal.saturating_mul(SERVICE_FEE_RATE)),
        vat: round2(subtotal.saturating_mul(VAT_RATE)),
        total: round2(subtotal.saturating_mul(TOTAL_RATE)),
    }
}

pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Reads a price out of display text such as `"1,200.50 EGP"`.
///
/// Everything but ASCII digits and dots is dropped, then the longest leading
/// number is taken. Text without a usable number is worth zero.
pub fn parse_price(text: &str) -> Decimal {
    let stripped = text
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.')
        .collect::<String>();

    let prefix = match NUMBER_PREFIX.find(&stripped) {
        Ok(Some(found)) => found.as_str(),
        _ => "",
    };
    let prefix = prefix.trim_end_matches('.');
    if !prefix.bytes().any(|b| b.is_ascii_digit()) {
        return Decimal::ZERO;
    }

    let normalized = if prefix.starts_with('.') {
        format!("0{prefix}")
    } else {
        prefix.to_string()
    };
    Decimal::from_str(&normalized).unwrap_or(Decimal::ZERO)
}

/// `"297.50 EGP"`.
pub fn format_amount(amount: Decimal, currency: &str) -> String {
    format!("{:.2} {currency}", round2(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).expect("test decimal")
    }

    #[test]
    fn parse_price_strips_currency_and_separators() {
        assert_eq!(parse_price("250 EGP"), dec("250"));
        assert_eq!(parse_price("1,200.50 EGP"), dec("1200.50"));
        assert_eq!(parse_price("EGP 75.5"), dec("75.5"));
        assert_eq!(parse_price(".5"), dec("0.5"));
        assert_eq!(parse_price("40."), dec("40"));
    }

    #[test]
    fn parse_price_keeps_longest_leading_number() {
        assert_eq!(parse_price("1.2.3"), dec("1.2"));
        assert_eq!(parse_price("v1.2 beta 3"), dec("1.23"));
    }

    #[test]
    fn parse_price_defaults_to_zero() {
        for text in ["", "Free", "EGP", ".", "...", "—"] {
            assert_eq!(parse_price(text), Decimal::ZERO, "{text:?}");
        }
    }

    #[test]
    fn compute_fees_for_typical_ticket() {
        let fees = compute_fees(dec("250"));
        assert_eq!(fees.service_fee, dec("12.50"));
        assert_eq!(fees.vat, dec("35.00"));
        assert_eq!(fees.total, dec("297.50"));
    }

    #[test]
    fn total_is_not_the_sum_of_rounded_parts() {
        let fees = compute_fees(dec("0.70"));
        assert_eq!(fees.service_fee, dec("0.04"));
        assert_eq!(fees.vat, dec("0.10"));
        assert_eq!(fees.total, dec("0.83"));
        assert_ne!(fees.subtotal + fees.service_fee + fees.vat, fees.total);
    }

    #[test]
    fn oversized_price_saturates_instead_of_overflowing() {
        let subtotal = parse_price("70000000000000000000000000000 EGP");
        assert_eq!(subtotal, dec("70000000000000000000000000000"));

        let fees = compute_fees(subtotal);
        assert_eq!(fees.total, Decimal::MAX);
        assert!(fees.service_fee > Decimal::ZERO);
        assert!(fees.vat > fees.service_fee);
        assert!(fees.total >= fees.subtotal);
    }

    #[test]
    fn format_amount_pads_to_two_places() {
        assert_eq!(format_amount(dec("250"), "EGP"), "250.00 EGP");
        assert_eq!(format_amount(dec("12.345"), "EGP"), "12.35 EGP");
        assert_eq!(format_amount(Decimal::ZERO, "EGP"), "0.00 EGP");
    }
}
