use booking_site::{
    InputMask, SERVICE_FEE_RATE, TOTAL_RATE, VAT_RATE, compute_fees, format_amount, parse_price,
    round2,
};
use proptest::prelude::*;
use proptest::test_runner::{FileFailurePersistence, TestCaseResult};
use rust_decimal::Decimal;

const FEES_PROPTEST_REGRESSION_FILE: &str = "tests/proptest-regressions/fees_property_test.txt";
const DEFAULT_FEES_PROPTEST_CASES: u32 = 256;

fn fees_proptest_cases() -> u32 {
    std::env::var("BOOKING_SITE_PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_FEES_PROPTEST_CASES)
}

fn price_strategy() -> BoxedStrategy<Decimal> {
    (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2)).boxed()
}

fn assert_fee_invariants(subtotal: Decimal) -> TestCaseResult {
    let fees = compute_fees(subtotal);
    prop_assert_eq!(fees.subtotal, subtotal);
    prop_assert_eq!(fees.service_fee, round2(subtotal * SERVICE_FEE_RATE));
    prop_assert_eq!(fees.vat, round2(subtotal * VAT_RATE));
    prop_assert_eq!(fees.total, round2(subtotal * TOTAL_RATE));

    let summed = fees.subtotal + fees.service_fee + fees.vat;
    let drift = (summed - fees.total).abs();
    prop_assert!(
        drift <= Decimal::new(1, 2),
        "total {} drifted from parts {} by {}",
        fees.total,
        summed,
        drift
    );
    prop_assert!(fees.total >= fees.subtotal);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: fees_proptest_cases(),
        failure_persistence: Some(Box::new(
            FileFailurePersistence::Direct(FEES_PROPTEST_REGRESSION_FILE),
        )),
        .. ProptestConfig::default()
    })]

    #[test]
    fn fees_follow_rates_within_a_cent(subtotal in price_strategy()) {
        assert_fee_invariants(subtotal)?;
    }

    #[test]
    fn formatted_prices_parse_back(amount in price_strategy(), currency in "[A-Z]{3}") {
        let shown = format_amount(amount, &currency);
        prop_assert_eq!(parse_price(&shown), amount);
    }

    #[test]
    fn parse_price_never_panics(text in "\\PC{0,24}") {
        let price = parse_price(&text);
        prop_assert!(price >= Decimal::ZERO);
    }

    #[test]
    fn masks_keep_only_bounded_digits(raw in "[0-9a-z /-]{0,30}") {
        let card = InputMask::CardNumber.apply(&raw);
        prop_assert!(card.len() <= 16);
        prop_assert!(card.bytes().all(|b| b.is_ascii_digit()));

        let cvv = InputMask::Cvv.apply(&raw);
        prop_assert!(cvv.len() <= 3);

        let expiry = InputMask::Expiry.apply(&raw);
        prop_assert!(expiry.len() <= 5);
        if expiry.len() > 2 {
            prop_assert_eq!(&expiry[2..3], "/");
        }
        prop_assert_eq!(InputMask::Expiry.apply(&expiry), expiry);
    }
}
