//! US-dollar rendering for estimates and spend amounts.

use icu_decimal::DecimalFormatter;
use icu_decimal::input::Decimal;
use icu_decimal::options::DecimalFormatterOptions;
use icu_locale_core::Locale;
use rust_decimal::Decimal as Amount;
use rust_decimal::RoundingStrategy;
use rust_decimal::prelude::ToPrimitive;

thread_local! {
    // DecimalFormatter is not Sync, so each thread builds its own.
    static FORMATTER: DecimalFormatter = make_en_us_formatter();
}

#[allow(clippy::expect_used)]
fn make_en_us_formatter() -> DecimalFormatter {
    let loc: Locale = "en-US".parse().expect("en-US wasn't a valid locale");
    DecimalFormatter::try_new(loc.into(), DecimalFormatterOptions::default())
        .expect("en-US wasn't a valid locale")
}

fn group_thousands(n: u64) -> String {
    FORMATTER.with(|f| f.format(&Decimal::from(n)).to_string())
}

/// `$12,345` style rendering without cents.
pub fn format_whole_dollars(dollars: u64) -> String {
    format!("${}", group_thousands(dollars))
}

/// Rounds to the cent (half away from zero) and renders `$9,376.88`.
///
/// Negative amounts never occur in this domain and are clamped to zero.
pub fn format_usd(amount: Amount) -> String {
    let cents = round_to_cents(amount)
        .checked_mul(Amount::ONE_HUNDRED)
        .and_then(|c| c.to_u64())
        .unwrap_or(0);
    format!("${}.{:02}", group_thousands(cents / 100), cents % 100)
}

pub fn round_to_cents(amount: Amount) -> Amount {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn formats_cents_and_separators() {
        assert_eq!(format_usd(Amount::new(9_376_875, 3)), "$9,376.88");
        assert_eq!(format_usd(Amount::new(191_705, 3)), "$191.71");
        assert_eq!(format_usd(Amount::new(1_234_567_891, 2)), "$12,345,678.91");
    }

    #[test]
    fn pads_small_fractions() {
        assert_eq!(format_usd(Amount::new(5, 2)), "$0.05");
        assert_eq!(format_usd(Amount::from(7)), "$7.00");
        assert_eq!(format_usd(Amount::ZERO), "$0.00");
    }

    #[test]
    fn whole_dollars_group_thousands() {
        assert_eq!(format_whole_dollars(1_000), "$1,000");
        assert_eq!(format_whole_dollars(200_000), "$200,000");
        assert_eq!(format_whole_dollars(999), "$999");
    }
}
