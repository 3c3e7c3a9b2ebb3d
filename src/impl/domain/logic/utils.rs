use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::warn;

/// Rounds to whole currency units, half away from zero (spreadsheet
/// `ROUND(x, 0)`).
pub(crate) fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to currency minor units (2 decimal places), half away from zero.
pub(crate) fn round_minor(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Sum that saturates at the `Decimal` bounds instead of overflowing.
pub(crate) fn sum(amounts: &[Decimal]) -> Decimal {
    amounts
        .iter()
        .fold(Decimal::ZERO, |total, amount| total.saturating_add(*amount))
}

/// Rates above 1 are assumed to have been typed as a percentage (2 instead of
/// 0.02) and are divided by 100. A genuine rate above 100% cannot be
/// expressed.
pub(crate) fn effective_monthly_rate(rate: Decimal) -> Decimal {
    if rate > Decimal::ONE {
        let corrected = rate / dec!(100);
        warn!(%rate, %corrected, "interest rate above 1 treated as a percentage");
        corrected
    } else {
        rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_currency_half_away_from_zero() {
        assert_eq!(round_currency(dec!(2.5)), dec!(3));
        assert_eq!(round_currency(dec!(-2.5)), dec!(-3));
        assert_eq!(round_currency(dec!(2.49)), dec!(2));
        assert_eq!(round_currency(dec!(19999.5)), dec!(20000));
    }

    #[test]
    fn test_round_minor() {
        assert_eq!(round_minor(dec!(10.005)), dec!(10.01));
        assert_eq!(round_minor(dec!(10.004)), dec!(10.00));
    }

    #[test]
    fn test_sum_saturates() {
        assert_eq!(sum(&[dec!(1.5), dec!(2), dec!(-0.5)]), dec!(3));
        assert_eq!(sum(&[Decimal::MAX, Decimal::MAX]), Decimal::MAX);
        assert_eq!(sum(&[Decimal::MIN, dec!(-1)]), Decimal::MIN);
    }

    #[test]
    fn test_effective_monthly_rate() {
        assert_eq!(effective_monthly_rate(dec!(0.02)), dec!(0.02));
        assert_eq!(effective_monthly_rate(dec!(1)), dec!(1));
        assert_eq!(effective_monthly_rate(dec!(2)), dec!(0.02));
        assert_eq!(effective_monthly_rate(dec!(1.5)), dec!(0.015));
    }
}
