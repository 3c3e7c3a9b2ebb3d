use iso_currency::Currency;
use num_format::{Locale, ToFormattedString as _};
use rust_decimal::{prelude::ToPrimitive as _, Decimal, RoundingStrategy};

/// Standard number decimal places for the given currency
/// (ex. JPY = 0, USD = 2).
fn decimal_places(currency: Currency) -> u32 {
    currency.exponent().unwrap_or(0) as u32
}

/// Format an amount with thousands separators and the currency symbol.
///
/// For consistency, uses en locale ('.' as decimal mark, i.e. 1,000.00)
/// regardless of user's locale or currency. Ledger amounts are whole units, so
/// `whole_units` drops the fractional part even for currencies with minor
/// units.
pub(crate) fn format_amount(amount: Decimal, currency: Currency, whole_units: bool) -> String {
    let decimal_places = if whole_units { 0 } else { decimal_places(currency) };
    let rounded =
        amount.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let abs = rounded.abs();
    let integer_part = abs
        .trunc()
        .to_i128()
        .unwrap_or_default()
        .to_formatted_string(&Locale::en);
    if decimal_places == 0 {
        format!("{}{} {}", sign, integer_part, currency.symbol())
    } else {
        let width = decimal_places as usize;
        let fractional_part = (abs.fract() * Decimal::from(10_i64.pow(decimal_places)))
            .trunc()
            .to_i64()
            .unwrap_or_default();
        format!(
            "{}{}.{:0width$} {}",
            sign,
            integer_part,
            fractional_part,
            currency.symbol(),
        )
    }
}
