use std::{str::FromStr, sync::LazyLock};

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

/// Largest magnitude accepted from a form. Anything above it is treated as
/// unparsable.
pub(crate) const MAX_INPUT_MAGNITUDE: Decimal = dec!(1000000000000000);

/// Currency symbols, codes and whitespace that may decorate a typed amount.
static DECORATIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\s$€£]|(?i:COP|USD|EUR)").expect("hardcoded regex should be valid")
});

/// Leniently parsed monetary form value. This is the only place raw input is
/// turned into an amount: blank, `null`, `NaN` and any other unparsable text
/// become zero instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MonetaryInputModel(pub Decimal);

impl MonetaryInputModel {
    pub(crate) fn parse(s: &str) -> Self {
        MonetaryInputModel(parse_decimal(s).unwrap_or_else(|| {
            if !s.trim().is_empty() {
                debug!(raw = s, "unparsable monetary input coerced to zero");
            }
            Decimal::ZERO
        }))
    }
}

/// Leniently parsed interest rate. Blank or unparsable input means "not set"
/// (the fallback rate applies). A trailing `%` is accepted; whether the value
/// is a fraction or a percentage is decided later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RateInputModel(pub Option<Decimal>);

impl RateInputModel {
    pub(crate) fn parse(s: &str) -> Self {
        RateInputModel(parse_decimal(s.trim().trim_end_matches('%')))
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    let raw = DECORATIONS.replace_all(s, "").replace(',', "");
    let is_negative = raw.starts_with('(') && raw.ends_with(')');
    let numeric_part = raw.trim_matches(|c| c == '(' || c == ')');
    let amount = Decimal::from_str(numeric_part)
        .or_else(|_| Decimal::from_scientific(numeric_part))
        .ok()
        .filter(|amount| amount.abs() <= MAX_INPUT_MAGNITUDE)?;
    Some(if is_negative { -amount } else { amount })
}

impl Into<Decimal> for MonetaryInputModel {
    fn into(self) -> Decimal {
        self.0
    }
}

impl Into<Option<Decimal>> for RateInputModel {
    fn into(self) -> Option<Decimal> {
        self.0
    }
}
