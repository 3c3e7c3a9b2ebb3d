use iso_currency::Currency;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerConfig {
    /// Used for months without their own `monthly_interest_rate`.
    pub fallback_interest_rate: Decimal,
    /// Only affects presentation.
    pub currency: Currency,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            fallback_interest_rate: Decimal::ZERO,
            currency: Currency::COP,
        }
    }
}
