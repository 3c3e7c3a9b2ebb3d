use iso_currency::Currency;

use fractic_server_error::ServerError;

use crate::{entities::LedgerConfig, errors::InvalidIsoCurrencyCode};

use super::monetary_input_model::RateInputModel;

/// RON shape of the ledger configuration, e.g.
/// `(fallback_interest_rate: "0.02", currency: "COP")`. Both fields are
/// optional.
#[derive(Debug, Default, serde_derive::Deserialize)]
pub(crate) struct LedgerConfigModel {
    #[serde(default)]
    fallback_interest_rate: Option<String>,
    #[serde(default)]
    currency: Option<String>,
}

impl LedgerConfigModel {
    pub(crate) fn into_config(self) -> Result<LedgerConfig, ServerError> {
        let defaults = LedgerConfig::default();
        let currency = match self.currency {
            Some(code) => Currency::from_code(code.trim())
                .ok_or_else(|| InvalidIsoCurrencyCode::new(&code))?,
            None => defaults.currency,
        };
        let fallback_interest_rate = self
            .fallback_interest_rate
            .and_then(|raw| RateInputModel::parse(&raw).0)
            .unwrap_or(defaults.fallback_interest_rate);
        Ok(LedgerConfig {
            fallback_interest_rate,
            currency,
        })
    }
}
