use std::collections::BTreeMap;

use fractic_server_error::ServerError;
use serde_json::Value;

use crate::{
    entities::{InputField, MonthlyRecordInputs},
    errors::InvalidFormJson,
};

use super::{
    iso_date_model::ISODateModel,
    monetary_input_model::{MonetaryInputModel, RateInputModel},
};

const PAYMENT_DATE_KEY: &str = "paymentDate";

/// Raw values of a month's edit form, keyed by camelCase field name, exactly
/// as the UI sends them (strings, numbers or null). Unknown keys are ignored.
#[derive(Debug, Default)]
pub(crate) struct FormInputsModel {
    values: BTreeMap<String, Value>,
}

impl FormInputsModel {
    pub(crate) fn from_json(s: &str) -> Result<Self, ServerError> {
        let values: BTreeMap<String, Value> =
            serde_json::from_str(s).map_err(|e| InvalidFormJson::with_debug(&e))?;
        Ok(Self { values })
    }

    /// Overwrites every field present in the form. Fields absent from the form
    /// keep their current value.
    pub(crate) fn apply_to(&self, inputs: &mut MonthlyRecordInputs) -> Result<(), ServerError> {
        for field in InputField::all() {
            if let Some(value) = self.values.get(field.key()) {
                apply_raw(inputs, field, &raw_text(value));
            }
        }
        if let Some(value) = self.values.get(PAYMENT_DATE_KEY) {
            inputs.payment_date = ISODateModel::parse_optional(&raw_text(value))?;
        }
        Ok(())
    }
}

/// Coerces one raw value into `field`. A blank rate clears the month's rate
/// override.
pub(crate) fn apply_raw(inputs: &mut MonthlyRecordInputs, field: InputField, raw: &str) {
    if field.is_rate() {
        inputs.monthly_interest_rate = RateInputModel::parse(raw).into();
    } else {
        inputs.set(field, MonetaryInputModel::parse(raw).into());
    }
}

fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}
