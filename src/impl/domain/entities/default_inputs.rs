use std::collections::BTreeMap;

use super::{month::Month, monthly_record::MonthlyRecordInputs};

/// Static per-month starting inputs for a historical year, used when the
/// backend holds no record for a month yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultInputsTable {
    pub year: i32,
    pub months: BTreeMap<Month, MonthlyRecordInputs>,
}

impl DefaultInputsTable {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            months: BTreeMap::new(),
        }
    }

    pub fn get(&self, month: Month) -> Option<&MonthlyRecordInputs> {
        self.months.get(&month)
    }
}
