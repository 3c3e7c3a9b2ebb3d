use fractic_server_error::ServerError;

use super::{
    month::Month,
    monthly_record::{DerivedField, MonthlyRecord},
};

/// A derived cell whose value changed during a recalculation; the UI
/// highlights these briefly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChangedCell {
    pub month: Month,
    pub field: DerivedField,
}

#[derive(Debug)]
pub struct SaveFailure {
    pub month: Month,
    pub error: ServerError,
}

/// Result of one edit-recalculate-persist cycle. `records` always holds the
/// full recalculated year, including months whose save failed.
#[derive(Debug)]
pub struct CascadeOutcome {
    pub records: Vec<MonthlyRecord>,
    pub changed_cells: Vec<ChangedCell>,
    pub saved_months: Vec<Month>,
    pub failures: Vec<SaveFailure>,
}

impl CascadeOutcome {
    pub fn is_fully_saved(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed_months(&self) -> Vec<Month> {
        self.failures.iter().map(|f| f.month).collect()
    }
}
