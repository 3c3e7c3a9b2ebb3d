use std::collections::BTreeMap;

use crate::entities::{ChangedCell, DerivedField, Month, MonthlyRecord};

/// Derived cells that differ between two versions of a year. A month present
/// only in `new` counts every non-zero derived cell as changed.
pub(crate) fn diff_records(old: &[MonthlyRecord], new: &[MonthlyRecord]) -> Vec<ChangedCell> {
    let old_by_month: BTreeMap<Month, &MonthlyRecord> =
        old.iter().map(|r| (r.month(), r)).collect();
    new.iter()
        .flat_map(|n| {
            let previous = old_by_month.get(&n.month()).map(|o| &o.derived);
            DerivedField::all()
                .filter(move |field| match previous {
                    Some(o) => o.get(*field) != n.derived.get(*field),
                    None => !n.derived.get(*field).is_zero(),
                })
                .map(move |field| ChangedCell {
                    month: n.month(),
                    field,
                })
        })
        .collect()
}

/// Months that must be written back: anything whose inputs or derived values
/// changed, plus months the backend does not hold yet. Ascending order.
pub(crate) fn changed_months(old: &[MonthlyRecord], new: &[MonthlyRecord]) -> Vec<Month> {
    let old_by_month: BTreeMap<Month, &MonthlyRecord> =
        old.iter().map(|r| (r.month(), r)).collect();
    let mut months: Vec<Month> = new
        .iter()
        .filter(|n| match old_by_month.get(&n.month()) {
            Some(o) => !n.persisted || o.inputs != n.inputs || o.derived != n.derived,
            None => true,
        })
        .map(|n| n.month())
        .collect();
    months.sort();
    months
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::entities::{DerivedFields, MonthlyRecordInputs};

    fn record(month: Month, outstanding: i64, persisted: bool) -> MonthlyRecord {
        MonthlyRecord {
            inputs: MonthlyRecordInputs::new(month),
            derived: DerivedFields {
                outstanding_balance: outstanding.into(),
                total_due: outstanding.into(),
                ..Default::default()
            },
            persisted,
        }
    }

    #[test]
    fn test_diff_reports_only_changed_cells() {
        let old = vec![record(Month::January, 100, true), record(Month::February, 100, true)];
        let mut new = old.clone();
        new[1].derived.outstanding_balance = dec!(90);

        let cells = diff_records(&old, &new);
        assert_eq!(
            cells,
            vec![ChangedCell {
                month: Month::February,
                field: DerivedField::OutstandingBalance
            }]
        );
    }

    #[test]
    fn test_diff_of_identical_years_is_empty() {
        let old = vec![record(Month::March, 500, true)];
        assert!(diff_records(&old, &old).is_empty());
        assert!(changed_months(&old, &old).is_empty());
    }

    #[test]
    fn test_changed_months_includes_unpersisted() {
        let old = vec![record(Month::January, 100, true), record(Month::February, 0, false)];
        let mut new = old.clone();
        new[0].inputs.paid_capital = dec!(10);

        assert_eq!(
            changed_months(&old, &new),
            vec![Month::January, Month::February]
        );
    }
}
