use std::collections::BTreeMap;

use fractic_server_error::ServerError;
use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    entities::{DerivedFields, Month, MonthlyRecord, MonthlyRecordInputs},
    errors::InvalidSequence,
};

use super::utils::{effective_monthly_rate, round_currency, sum};

/// Recomputes the derived fields of a year's monthly records. Months are
/// always processed January to December, each one seeded by the previous
/// month's result.
pub(crate) struct LedgerEngine {
    fallback_interest_rate: Decimal,
}

/// What a month hands to its successor.
#[derive(Debug, Clone, Copy)]
struct Carry {
    outstanding_balance: Decimal,
    accumulated_interest: Decimal,
    paid_interest: Decimal,
}

impl Carry {
    fn from_record(record: &MonthlyRecord) -> Self {
        Self {
            outstanding_balance: record.derived.outstanding_balance,
            accumulated_interest: record.derived.accumulated_interest,
            paid_interest: record.inputs.paid_interest,
        }
    }
}

impl LedgerEngine {
    pub(crate) fn new(fallback_interest_rate: Decimal) -> Self {
        Self {
            fallback_interest_rate,
        }
    }

    /// Derives all twelve months of a year. Months missing from `inputs` are
    /// computed from all-zero inputs. Fails only if the months are duplicated
    /// or not in ascending order.
    pub(crate) fn recalculate_year(
        &self,
        inputs: &[MonthlyRecordInputs],
    ) -> Result<Vec<MonthlyRecord>, ServerError> {
        validate_sequence(inputs.iter().map(|i| i.month))?;
        let by_month: BTreeMap<Month, &MonthlyRecordInputs> =
            inputs.iter().map(|i| (i.month, i)).collect();

        Ok(self.fold_months(
            Month::all().map(|month| {
                (
                    by_month
                        .get(&month)
                        .map(|i| (*i).clone())
                        .unwrap_or_else(|| MonthlyRecordInputs::new(month)),
                    false,
                )
            }),
            None,
            Vec::with_capacity(12),
        ))
    }

    /// Incremental variant for an edit of `month`: earlier months are kept as
    /// they are, `month` and every later month are recomputed. If an earlier
    /// month is missing from `records` there is nothing to seed from, so the
    /// whole year is recomputed instead.
    pub(crate) fn recalculate_from(
        &self,
        month: Month,
        records: &[MonthlyRecord],
    ) -> Result<Vec<MonthlyRecord>, ServerError> {
        validate_sequence(records.iter().map(|r| r.month()))?;
        let by_month: BTreeMap<Month, &MonthlyRecord> =
            records.iter().map(|r| (r.month(), r)).collect();

        let earlier_complete = Month::all()
            .take_while(|m| *m < month)
            .all(|m| by_month.contains_key(&m));
        if !earlier_complete {
            debug!(%month, "earlier months missing; recalculating the full year");
            let inputs: Vec<MonthlyRecordInputs> =
                records.iter().map(|r| r.inputs.clone()).collect();
            let mut recalculated = self.recalculate_year(&inputs)?;
            for record in recalculated.iter_mut() {
                record.persisted = by_month
                    .get(&record.month())
                    .map_or(false, |r| r.persisted);
            }
            return Ok(recalculated);
        }

        let kept: Vec<MonthlyRecord> = Month::all()
            .take_while(|m| *m < month)
            .filter_map(|m| by_month.get(&m).map(|r| (*r).clone()))
            .collect();
        let carry = kept.last().map(Carry::from_record);

        Ok(self.fold_months(
            Month::all().skip_while(|m| *m < month).map(|m| match by_month.get(&m) {
                Some(r) => (r.inputs.clone(), r.persisted),
                None => (MonthlyRecordInputs::new(m), false),
            }),
            carry,
            kept,
        ))
    }

    fn fold_months(
        &self,
        months: impl Iterator<Item = (MonthlyRecordInputs, bool)>,
        carry: Option<Carry>,
        initial: Vec<MonthlyRecord>,
    ) -> Vec<MonthlyRecord> {
        months
            .fold((initial, carry), |(mut acc, carry), (inputs, persisted)| {
                let derived = self.derive_month(&inputs, carry.as_ref());
                let record = MonthlyRecord {
                    inputs,
                    derived,
                    persisted,
                };
                let next = Carry::from_record(&record);
                acc.push(record);
                (acc, Some(next))
            })
            .0
    }

    fn derive_month(&self, inputs: &MonthlyRecordInputs, carry: Option<&Carry>) -> DerivedFields {
        let prior_capital_debt = carry.map_or(Decimal::ZERO, |c| c.outstanding_balance);

        // Amounts saturate at `Decimal::MAX` instead of overflowing.
        let total_capital = round_currency(sum(&[
            prior_capital_debt,
            inputs.administration_fee,
            inputs.retroactive_charge,
            inputs.parking_charge,
            inputs.penalty_charge,
            inputs.common_area_charge,
        ]));

        let rate = effective_monthly_rate(
            inputs
                .monthly_interest_rate
                .unwrap_or(self.fallback_interest_rate),
        );
        let interest_amount_this_month = if total_capital > Decimal::ZERO {
            round_currency(total_capital.saturating_mul(rate))
        } else {
            Decimal::ZERO
        };

        // Interest not paid last month carries over. A month without capital
        // accrues no new interest.
        let accumulated_interest = match carry {
            None => Decimal::ZERO,
            Some(c) if total_capital.is_zero() => round_currency(
                c.accumulated_interest
                    .saturating_sub(c.paid_interest)
                    .max(Decimal::ZERO),
            ),
            Some(c) => round_currency(
                c.accumulated_interest
                    .saturating_add(interest_amount_this_month)
                    .saturating_sub(c.paid_interest)
                    .max(Decimal::ZERO),
            ),
        };

        let total_interest = interest_amount_this_month.saturating_add(accumulated_interest);
        let capital = round_currency(sum(&[
            total_capital,
            inputs.extraordinary_fee,
            inputs.other_charge,
        ]));
        let total_due = round_currency(sum(&[
            total_capital,
            inputs.extraordinary_fee,
            inputs.other_charge,
            interest_amount_this_month,
            accumulated_interest,
            inputs.other_interest_charge,
        ]));
        let total_paid = round_currency(inputs.payments_total());
        let outstanding_balance = if total_paid.is_zero() {
            total_due
        } else {
            round_currency(total_due.saturating_sub(total_paid))
        };

        debug!(
            month = %inputs.month,
            %prior_capital_debt,
            %total_capital,
            %interest_amount_this_month,
            %accumulated_interest,
            %total_due,
            %total_paid,
            %outstanding_balance,
            "month recalculated"
        );

        DerivedFields {
            prior_capital_debt,
            total_capital,
            interest_amount_this_month,
            accumulated_interest,
            total_interest,
            capital,
            total_paid,
            total_due,
            outstanding_balance,
        }
    }
}

/// Months must be strictly ascending (which also rules out duplicates).
fn validate_sequence(months: impl Iterator<Item = Month>) -> Result<(), ServerError> {
    months
        .try_fold(None::<Month>, |previous, month| match previous {
            Some(p) if p == month => Err(InvalidSequence::new(&format!(
                "duplicate month {}",
                month
            ))),
            Some(p) if p > month => Err(InvalidSequence::new(&format!(
                "{} listed after {}",
                month, p
            ))),
            _ => Ok(Some(month)),
        })
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn inputs(month: Month) -> MonthlyRecordInputs {
        MonthlyRecordInputs::new(month)
    }

    fn find(records: &[MonthlyRecord], month: Month) -> &MonthlyRecord {
        records
            .iter()
            .find(|r| r.month() == month)
            .expect("every month is derived")
    }

    #[test]
    fn test_unpaid_fee_carries_forward_unchanged() {
        let mut jan = inputs(Month::January);
        jan.administration_fee = dec!(570000);
        jan.monthly_interest_rate = Some(dec!(0));

        let records = LedgerEngine::new(dec!(0)).recalculate_year(&[jan]).unwrap();

        assert_eq!(records.len(), 12);
        let j = &find(&records, Month::January).derived;
        assert_eq!(j.prior_capital_debt, dec!(0));
        assert_eq!(j.total_capital, dec!(570000));
        assert_eq!(j.total_due, dec!(570000));
        assert_eq!(j.outstanding_balance, dec!(570000));
        for record in &records[1..] {
            assert_eq!(record.derived.prior_capital_debt, dec!(570000));
            assert_eq!(record.derived.total_capital, dec!(570000));
            assert_eq!(record.derived.outstanding_balance, dec!(570000));
        }
    }

    #[test]
    fn test_interest_on_total_capital() {
        let mut jan = inputs(Month::January);
        jan.administration_fee = dec!(1000000);
        jan.monthly_interest_rate = Some(dec!(0.02));

        let records = LedgerEngine::new(dec!(0.02)).recalculate_year(&[jan]).unwrap();
        let j = &find(&records, Month::January).derived;
        assert_eq!(j.interest_amount_this_month, dec!(20000));
        assert_eq!(j.accumulated_interest, dec!(0));
        assert_eq!(j.total_interest, dec!(20000));
        assert_eq!(j.total_due, dec!(1020000));

        // February: new interest on the carried balance, and it also enters
        // the accumulated figure.
        let f = &find(&records, Month::February).derived;
        assert_eq!(f.prior_capital_debt, dec!(1020000));
        assert_eq!(f.total_capital, dec!(1020000));
        assert_eq!(f.interest_amount_this_month, dec!(20400));
        assert_eq!(f.accumulated_interest, dec!(20400));
        assert_eq!(f.total_interest, dec!(40800));
        assert_eq!(f.total_due, dec!(1060800));
    }

    #[test]
    fn test_percentage_rate_is_normalized() {
        let mut jan = inputs(Month::January);
        jan.administration_fee = dec!(1000000);
        jan.monthly_interest_rate = Some(dec!(2));

        let records = LedgerEngine::new(dec!(0)).recalculate_year(&[jan]).unwrap();
        assert_eq!(records[0].derived.interest_amount_this_month, dec!(20000));
    }

    #[test]
    fn test_fallback_rate_only_applies_when_unset() {
        let mut jan = inputs(Month::January);
        jan.administration_fee = dec!(100000);
        let mut feb = inputs(Month::February);
        feb.monthly_interest_rate = Some(dec!(0));

        let records = LedgerEngine::new(dec!(0.01)).recalculate_year(&[jan, feb]).unwrap();
        assert_eq!(records[0].derived.interest_amount_this_month, dec!(1000));
        assert_eq!(records[1].derived.interest_amount_this_month, dec!(0));
        // March has no record and falls back again.
        assert_eq!(records[2].derived.interest_amount_this_month, dec!(1010));
    }

    #[test]
    fn test_payment_reduces_outstanding_balance() {
        let mut jan = inputs(Month::January);
        jan.administration_fee = dec!(100000);
        jan.paid_capital = dec!(40000);

        let records = LedgerEngine::new(dec!(0)).recalculate_year(&[jan]).unwrap();
        assert_eq!(records[0].derived.total_paid, dec!(40000));
        assert_eq!(records[0].derived.outstanding_balance, dec!(60000));
        assert_eq!(records[1].derived.prior_capital_debt, dec!(60000));
    }

    #[test]
    fn test_zero_capital_month_only_carries_unpaid_interest() {
        let mut jan = inputs(Month::January);
        jan.administration_fee = dec!(1000);
        jan.monthly_interest_rate = Some(dec!(0.1));
        jan.paid_capital = dec!(1000);
        let mut feb = inputs(Month::February);
        feb.monthly_interest_rate = Some(dec!(0.1));
        feb.paid_capital = dec!(116);
        feb.paid_interest = dec!(4);
        let mut mar = inputs(Month::March);
        mar.monthly_interest_rate = Some(dec!(0.5));

        let records = LedgerEngine::new(dec!(0))
            .recalculate_year(&[jan, feb, mar])
            .unwrap();

        let f = &records[1].derived;
        assert_eq!(f.prior_capital_debt, dec!(100));
        assert_eq!(f.interest_amount_this_month, dec!(10));
        assert_eq!(f.accumulated_interest, dec!(10));
        assert_eq!(f.total_due, dec!(120));
        assert_eq!(f.outstanding_balance, dec!(0));

        let m = &records[2].derived;
        assert_eq!(m.total_capital, dec!(0));
        assert_eq!(m.interest_amount_this_month, dec!(0));
        assert_eq!(m.accumulated_interest, dec!(6));
        assert_eq!(m.total_due, dec!(6));
    }

    #[test]
    fn test_duplicate_month_is_rejected() {
        let result = LedgerEngine::new(dec!(0))
            .recalculate_year(&[inputs(Month::May), inputs(Month::May)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_out_of_order_months_are_rejected() {
        let result = LedgerEngine::new(dec!(0))
            .recalculate_year(&[inputs(Month::June), inputs(Month::April)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_recalculate_from_rejects_invalid_sequences() {
        let engine = LedgerEngine::new(dec!(0));
        let records = engine.recalculate_year(&[]).unwrap();

        let duplicated = [records[2].clone(), records[2].clone()];
        assert!(engine.recalculate_from(Month::March, &duplicated).is_err());
        let reversed = [records[3].clone(), records[1].clone()];
        assert!(engine.recalculate_from(Month::January, &reversed).is_err());
    }

    #[test]
    fn test_extreme_amounts_saturate() {
        let mut jan = inputs(Month::January);
        jan.administration_fee = Decimal::MAX;
        jan.parking_charge = Decimal::MAX;
        jan.extraordinary_fee = Decimal::MAX;
        jan.monthly_interest_rate = Some(Decimal::MAX);
        let mut mar = inputs(Month::March);
        mar.paid_capital = Decimal::MAX;
        mar.paid_interest = Decimal::MAX;

        let records = LedgerEngine::new(dec!(0.02))
            .recalculate_year(&[jan, mar])
            .unwrap();

        let january = find(&records, Month::January);
        assert_eq!(january.derived.total_capital, Decimal::MAX);
        assert_eq!(january.derived.interest_amount_this_month, Decimal::MAX);
        assert_eq!(january.derived.total_due, Decimal::MAX);
        assert_eq!(
            find(&records, Month::February).derived.outstanding_balance,
            Decimal::MAX
        );
        let march = find(&records, Month::March);
        assert_eq!(march.derived.total_paid, Decimal::MAX);
        assert_eq!(march.derived.outstanding_balance, Decimal::ZERO);
    }

    #[test]
    fn test_recalculate_from_keeps_earlier_months() {
        let engine = LedgerEngine::new(dec!(0.02));
        let mut jan = inputs(Month::January);
        jan.administration_fee = dec!(300000);
        let mut records = engine.recalculate_year(&[jan]).unwrap();

        // Tamper with January's stored result: an incremental run from March
        // must not touch it.
        records[0].derived.total_due = dec!(1);
        records[2].inputs.parking_charge = dec!(50000);

        let updated = engine.recalculate_from(Month::March, &records).unwrap();
        assert_eq!(updated.len(), 12);
        assert_eq!(updated[0].derived.total_due, dec!(1));
        assert_eq!(updated[1], records[1]);
        assert_eq!(
            updated[2].derived.prior_capital_debt,
            records[1].derived.outstanding_balance
        );
        assert_eq!(
            updated[2].derived.total_capital,
            records[1].derived.outstanding_balance + dec!(50000)
        );
    }

    #[test]
    fn test_recalculate_from_matches_full_recalculation() {
        let engine = LedgerEngine::new(dec!(0.015));
        let mut jan = inputs(Month::January);
        jan.administration_fee = dec!(250000);
        let mut jun = inputs(Month::June);
        jun.paid_capital = dec!(100000);
        jun.paid_interest = dec!(5000);
        let records = engine.recalculate_year(&[jan.clone(), jun.clone()]).unwrap();

        let mut edited = records.clone();
        edited[5].inputs.penalty_charge = dec!(12000);
        let incremental = engine.recalculate_from(Month::June, &edited).unwrap();

        jun.penalty_charge = dec!(12000);
        let full = engine.recalculate_year(&[jan, jun]).unwrap();
        assert_eq!(incremental, full);
    }

    #[test]
    fn test_recalculate_from_with_gap_recomputes_everything() {
        let engine = LedgerEngine::new(dec!(0));
        let mut feb = inputs(Month::February);
        feb.administration_fee = dec!(1000);
        let records = vec![MonthlyRecord {
            inputs: feb,
            derived: DerivedFields::default(),
            persisted: true,
        }];

        let updated = engine.recalculate_from(Month::February, &records).unwrap();
        assert_eq!(updated.len(), 12);
        assert!(updated[1].persisted);
        assert!(!updated[0].persisted);
        assert_eq!(updated[11].derived.outstanding_balance, dec!(1000));
    }
}
