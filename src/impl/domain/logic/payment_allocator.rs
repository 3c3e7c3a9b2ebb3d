use fractic_server_error::ServerError;
use rust_decimal::Decimal;

use crate::{
    entities::{MonthlyRecord, OutstandingBalances, PaymentAllocation, PaymentCategory},
    errors::InvalidAmount,
};

use super::utils::round_minor;

pub(crate) struct PaymentAllocator;

impl PaymentAllocator {
    pub(crate) fn new() -> Self {
        Self
    }

    /// Fills each category's balance in waterfall order. Whatever is left
    /// after the named categories goes to capital, even beyond the capital
    /// balance (an overpayment becomes a credit next month).
    ///
    /// Fully paid categories are rounded to minor units. The category the
    /// payment runs out in, or capital, takes the exact remainder, so the
    /// allocation always sums to `total_payment`.
    pub(crate) fn allocate(
        &self,
        total_payment: Decimal,
        balances: &OutstandingBalances,
    ) -> Result<PaymentAllocation, ServerError> {
        if total_payment < Decimal::ZERO {
            return Err(InvalidAmount::new(&total_payment));
        }

        let mut allocation = PaymentAllocation::default();
        let remaining = PaymentCategory::WATERFALL
            .iter()
            .filter(|c| **c != PaymentCategory::Capital)
            .fold(total_payment, |remaining, category| {
                let owed = balances.get(*category).max(Decimal::ZERO);
                // The category the payment runs out in takes all of it, so
                // nothing reaches a later category while this one is unpaid.
                let allocated = match round_minor(owed) {
                    _ if remaining <= owed => remaining,
                    rounded if rounded > remaining => owed,
                    rounded => rounded,
                };
                allocation.set(*category, allocated);
                remaining - allocated
            });
        allocation.set(PaymentCategory::Capital, remaining);

        Ok(allocation)
    }

    /// Allocates against the balances of an already recalculated month.
    pub(crate) fn allocate_for_month(
        &self,
        total_payment: Decimal,
        record: &MonthlyRecord,
    ) -> Result<PaymentAllocation, ServerError> {
        self.allocate(total_payment, &OutstandingBalances::from_record(record))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn balances() -> OutstandingBalances {
        OutstandingBalances {
            extraordinary: dec!(30),
            penalty: dec!(20),
            interest: dec!(10),
            capital: dec!(1000),
            ..Default::default()
        }
    }

    #[test]
    fn test_waterfall_order() {
        let allocation = PaymentAllocator::new().allocate(dec!(100), &balances()).unwrap();
        assert_eq!(allocation.get(PaymentCategory::Extraordinary), dec!(30));
        assert_eq!(allocation.get(PaymentCategory::Penalty), dec!(20));
        assert_eq!(allocation.get(PaymentCategory::Parking), dec!(0));
        assert_eq!(allocation.get(PaymentCategory::CommonArea), dec!(0));
        assert_eq!(allocation.get(PaymentCategory::Other), dec!(0));
        assert_eq!(allocation.get(PaymentCategory::Interest), dec!(10));
        assert_eq!(allocation.get(PaymentCategory::Retroactive), dec!(0));
        assert_eq!(allocation.get(PaymentCategory::Capital), dec!(40));
        assert_eq!(allocation.total(), dec!(100));
    }

    #[test]
    fn test_zero_payment() {
        let allocation = PaymentAllocator::new().allocate(dec!(0), &balances()).unwrap();
        assert_eq!(allocation.iter().count(), 0);
        assert_eq!(allocation.total(), dec!(0));
    }

    #[test]
    fn test_payment_within_first_category() {
        let allocation = PaymentAllocator::new().allocate(dec!(25), &balances()).unwrap();
        assert_eq!(allocation.get(PaymentCategory::Extraordinary), dec!(25));
        assert_eq!(
            allocation.iter().collect::<Vec<_>>(),
            vec![(PaymentCategory::Extraordinary, dec!(25))]
        );
    }

    #[test]
    fn test_overpayment_goes_to_capital() {
        let allocation = PaymentAllocator::new().allocate(dec!(5000), &balances()).unwrap();
        assert_eq!(allocation.get(PaymentCategory::Capital), dec!(4940));
        assert_eq!(allocation.total(), dec!(5000));
    }

    #[test]
    fn test_negative_balances_are_skipped() {
        let balances = OutstandingBalances {
            extraordinary: dec!(-50),
            penalty: dec!(10),
            ..Default::default()
        };
        let allocation = PaymentAllocator::new().allocate(dec!(15), &balances).unwrap();
        assert_eq!(allocation.get(PaymentCategory::Extraordinary), dec!(0));
        assert_eq!(allocation.get(PaymentCategory::Penalty), dec!(10));
        assert_eq!(allocation.get(PaymentCategory::Capital), dec!(5));
    }

    #[test]
    fn test_sub_cent_overpayment_lands_in_capital() {
        let balances = OutstandingBalances {
            extraordinary: dec!(10.004),
            ..Default::default()
        };
        let allocation = PaymentAllocator::new()
            .allocate(dec!(10.015), &balances)
            .unwrap();
        assert_eq!(allocation.get(PaymentCategory::Extraordinary), dec!(10.00));
        assert_eq!(allocation.get(PaymentCategory::Capital), dec!(0.015));
        assert_eq!(allocation.total(), dec!(10.015));
    }

    #[test]
    fn test_sub_cent_payment_stays_in_unpaid_category() {
        let balances = OutstandingBalances {
            extraordinary: dec!(50),
            penalty: dec!(50),
            ..Default::default()
        };
        let allocation = PaymentAllocator::new()
            .allocate(dec!(10.005), &balances)
            .unwrap();
        assert_eq!(allocation.get(PaymentCategory::Extraordinary), dec!(10.005));
        assert_eq!(allocation.get(PaymentCategory::Penalty), dec!(0));
        assert_eq!(allocation.get(PaymentCategory::Capital), dec!(0));
        assert_eq!(allocation.total(), dec!(10.005));
    }

    #[test]
    fn test_rounding_up_a_balance_never_exceeds_payment_or_balance() {
        let balances = OutstandingBalances {
            penalty: dec!(10.005),
            parking: dec!(5),
            ..Default::default()
        };
        // The penalty rounds to 10.01, more than is left, so it is paid
        // exactly instead.
        let allocation = PaymentAllocator::new()
            .allocate(dec!(10.008), &balances)
            .unwrap();
        assert_eq!(allocation.get(PaymentCategory::Penalty), dec!(10.005));
        assert_eq!(allocation.get(PaymentCategory::Parking), dec!(0.003));
        assert_eq!(allocation.total(), dec!(10.008));
    }

    #[test]
    fn test_negative_payment_is_rejected() {
        assert!(PaymentAllocator::new().allocate(dec!(-1), &balances()).is_err());
    }
}
