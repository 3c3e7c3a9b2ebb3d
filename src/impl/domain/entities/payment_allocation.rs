use rust_decimal::Decimal;

use super::monthly_record::{MonthlyRecord, MonthlyRecordInputs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentCategory {
    Extraordinary,
    Penalty,
    Parking,
    CommonArea,
    Other,
    Interest,
    Retroactive,
    Capital,
}

impl PaymentCategory {
    /// Order in which a payment fills outstanding balances. `Capital` is last
    /// and takes whatever remains.
    pub const WATERFALL: [PaymentCategory; 8] = [
        PaymentCategory::Extraordinary,
        PaymentCategory::Penalty,
        PaymentCategory::Parking,
        PaymentCategory::CommonArea,
        PaymentCategory::Other,
        PaymentCategory::Interest,
        PaymentCategory::Retroactive,
        PaymentCategory::Capital,
    ];

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Per-category amounts still owed for one month. Categories never set are
/// zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutstandingBalances {
    pub extraordinary: Decimal,
    pub penalty: Decimal,
    pub parking: Decimal,
    pub common_area: Decimal,
    pub other: Decimal,
    pub interest: Decimal,
    pub retroactive: Decimal,
    pub capital: Decimal,
}

/// Result of splitting one payment across categories. Amounts always sum to
/// the payment that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentAllocation {
    amounts: [Decimal; 8],
}

// --

impl OutstandingBalances {
    pub fn get(&self, category: PaymentCategory) -> Decimal {
        match category {
            PaymentCategory::Extraordinary => self.extraordinary,
            PaymentCategory::Penalty => self.penalty,
            PaymentCategory::Parking => self.parking,
            PaymentCategory::CommonArea => self.common_area,
            PaymentCategory::Other => self.other,
            PaymentCategory::Interest => self.interest,
            PaymentCategory::Retroactive => self.retroactive,
            PaymentCategory::Capital => self.capital,
        }
    }

    /// Balances owed for a recalculated month: each charge of the month, all
    /// interest (current and carried), and the capital carried from previous
    /// months plus this month's administration fee.
    pub fn from_record(record: &MonthlyRecord) -> Self {
        let inputs = &record.inputs;
        let derived = &record.derived;
        Self {
            extraordinary: inputs.extraordinary_fee,
            penalty: inputs.penalty_charge,
            parking: inputs.parking_charge,
            common_area: inputs.common_area_charge,
            other: inputs.other_charge,
            interest: derived.total_interest,
            retroactive: inputs.retroactive_charge,
            capital: derived
                .prior_capital_debt
                .saturating_add(inputs.administration_fee),
        }
    }
}

impl PaymentAllocation {
    pub(crate) fn set(&mut self, category: PaymentCategory, amount: Decimal) {
        self.amounts[category.index()] = amount;
    }

    pub fn get(&self, category: PaymentCategory) -> Decimal {
        self.amounts[category.index()]
    }

    /// Non-zero allocations in waterfall order.
    pub fn iter(&self) -> impl Iterator<Item = (PaymentCategory, Decimal)> + '_ {
        PaymentCategory::WATERFALL
            .iter()
            .map(|c| (*c, self.get(*c)))
            .filter(|(_, amount)| !amount.is_zero())
    }

    pub fn total(&self) -> Decimal {
        self.amounts.iter().copied().sum()
    }

    /// Writes the allocation into the month's payment fields, replacing any
    /// previous payment amounts.
    pub fn apply_to(&self, inputs: &mut MonthlyRecordInputs) {
        inputs.paid_extraordinary = self.get(PaymentCategory::Extraordinary);
        inputs.paid_penalty = self.get(PaymentCategory::Penalty);
        inputs.paid_parking = self.get(PaymentCategory::Parking);
        inputs.paid_common_area = self.get(PaymentCategory::CommonArea);
        inputs.paid_other = self.get(PaymentCategory::Other);
        inputs.paid_interest = self.get(PaymentCategory::Interest);
        inputs.paid_retroactive = self.get(PaymentCategory::Retroactive);
        inputs.paid_capital = self.get(PaymentCategory::Capital);
    }
}
