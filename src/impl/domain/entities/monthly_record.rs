use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::month::Month;

/// User-editable fields of one month. Payment fields are either typed in
/// directly or written by the payment allocator.
#[derive(
    Debug, Clone, PartialEq, Eq, serde_derive::Serialize, serde_derive::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRecordInputs {
    pub month: Month,

    // Charges.
    pub administration_fee: Decimal,
    pub retroactive_charge: Decimal,
    pub parking_charge: Decimal,
    pub penalty_charge: Decimal,
    pub common_area_charge: Decimal,
    pub extraordinary_fee: Decimal,
    pub other_charge: Decimal,
    /// Decimal fraction (0.02 = 2%). `None` means the ledger's fallback rate
    /// applies.
    pub monthly_interest_rate: Option<Decimal>,
    /// Reserved term of `total_due`. Always zero in current workflows.
    #[serde(default)]
    pub other_interest_charge: Decimal,

    // Payments.
    pub paid_retroactive: Decimal,
    pub paid_extraordinary: Decimal,
    pub paid_penalty: Decimal,
    pub paid_parking: Decimal,
    pub paid_common_area: Decimal,
    pub paid_other: Decimal,
    pub paid_interest: Decimal,
    pub paid_capital: Decimal,
    pub payment_date: Option<NaiveDate>,
}

/// Values recomputed from the inputs and the previous month. Never edited
/// directly.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, serde_derive::Serialize, serde_derive::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct DerivedFields {
    pub prior_capital_debt: Decimal,
    pub total_capital: Decimal,
    pub interest_amount_this_month: Decimal,
    pub accumulated_interest: Decimal,
    pub total_interest: Decimal,
    pub capital: Decimal,
    pub total_paid: Decimal,
    pub total_due: Decimal,
    pub outstanding_balance: Decimal,
}

#[derive(
    Debug, Clone, PartialEq, Eq, serde_derive::Serialize, serde_derive::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRecord {
    pub inputs: MonthlyRecordInputs,
    pub derived: DerivedFields,
    /// Whether the backend already holds this month (update) or not (create).
    #[serde(default)]
    pub persisted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputField {
    AdministrationFee,
    RetroactiveCharge,
    ParkingCharge,
    PenaltyCharge,
    CommonAreaCharge,
    ExtraordinaryFee,
    OtherCharge,
    MonthlyInterestRate,
    PaidRetroactive,
    PaidExtraordinary,
    PaidPenalty,
    PaidParking,
    PaidCommonArea,
    PaidOther,
    PaidInterest,
    PaidCapital,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DerivedField {
    PriorCapitalDebt,
    TotalCapital,
    InterestAmountThisMonth,
    AccumulatedInterest,
    TotalInterest,
    Capital,
    TotalPaid,
    TotalDue,
    OutstandingBalance,
}

// --

impl MonthlyRecordInputs {
    /// All-zero inputs with no rate override and no payment.
    pub fn new(month: Month) -> Self {
        Self {
            month,
            administration_fee: Decimal::ZERO,
            retroactive_charge: Decimal::ZERO,
            parking_charge: Decimal::ZERO,
            penalty_charge: Decimal::ZERO,
            common_area_charge: Decimal::ZERO,
            extraordinary_fee: Decimal::ZERO,
            other_charge: Decimal::ZERO,
            monthly_interest_rate: None,
            other_interest_charge: Decimal::ZERO,
            paid_retroactive: Decimal::ZERO,
            paid_extraordinary: Decimal::ZERO,
            paid_penalty: Decimal::ZERO,
            paid_parking: Decimal::ZERO,
            paid_common_area: Decimal::ZERO,
            paid_other: Decimal::ZERO,
            paid_interest: Decimal::ZERO,
            paid_capital: Decimal::ZERO,
            payment_date: None,
        }
    }

    /// Sum of the payment fields, saturating at the `Decimal` bounds.
    pub fn payments_total(&self) -> Decimal {
        [
            self.paid_retroactive,
            self.paid_extraordinary,
            self.paid_penalty,
            self.paid_parking,
            self.paid_common_area,
            self.paid_other,
            self.paid_interest,
            self.paid_capital,
        ]
        .into_iter()
        .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Resets every payment field and the payment date.
    pub fn clear_payment(&mut self) {
        self.paid_retroactive = Decimal::ZERO;
        self.paid_extraordinary = Decimal::ZERO;
        self.paid_penalty = Decimal::ZERO;
        self.paid_parking = Decimal::ZERO;
        self.paid_common_area = Decimal::ZERO;
        self.paid_other = Decimal::ZERO;
        self.paid_interest = Decimal::ZERO;
        self.paid_capital = Decimal::ZERO;
        self.payment_date = None;
    }

    /// Sets a monetary field, or the rate override (`Some`) for
    /// `MonthlyInterestRate`.
    pub fn set(&mut self, field: InputField, value: Decimal) {
        match field {
            InputField::MonthlyInterestRate => self.monthly_interest_rate = Some(value),
            _ => {
                if let Some(slot) = self.slot_mut(field) {
                    *slot = value;
                }
            }
        }
    }

    fn slot_mut(&mut self, field: InputField) -> Option<&mut Decimal> {
        Some(match field {
            InputField::AdministrationFee => &mut self.administration_fee,
            InputField::RetroactiveCharge => &mut self.retroactive_charge,
            InputField::ParkingCharge => &mut self.parking_charge,
            InputField::PenaltyCharge => &mut self.penalty_charge,
            InputField::CommonAreaCharge => &mut self.common_area_charge,
            InputField::ExtraordinaryFee => &mut self.extraordinary_fee,
            InputField::OtherCharge => &mut self.other_charge,
            InputField::MonthlyInterestRate => return None,
            InputField::PaidRetroactive => &mut self.paid_retroactive,
            InputField::PaidExtraordinary => &mut self.paid_extraordinary,
            InputField::PaidPenalty => &mut self.paid_penalty,
            InputField::PaidParking => &mut self.paid_parking,
            InputField::PaidCommonArea => &mut self.paid_common_area,
            InputField::PaidOther => &mut self.paid_other,
            InputField::PaidInterest => &mut self.paid_interest,
            InputField::PaidCapital => &mut self.paid_capital,
        })
    }
}

impl InputField {
    /// camelCase name used by form payloads.
    pub fn key(&self) -> &'static str {
        match self {
            InputField::AdministrationFee => "administrationFee",
            InputField::RetroactiveCharge => "retroactiveCharge",
            InputField::ParkingCharge => "parkingCharge",
            InputField::PenaltyCharge => "penaltyCharge",
            InputField::CommonAreaCharge => "commonAreaCharge",
            InputField::ExtraordinaryFee => "extraordinaryFee",
            InputField::OtherCharge => "otherCharge",
            InputField::MonthlyInterestRate => "monthlyInterestRate",
            InputField::PaidRetroactive => "paidRetroactive",
            InputField::PaidExtraordinary => "paidExtraordinary",
            InputField::PaidPenalty => "paidPenalty",
            InputField::PaidParking => "paidParking",
            InputField::PaidCommonArea => "paidCommonArea",
            InputField::PaidOther => "paidOther",
            InputField::PaidInterest => "paidInterest",
            InputField::PaidCapital => "paidCapital",
        }
    }

    pub fn all() -> impl Iterator<Item = InputField> {
        [
            InputField::AdministrationFee,
            InputField::RetroactiveCharge,
            InputField::ParkingCharge,
            InputField::PenaltyCharge,
            InputField::CommonAreaCharge,
            InputField::ExtraordinaryFee,
            InputField::OtherCharge,
            InputField::MonthlyInterestRate,
            InputField::PaidRetroactive,
            InputField::PaidExtraordinary,
            InputField::PaidPenalty,
            InputField::PaidParking,
            InputField::PaidCommonArea,
            InputField::PaidOther,
            InputField::PaidInterest,
            InputField::PaidCapital,
        ]
        .into_iter()
    }

    pub fn from_key(key: &str) -> Option<InputField> {
        Self::all().find(|f| f.key() == key)
    }

    pub fn is_rate(&self) -> bool {
        matches!(self, InputField::MonthlyInterestRate)
    }
}

impl DerivedFields {
    pub fn get(&self, field: DerivedField) -> Decimal {
        match field {
            DerivedField::PriorCapitalDebt => self.prior_capital_debt,
            DerivedField::TotalCapital => self.total_capital,
            DerivedField::InterestAmountThisMonth => self.interest_amount_this_month,
            DerivedField::AccumulatedInterest => self.accumulated_interest,
            DerivedField::TotalInterest => self.total_interest,
            DerivedField::Capital => self.capital,
            DerivedField::TotalPaid => self.total_paid,
            DerivedField::TotalDue => self.total_due,
            DerivedField::OutstandingBalance => self.outstanding_balance,
        }
    }
}

impl DerivedField {
    pub fn all() -> impl Iterator<Item = DerivedField> {
        [
            DerivedField::PriorCapitalDebt,
            DerivedField::TotalCapital,
            DerivedField::InterestAmountThisMonth,
            DerivedField::AccumulatedInterest,
            DerivedField::TotalInterest,
            DerivedField::Capital,
            DerivedField::TotalPaid,
            DerivedField::TotalDue,
            DerivedField::OutstandingBalance,
        ]
        .into_iter()
    }
}

impl MonthlyRecord {
    pub fn month(&self) -> Month {
        self.inputs.month
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_field_accessors() {
        let mut inputs = MonthlyRecordInputs::new(Month::March);
        inputs.set(InputField::ParkingCharge, dec!(45000));
        inputs.set(InputField::MonthlyInterestRate, dec!(0.015));
        assert_eq!(inputs.parking_charge, dec!(45000));
        assert_eq!(inputs.monthly_interest_rate, Some(dec!(0.015)));
    }

    #[test]
    fn test_clear_payment() {
        let mut inputs = MonthlyRecordInputs::new(Month::May);
        inputs.paid_capital = dec!(100);
        inputs.paid_interest = dec!(5);
        inputs.payment_date = NaiveDate::from_ymd_opt(2024, 5, 10);
        assert_eq!(inputs.payments_total(), dec!(105));
        inputs.clear_payment();
        assert_eq!(inputs.payments_total(), Decimal::ZERO);
        assert_eq!(inputs.payment_date, None);
    }

    #[test]
    fn test_input_field_keys_round_trip() {
        for field in InputField::all() {
            assert_eq!(InputField::from_key(field.key()), Some(field));
        }
        assert_eq!(InputField::from_key("capital"), None);
    }
}
