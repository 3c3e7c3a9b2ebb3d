use iso_currency::Currency;
use rust_decimal::Decimal;

use crate::entities::{LedgerKey, Month, MonthlyRecord, PaymentAllocation, PaymentCategory};

use super::utils::format_amount;

const COLUMNS: [&str; 8] = [
    "Prior debt",
    "Capital",
    "Interest",
    "Acc. interest",
    "Total due",
    "Paid",
    "Balance",
    "Paid on",
];

pub(crate) struct LedgerPrinter {
    currency: Currency,
}

impl LedgerPrinter {
    pub(crate) fn new(currency: Currency) -> Self {
        Self { currency }
    }

    /// Fixed-width text rendering of a recalculated year, one row per month.
    pub(crate) fn print_year(&self, key: &LedgerKey, records: &[MonthlyRecord]) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "; --- Ledger {} / {} {}\n\n",
            key.property_id,
            key.year,
            "-".repeat(60usize.saturating_sub(key.property_id.0.len()))
        ));
        self.print_header(&mut output);
        for record in records {
            self.print_month(&mut output, record);
        }
        output.push('\n');
        self.print_summary(&mut output, records);

        output
    }

    fn print_header(&self, output: &mut String) {
        output.push_str(&format!("{:<10}", "Month"));
        for column in COLUMNS {
            output.push_str(&format!(" {:>16}", column));
        }
        output.push('\n');
    }

    fn print_month(&self, output: &mut String, record: &MonthlyRecord) {
        let d = &record.derived;
        output.push_str(&format!("{:<10}", record.month().name()));
        for amount in [
            d.prior_capital_debt,
            d.total_capital,
            d.interest_amount_this_month,
            d.accumulated_interest,
            d.total_due,
            d.total_paid,
            d.outstanding_balance,
        ] {
            output.push_str(&format!(" {:>16}", self.format_amount(amount)));
        }
        output.push_str(&format!(
            " {:>16}",
            record
                .inputs
                .payment_date
                .map(|date| date.to_string())
                .unwrap_or_default()
        ));
        output.push('\n');
    }

    fn print_summary(&self, output: &mut String, records: &[MonthlyRecord]) {
        let total_paid = records
            .iter()
            .fold(Decimal::ZERO, |total, r| total.saturating_add(r.derived.total_paid));
        output.push_str(&format!(
            "{:<27} {:>16}\n",
            "Paid during year",
            self.format_amount(total_paid)
        ));
        if let Some(last) = records.last() {
            output.push_str(&format!(
                "{:<27} {:>16}\n",
                format!("Balance after {}", last.month().name()),
                self.format_amount(last.derived.outstanding_balance)
            ));
        }
    }

    /// Receipt-style breakdown of one payment. Allocations keep minor units,
    /// unlike the ledger table.
    pub(crate) fn print_allocation(&self, month: Month, allocation: &PaymentAllocation) -> String {
        let mut output = format!("; Payment for {}\n", month.name());
        for (category, amount) in allocation.iter() {
            output.push_str(&format!(
                "    {:<16} {:>20}\n",
                category_label(category),
                format_amount(amount, self.currency, false)
            ));
        }
        output.push_str(&format!(
            "    {:<16} {:>20}\n",
            "Total",
            format_amount(allocation.total(), self.currency, false)
        ));
        output
    }

    fn format_amount(&self, amount: Decimal) -> String {
        format_amount(amount, self.currency, true)
    }
}

fn category_label(category: PaymentCategory) -> &'static str {
    match category {
        PaymentCategory::Extraordinary => "Extraordinary",
        PaymentCategory::Penalty => "Penalty",
        PaymentCategory::Parking => "Parking",
        PaymentCategory::CommonArea => "Common area",
        PaymentCategory::Other => "Other",
        PaymentCategory::Interest => "Interest",
        PaymentCategory::Retroactive => "Retroactive",
        PaymentCategory::Capital => "Capital",
    }
}
