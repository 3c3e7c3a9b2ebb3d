use async_trait::async_trait;
use chrono::NaiveDate;
use fractic_server_error::ServerError;
use futures::stream::{self, StreamExt};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::{
    data::{
        models::form_inputs_model::{apply_raw, FormInputsModel},
        repositories::ledger_repository_impl::LedgerRepositoryImpl,
    },
    domain::{
        logic::{
            change_tracker::{changed_months, diff_records},
            ledger_engine::LedgerEngine,
            payment_allocator::PaymentAllocator,
        },
        repositories::ledger_repository::LedgerRepository,
    },
    entities::{
        CascadeOutcome, DefaultInputsTable, InputField, LedgerApi, LedgerKey, Month,
        MonthlyRecord, MonthlyRecordInputs, PaymentAllocation, SaveFailure,
    },
};

/// Edit → recalculate → persist → report, seen by the UI as one step.
#[async_trait]
pub(crate) trait CascadeUsecase: Send + Sync {
    async fn load_year(&self, key: &LedgerKey) -> Result<Vec<MonthlyRecord>, ServerError>;

    async fn edit_field(
        &self,
        key: &LedgerKey,
        records: &[MonthlyRecord],
        month: Month,
        field: InputField,
        raw_value: &str,
    ) -> Result<CascadeOutcome, ServerError>;

    async fn edit_month(
        &self,
        key: &LedgerKey,
        records: &[MonthlyRecord],
        month: Month,
        form_json: &str,
    ) -> Result<CascadeOutcome, ServerError>;

    async fn apply_payment(
        &self,
        key: &LedgerKey,
        records: &[MonthlyRecord],
        month: Month,
        amount: Decimal,
        payment_date: Option<NaiveDate>,
    ) -> Result<(PaymentAllocation, CascadeOutcome), ServerError>;

    async fn remove_payment(
        &self,
        key: &LedgerKey,
        records: &[MonthlyRecord],
        month: Month,
    ) -> Result<CascadeOutcome, ServerError>;
}

pub(crate) struct CascadeUsecaseImpl<R: LedgerRepository> {
    repository: R,
    engine: LedgerEngine,
    allocator: PaymentAllocator,
}

#[async_trait]
impl<R: LedgerRepository> CascadeUsecase for CascadeUsecaseImpl<R> {
    async fn load_year(&self, key: &LedgerKey) -> Result<Vec<MonthlyRecord>, ServerError> {
        let loaded = self.repository.load_year(key).await?;
        let inputs: Vec<MonthlyRecordInputs> = loaded.iter().map(|r| r.inputs.clone()).collect();
        let mut records = self.engine.recalculate_year(&inputs)?;
        for record in records.iter_mut() {
            record.persisted = loaded
                .iter()
                .any(|l| l.month() == record.month() && l.persisted);
        }
        info!(
            property = %key.property_id,
            year = key.year,
            stored = loaded.iter().filter(|r| r.persisted).count(),
            "ledger year loaded"
        );
        Ok(records)
    }

    async fn edit_field(
        &self,
        key: &LedgerKey,
        records: &[MonthlyRecord],
        month: Month,
        field: InputField,
        raw_value: &str,
    ) -> Result<CascadeOutcome, ServerError> {
        let mut edited = records.to_vec();
        apply_raw(&mut record_mut(&mut edited, month).inputs, field, raw_value);
        self.cascade(key, records, edited, month).await
    }

    async fn edit_month(
        &self,
        key: &LedgerKey,
        records: &[MonthlyRecord],
        month: Month,
        form_json: &str,
    ) -> Result<CascadeOutcome, ServerError> {
        let form = FormInputsModel::from_json(form_json)?;
        let mut edited = records.to_vec();
        form.apply_to(&mut record_mut(&mut edited, month).inputs)?;
        self.cascade(key, records, edited, month).await
    }

    async fn apply_payment(
        &self,
        key: &LedgerKey,
        records: &[MonthlyRecord],
        month: Month,
        amount: Decimal,
        payment_date: Option<NaiveDate>,
    ) -> Result<(PaymentAllocation, CascadeOutcome), ServerError> {
        // Balances come from an up-to-date view of the month; they do not
        // depend on the month's own payment fields.
        let mut edited = self.engine.recalculate_from(month, records)?;
        let target = record_mut(&mut edited, month);
        let allocation = self.allocator.allocate_for_month(amount, target)?;
        allocation.apply_to(&mut target.inputs);
        target.inputs.payment_date = payment_date;
        let outcome = self.cascade(key, records, edited, month).await?;
        Ok((allocation, outcome))
    }

    async fn remove_payment(
        &self,
        key: &LedgerKey,
        records: &[MonthlyRecord],
        month: Month,
    ) -> Result<CascadeOutcome, ServerError> {
        let mut edited = records.to_vec();
        record_mut(&mut edited, month).inputs.clear_payment();
        self.cascade(key, records, edited, month).await
    }
}

impl<R: LedgerRepository> CascadeUsecaseImpl<R> {
    /// Recalculates from `month` onwards, then saves every month that changed
    /// in ascending order. A failed save is recorded and the remaining months
    /// are still attempted.
    async fn cascade(
        &self,
        key: &LedgerKey,
        old: &[MonthlyRecord],
        edited: Vec<MonthlyRecord>,
        month: Month,
    ) -> Result<CascadeOutcome, ServerError> {
        let records = self.engine.recalculate_from(month, &edited)?;
        let changed_cells = diff_records(old, &records);
        let to_save = changed_months(old, &records);

        let results: Vec<(Month, Result<(), ServerError>)> = stream::iter(
            to_save
                .into_iter()
                .filter_map(|m| records.iter().find(|r| r.month() == m)),
        )
        .then(move |record| async move {
            (
                record.month(),
                self.repository.save_month(key, record).await,
            )
        })
        .collect()
        .await;

        let mut saved_months = Vec::new();
        let mut failures = Vec::new();
        for (m, result) in results {
            match result {
                Ok(()) => saved_months.push(m),
                Err(error) => {
                    warn!(
                        property = %key.property_id,
                        year = key.year,
                        month = %m,
                        error = ?error,
                        "failed to save ledger month"
                    );
                    failures.push(SaveFailure { month: m, error });
                }
            }
        }

        let records: Vec<MonthlyRecord> = records
            .into_iter()
            .map(|r| MonthlyRecord {
                persisted: r.persisted || saved_months.contains(&r.month()),
                ..r
            })
            .collect();

        info!(
            property = %key.property_id,
            year = key.year,
            %month,
            changed_cells = changed_cells.len(),
            saved = saved_months.len(),
            failed = failures.len(),
            "ledger cascade applied"
        );

        Ok(CascadeOutcome {
            records,
            changed_cells,
            saved_months,
            failures,
        })
    }
}

impl<A: LedgerApi> CascadeUsecaseImpl<LedgerRepositoryImpl<A>> {
    pub(crate) fn new(
        api: A,
        defaults: Vec<DefaultInputsTable>,
        fallback_interest_rate: Decimal,
    ) -> Self {
        CascadeUsecaseImpl {
            repository: LedgerRepositoryImpl::new(api, defaults),
            engine: LedgerEngine::new(fallback_interest_rate),
            allocator: PaymentAllocator::new(),
        }
    }

    pub(crate) fn add_defaults(&mut self, tables: Vec<DefaultInputsTable>) {
        self.repository.add_defaults(tables);
    }
}

/// The record for `month`, inserted with default inputs (in month order) if
/// the year does not have it yet.
fn record_mut(records: &mut Vec<MonthlyRecord>, month: Month) -> &mut MonthlyRecord {
    let index = match records.iter().position(|r| r.month() >= month) {
        Some(i) if records[i].month() == month => i,
        Some(i) => {
            records.insert(i, default_record(month));
            i
        }
        None => {
            records.push(default_record(month));
            records.len() - 1
        }
    };
    &mut records[index]
}

fn default_record(month: Month) -> MonthlyRecord {
    MonthlyRecord {
        inputs: MonthlyRecordInputs::new(month),
        derived: Default::default(),
        persisted: false,
    }
}
