use chrono::NaiveDate;
use fractic_server_error::ServerError;
use rust_decimal::Decimal;

use crate::{
    data::{
        datasources::{
            default_inputs_csv_datasource::{
                DefaultInputsCsvDatasource as _, DefaultInputsCsvDatasourceImpl,
            },
            ledger_config_datasource::{LedgerConfigDatasource as _, LedgerConfigDatasourceImpl},
        },
        models::monetary_input_model::{MonetaryInputModel, RateInputModel},
        repositories::ledger_repository_impl::LedgerRepositoryImpl,
    },
    domain::{
        logic::{
            change_tracker::diff_records, ledger_engine::LedgerEngine,
            payment_allocator::PaymentAllocator,
        },
        usecases::cascade_usecase::{CascadeUsecase as _, CascadeUsecaseImpl},
    },
    entities::{
        CascadeOutcome, ChangedCell, InputField, LedgerApi, LedgerConfig, LedgerKey, Month,
        MonthlyRecord, MonthlyRecordInputs, OutstandingBalances, PaymentAllocation,
    },
    presentation::ledger_printer::LedgerPrinter,
};

/// Coerces a raw form value into an amount: blank, `null`, `NaN` and other
/// unparsable text become zero.
pub fn parse_monetary_input(raw: &str) -> Decimal {
    MonetaryInputModel::parse(raw).0
}

/// Coerces a raw rate value. Blank or unparsable text means "not set".
pub fn parse_rate_input(raw: &str) -> Option<Decimal> {
    RateInputModel::parse(raw).0
}

pub struct CondoLedgerUtil<A: LedgerApi> {
    config: LedgerConfig,
    cascade_usecase: CascadeUsecaseImpl<LedgerRepositoryImpl<A>>,
    printer: LedgerPrinter,
}

impl<A: LedgerApi> CondoLedgerUtil<A> {
    pub fn new(api: A, config: LedgerConfig) -> Self {
        Self {
            cascade_usecase: CascadeUsecaseImpl::new(
                api,
                Vec::new(),
                config.fallback_interest_rate,
            ),
            printer: LedgerPrinter::new(config.currency),
            config,
        }
    }

    /// Builds from a RON configuration, e.g.
    /// `(fallback_interest_rate: "0.02", currency: "COP")`.
    pub fn from_config_string(api: A, config_ron: &str) -> Result<Self, ServerError> {
        let config = LedgerConfigDatasourceImpl::new().from_string(config_ron)?;
        Ok(Self::new(api, config))
    }

    pub async fn from_config_file<P>(api: A, path: P) -> Result<Self, ServerError>
    where
        P: AsRef<std::path::Path> + Send,
    {
        let config = LedgerConfigDatasourceImpl::new().from_file(path).await?;
        Ok(Self::new(api, config))
    }

    /// Registers default inputs (CSV) used for months the backend does not
    /// hold yet.
    pub fn with_default_inputs(mut self, defaults_csv: &str) -> Result<Self, ServerError> {
        let tables = DefaultInputsCsvDatasourceImpl::new().from_string(defaults_csv)?;
        self.cascade_usecase.add_defaults(tables);
        Ok(self)
    }

    pub async fn with_default_inputs_file<P>(mut self, path: P) -> Result<Self, ServerError>
    where
        P: AsRef<std::path::Path> + Send,
    {
        let tables = DefaultInputsCsvDatasourceImpl::new().from_file(path).await?;
        self.cascade_usecase.add_defaults(tables);
        Ok(self)
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // Pure computations.
    // ---

    /// Derives all twelve months from the given inputs. `interest_rate` only
    /// applies to months without their own rate.
    pub fn recalculate_year(
        &self,
        inputs: &[MonthlyRecordInputs],
        interest_rate: Decimal,
    ) -> Result<Vec<MonthlyRecord>, ServerError> {
        LedgerEngine::new(interest_rate).recalculate_year(inputs)
    }

    /// Recomputes `month` and every later month; earlier months are returned
    /// unchanged.
    pub fn recalculate_from(
        &self,
        month: Month,
        records: &[MonthlyRecord],
        interest_rate: Decimal,
    ) -> Result<Vec<MonthlyRecord>, ServerError> {
        LedgerEngine::new(interest_rate).recalculate_from(month, records)
    }

    pub fn allocate(
        &self,
        total_payment: Decimal,
        balances: &OutstandingBalances,
    ) -> Result<PaymentAllocation, ServerError> {
        PaymentAllocator::new().allocate(total_payment, balances)
    }

    pub fn changed_cells(&self, old: &[MonthlyRecord], new: &[MonthlyRecord]) -> Vec<ChangedCell> {
        diff_records(old, new)
    }

    pub fn print_year(&self, key: &LedgerKey, records: &[MonthlyRecord]) -> String {
        self.printer.print_year(key, records)
    }

    /// Breakdown of a payment by category, in minor units.
    pub fn print_allocation(&self, month: Month, allocation: &PaymentAllocation) -> String {
        self.printer.print_allocation(month, allocation)
    }

    // Cascading operations (recalculate and persist).
    // ---

    pub async fn load_year(&self, key: &LedgerKey) -> Result<Vec<MonthlyRecord>, ServerError> {
        self.cascade_usecase.load_year(key).await
    }

    pub async fn edit_field(
        &self,
        key: &LedgerKey,
        records: &[MonthlyRecord],
        month: Month,
        field: InputField,
        raw_value: &str,
    ) -> Result<CascadeOutcome, ServerError> {
        self.cascade_usecase
            .edit_field(key, records, month, field, raw_value)
            .await
    }

    /// Applies a whole form (JSON object of raw values keyed by camelCase
    /// field name) to one month.
    pub async fn edit_month(
        &self,
        key: &LedgerKey,
        records: &[MonthlyRecord],
        month: Month,
        form_json: &str,
    ) -> Result<CascadeOutcome, ServerError> {
        self.cascade_usecase
            .edit_month(key, records, month, form_json)
            .await
    }

    /// Splits `amount` across the month's balances and records it as the
    /// month's payment, replacing any previous one.
    pub async fn apply_payment(
        &self,
        key: &LedgerKey,
        records: &[MonthlyRecord],
        month: Month,
        amount: Decimal,
        payment_date: Option<NaiveDate>,
    ) -> Result<(PaymentAllocation, CascadeOutcome), ServerError> {
        self.cascade_usecase
            .apply_payment(key, records, month, amount, payment_date)
            .await
    }

    pub async fn remove_payment(
        &self,
        key: &LedgerKey,
        records: &[MonthlyRecord],
        month: Month,
    ) -> Result<CascadeOutcome, ServerError> {
        self.cascade_usecase
            .remove_payment(key, records, month)
            .await
    }
}
