use async_trait::async_trait;
use fractic_server_error::ServerError;

use super::{ledger_key::LedgerKey, monthly_record::MonthlyRecord};

/// Backend holding the persisted monthly records, implemented by the host
/// application (typically over REST: `GET` list-by-year, `POST` create, `PUT`
/// update). Records are keyed by `(property_id, year, month)`.
#[async_trait]
pub trait LedgerApi: Send + Sync {
    async fn list_year(&self, key: &LedgerKey) -> Result<Vec<MonthlyRecord>, ServerError>;

    async fn create(&self, key: &LedgerKey, record: &MonthlyRecord) -> Result<(), ServerError>;

    async fn update(&self, key: &LedgerKey, record: &MonthlyRecord) -> Result<(), ServerError>;
}
