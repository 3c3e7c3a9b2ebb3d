use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::entities::{LedgerKey, MonthlyRecord};

#[async_trait]
pub(crate) trait LedgerRepository: Send + Sync {
    /// Stored records of the year, completed with default inputs for months
    /// the backend does not hold. Derived values may be stale; callers
    /// recalculate.
    async fn load_year(&self, key: &LedgerKey) -> Result<Vec<MonthlyRecord>, ServerError>;

    /// Creates the month if it was never persisted, updates it otherwise.
    async fn save_month(&self, key: &LedgerKey, record: &MonthlyRecord)
        -> Result<(), ServerError>;
}
