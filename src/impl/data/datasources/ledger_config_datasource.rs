use async_trait::async_trait;
use fractic_server_error::ServerError;
use ron::from_str;

use crate::{
    data::models::ledger_config_model::LedgerConfigModel,
    entities::LedgerConfig,
    errors::{InvalidRon, ReadError},
};

#[async_trait]
pub(crate) trait LedgerConfigDatasource: Send + Sync {
    fn from_string(&self, s: &str) -> Result<LedgerConfig, ServerError>;

    async fn from_file<P>(&self, path: P) -> Result<LedgerConfig, ServerError>
    where
        P: AsRef<std::path::Path> + Send;
}

pub(crate) struct LedgerConfigDatasourceImpl;

impl LedgerConfigDatasourceImpl {
    pub(crate) fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LedgerConfigDatasource for LedgerConfigDatasourceImpl {
    fn from_string(&self, s: &str) -> Result<LedgerConfig, ServerError> {
        let model: LedgerConfigModel =
            from_str(s).map_err(|e| InvalidRon::with_debug("LedgerConfig", &e))?;
        model.into_config()
    }

    async fn from_file<P>(&self, path: P) -> Result<LedgerConfig, ServerError>
    where
        P: AsRef<std::path::Path> + Send,
    {
        self.from_string(
            &tokio::fs::read_to_string(path)
                .await
                .map_err(|e| ReadError::with_debug(&e))?,
        )
    }
}
