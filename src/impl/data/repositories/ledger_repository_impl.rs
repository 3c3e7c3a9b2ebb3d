use std::collections::BTreeMap;

use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::{
    domain::repositories::ledger_repository::LedgerRepository,
    entities::{DefaultInputsTable, DerivedFields, LedgerApi, LedgerKey, Month, MonthlyRecord},
    errors::PersistenceFailed,
};

pub(crate) struct LedgerRepositoryImpl<A: LedgerApi> {
    api: A,
    defaults: Vec<DefaultInputsTable>,
}

impl<A: LedgerApi> LedgerRepositoryImpl<A> {
    pub(crate) fn new(api: A, defaults: Vec<DefaultInputsTable>) -> Self {
        Self { api, defaults }
    }

    pub(crate) fn add_defaults(&mut self, tables: Vec<DefaultInputsTable>) {
        self.defaults.extend(tables);
    }

    fn defaults_for(&self, year: i32) -> Option<&DefaultInputsTable> {
        // Later tables override earlier ones for the same year.
        self.defaults.iter().rev().find(|t| t.year == year)
    }
}

#[async_trait]
impl<A: LedgerApi> LedgerRepository for LedgerRepositoryImpl<A> {
    async fn load_year(&self, key: &LedgerKey) -> Result<Vec<MonthlyRecord>, ServerError> {
        let stored: BTreeMap<Month, MonthlyRecord> = self
            .api
            .list_year(key)
            .await?
            .into_iter()
            .map(|r| {
                (
                    r.month(),
                    MonthlyRecord {
                        persisted: true,
                        ..r
                    },
                )
            })
            .collect();
        let defaults = self.defaults_for(key.year);

        Ok(Month::all()
            .filter_map(|month| {
                stored.get(&month).cloned().or_else(|| {
                    defaults
                        .and_then(|t| t.get(month))
                        .map(|inputs| MonthlyRecord {
                            inputs: inputs.clone(),
                            derived: DerivedFields::default(),
                            persisted: false,
                        })
                })
            })
            .collect())
    }

    async fn save_month(
        &self,
        key: &LedgerKey,
        record: &MonthlyRecord,
    ) -> Result<(), ServerError> {
        let result = if record.persisted {
            self.api.update(key, record).await
        } else {
            self.api.create(key, record).await
        };
        result.map_err(|e| PersistenceFailed::with_debug(&record.month(), &e))
    }
}
