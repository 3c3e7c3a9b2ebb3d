use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use fractic_server_error::{CriticalError, ServerError};

use crate::{
    entities::{LedgerApi, LedgerKey, Month, MonthlyRecord},
    errors::{RecordAlreadyExists, RecordNotFound},
};

type Store = BTreeMap<(LedgerKey, Month), MonthlyRecord>;

/// `LedgerApi` backed by process memory. Behaves like the REST backend:
/// `create` rejects existing months and `update` rejects missing ones.
#[derive(Default)]
pub struct InMemoryLedgerApi {
    records: Mutex<Store>,
}

impl InMemoryLedgerApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates the store, as if the records had been created earlier.
    pub fn with_records(key: &LedgerKey, records: Vec<MonthlyRecord>) -> Self {
        let store = records
            .into_iter()
            .map(|record| {
                (
                    (key.clone(), record.month()),
                    MonthlyRecord {
                        persisted: true,
                        ..record
                    },
                )
            })
            .collect();
        Self {
            records: Mutex::new(store),
        }
    }

    /// Snapshot of what is stored for `key`, in month order.
    pub fn stored(&self, key: &LedgerKey) -> Result<Vec<MonthlyRecord>, ServerError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|((k, _), _)| k == key)
            .map(|(_, r)| r.clone())
            .collect())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, ServerError> {
        self.records.lock().map_err(|e| {
            CriticalError::with_debug("in-memory ledger store poisoned", &e.to_string())
        })
    }
}

#[async_trait]
impl LedgerApi for InMemoryLedgerApi {
    async fn list_year(&self, key: &LedgerKey) -> Result<Vec<MonthlyRecord>, ServerError> {
        self.stored(key)
    }

    async fn create(&self, key: &LedgerKey, record: &MonthlyRecord) -> Result<(), ServerError> {
        let mut store = self.lock()?;
        let id = (key.clone(), record.month());
        if store.contains_key(&id) {
            return Err(RecordAlreadyExists::new(&record.month(), key.year));
        }
        store.insert(
            id,
            MonthlyRecord {
                persisted: true,
                ..record.clone()
            },
        );
        Ok(())
    }

    async fn update(&self, key: &LedgerKey, record: &MonthlyRecord) -> Result<(), ServerError> {
        let mut store = self.lock()?;
        match store.get_mut(&(key.clone(), record.month())) {
            Some(existing) => {
                *existing = MonthlyRecord {
                    persisted: true,
                    ..record.clone()
                };
                Ok(())
            }
            None => Err(RecordNotFound::new(&record.month(), key.year)),
        }
    }
}
