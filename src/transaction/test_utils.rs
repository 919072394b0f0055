//! An in-memory transaction store for testing.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use rusqlite::Connection;

use crate::Error;

use super::{LocalMirror, Transaction, TransactionService, store::TransactionStore};

/// A service over `store` with a fresh in-memory mirror.
pub(crate) fn get_test_service(
    store: FakeTransactionStore,
) -> TransactionService<FakeTransactionStore> {
    let connection = Connection::open_in_memory().unwrap();
    let mirror = LocalMirror::new(Arc::new(Mutex::new(connection))).unwrap();

    TransactionService::new(store, mirror)
}

/// An in-memory [TransactionStore] whose failure modes can be toggled.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeTransactionStore {
    records: Arc<Mutex<Vec<Transaction>>>,
    next_id: Arc<AtomicU64>,
    fail_list: Arc<AtomicBool>,
}

impl FakeTransactionStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_records(records: Vec<Transaction>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            ..Self::default()
        }
    }

    /// When set, `list` fails with a store error.
    pub(crate) fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    /// The raw stored records, in insertion order.
    pub(crate) fn records(&self) -> Vec<Transaction> {
        self.records.lock().unwrap().clone()
    }
}

impl TransactionStore for FakeTransactionStore {
    async fn list(&self) -> Result<Vec<Transaction>, Error> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(Error::StoreError("the fake store is offline".to_owned()));
        }

        let mut records = self.records.lock().unwrap().clone();
        // RFC 3339 dates in the same offset sort lexicographically.
        records.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(records)
    }

    async fn create(&self, transaction: Transaction) -> Result<Transaction, Error> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;

        let stored = Transaction {
            id: format!("fake-{id}"),
            ..transaction
        };
        self.records.lock().unwrap().push(stored.clone());

        Ok(stored)
    }

    async fn update(&self, transaction: &Transaction) -> Result<(), Error> {
        let mut records = self.records.lock().unwrap();

        match records.iter_mut().find(|record| record.id == transaction.id) {
            Some(record) => {
                *record = transaction.clone();
                Ok(())
            }
            None => Err(Error::UpdateMissingTransaction),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        let mut records = self.records.lock().unwrap();

        match records.iter().position(|record| record.id == id) {
            Some(index) => {
                records.remove(index);
                Ok(())
            }
            None => Err(Error::DeleteMissingTransaction),
        }
    }
}
