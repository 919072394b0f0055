//! The transaction service: remote CRUD plus the local mirror and the
//! change-notification broadcast.

use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tokio::sync::broadcast;

use crate::Error;

use super::{LocalMirror, Transaction, store::TransactionStore};

/// How many unconsumed change notifications a subscriber may lag behind by.
///
/// Notifications carry no payload, so a lagged subscriber loses nothing: a
/// single re-fetch catches it up.
const CHANGE_CHANNEL_CAPACITY: usize = 16;

/// Durable CRUD for [Transaction] records with a best-effort local mirror.
///
/// Every successful mutation emits one zero-payload change notification.
/// Observers should treat a notification as "the transaction set may have
/// changed" and re-issue [list](TransactionService::list); rapid mutations
/// may coalesce into redundant but harmless re-fetches.
#[derive(Debug, Clone)]
pub struct TransactionService<S> {
    store: S,
    mirror: LocalMirror,
    changed: broadcast::Sender<()>,
}

impl<S> TransactionService<S>
where
    S: TransactionStore,
{
    /// Create a service over the remote `store` and local `mirror`.
    pub fn new(store: S, mirror: LocalMirror) -> Self {
        let (changed, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);

        Self {
            store,
            mirror,
            changed,
        }
    }

    /// Subscribe to change notifications.
    ///
    /// The returned receiver yields one `()` per successful mutation.
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.changed.subscribe()
    }

    /// Retrieve all transactions, ordered by date with the newest first.
    ///
    /// Retrieval failures are deliberately swallowed: the error is logged
    /// and an empty list is returned, so callers cannot distinguish "no
    /// data" from "could not reach the store" without separate diagnostics.
    pub async fn list(&self) -> Vec<Transaction> {
        match self.store.list().await {
            Ok(transactions) => transactions,
            Err(error) => {
                tracing::error!("Error retrieving transactions: {error}");
                Vec::new()
            }
        }
    }

    /// Store a new transaction.
    ///
    /// Any client-supplied ID is discarded so the backing store can assign
    /// one, and the date is overwritten with the current time; the caller's
    /// date is not trusted for creation. On success the stored record is
    /// also prepended to the local mirror (best-effort, failures are logged
    /// and do not fail the create) and one change notification is emitted.
    ///
    /// # Errors
    /// Returns an error if the remote write fails. No record is left behind
    /// and no notification is emitted in that case.
    pub async fn create(&self, transaction: Transaction) -> Result<Transaction, Error> {
        let mut record = transaction;
        record.id = String::new();
        record.date = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|error| Error::StoreError(error.to_string()))?;

        let stored = self.store.create(record).await?;

        // Distinct code path from the remote write: the mirror is
        // best-effort and never fails the operation.
        if let Err(error) = self.mirror.write(&stored) {
            tracing::warn!("Error saving transaction to the local mirror: {error}");
        }

        self.notify_changed();

        Ok(stored)
    }

    /// Write every field except the ID to the existing record matching
    /// `transaction.id`, then emit one change notification.
    ///
    /// # Errors
    /// Returns [Error::UpdateMissingTransaction] if the record does not
    /// exist, or another error if the remote write fails.
    pub async fn update(&self, transaction: &Transaction) -> Result<(), Error> {
        self.store.update(transaction).await?;
        self.notify_changed();

        Ok(())
    }

    /// Permanently remove the record with the given `id`, then emit one
    /// change notification.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingTransaction] if the record does not
    /// exist, or another error if the remote delete fails.
    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        self.store.delete(id).await?;
        self.notify_changed();

        Ok(())
    }

    /// Read the local mirror, most-recent-first.
    ///
    /// Best-effort: failures are logged and read as an empty list. The
    /// mirror is never merged back into the remote store.
    pub fn read_mirror(&self) -> Vec<Transaction> {
        match self.mirror.read() {
            Ok(transactions) => transactions,
            Err(error) => {
                tracing::error!("Error reading the local mirror: {error}");
                Vec::new()
            }
        }
    }

    fn notify_changed(&self) {
        // send only fails when there are no subscribers, which is fine.
        let _ = self.changed.send(());
    }
}

#[cfg(test)]
mod service_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime, format_description::well_known::Rfc3339};
    use tokio::sync::broadcast::error::TryRecvError;

    use crate::{
        Error,
        transaction::{LocalMirror, Transaction, test_utils::FakeTransactionStore},
    };

    use super::TransactionService;

    fn get_test_service(store: FakeTransactionStore) -> TransactionService<FakeTransactionStore> {
        let connection = Connection::open_in_memory().unwrap();
        let mirror = LocalMirror::new(Arc::new(Mutex::new(connection))).unwrap();

        TransactionService::new(store, mirror)
    }

    fn transaction(id: &str, date: &str) -> Transaction {
        Transaction {
            id: id.to_owned(),
            giver: "Rahim".to_owned(),
            receiver: "Karim".to_owned(),
            amount: "120.50".to_owned(),
            date: date.to_owned(),
        }
    }

    #[tokio::test]
    async fn create_discards_client_id_and_date() {
        let service = get_test_service(FakeTransactionStore::new());
        let client_record = transaction("x", "1999-01-01T00:00:00Z");

        let stored = service.create(client_record).await.unwrap();

        assert_ne!(stored.id, "x");
        assert!(!stored.id.is_empty());

        let stored_date = OffsetDateTime::parse(&stored.date, &Rfc3339).unwrap();
        let delta = (OffsetDateTime::now_utc() - stored_date).abs();
        assert!(
            delta < Duration::seconds(1),
            "got stored date {stored_date}, want within one second of now"
        );
    }

    #[tokio::test]
    async fn create_preserves_fields_as_entered() {
        let service = get_test_service(FakeTransactionStore::new());
        let mut client_record = transaction("", "");
        // Unparseable amounts are still stored as-entered.
        client_record.amount = "about fifty".to_owned();

        let stored = service.create(client_record).await.unwrap();

        assert_eq!(stored.giver, "Rahim");
        assert_eq!(stored.receiver, "Karim");
        assert_eq!(stored.amount, "about fifty");
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let store = FakeTransactionStore::with_records(vec![
            transaction("a", "2025-01-03T00:00:00Z"),
            transaction("b", "2025-01-05T00:00:00Z"),
            transaction("c", "2025-01-04T00:00:00Z"),
        ]);
        let service = get_test_service(store);

        let transactions = service.list().await;

        assert_eq!(transactions.len(), 3);
        for pair in transactions.windows(2) {
            assert!(
                pair[0].date >= pair[1].date,
                "got {} before {}, want newest first",
                pair[0].date,
                pair[1].date
            );
        }
    }

    #[tokio::test]
    async fn list_swallows_retrieval_errors() {
        let store =
            FakeTransactionStore::with_records(vec![transaction("a", "2025-01-03T00:00:00Z")]);
        store.set_fail_list(true);
        let service = get_test_service(store);

        let transactions = service.list().await;

        assert_eq!(transactions, Vec::new());
    }

    #[tokio::test]
    async fn create_writes_local_mirror() {
        let service = get_test_service(FakeTransactionStore::new());

        let first = service.create(transaction("", "")).await.unwrap();
        let second = service.create(transaction("", "")).await.unwrap();

        let mirrored = service.read_mirror();
        let ids: Vec<&str> = mirrored.iter().map(|record| record.id.as_str()).collect();
        assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
    }

    #[tokio::test]
    async fn mirror_failure_does_not_fail_create() {
        let connection = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));
        let mirror = LocalMirror::new(connection.clone()).unwrap();
        connection
            .lock()
            .unwrap()
            .execute("DROP TABLE mirror", ())
            .unwrap();
        let store = FakeTransactionStore::new();
        let service = TransactionService::new(store.clone(), mirror);

        let result = service.create(transaction("", "")).await;

        assert!(result.is_ok());
        assert_eq!(store.records().len(), 1);
    }

    #[tokio::test]
    async fn each_mutation_notifies_exactly_once() {
        let service = get_test_service(FakeTransactionStore::new());
        let mut subscriber = service.subscribe();

        let stored = service.create(transaction("", "")).await.unwrap();
        assert_eq!(subscriber.try_recv(), Ok(()));
        assert_eq!(subscriber.try_recv(), Err(TryRecvError::Empty));

        service.update(&stored).await.unwrap();
        assert_eq!(subscriber.try_recv(), Ok(()));
        assert_eq!(subscriber.try_recv(), Err(TryRecvError::Empty));

        service.delete(&stored.id).await.unwrap();
        assert_eq!(subscriber.try_recv(), Ok(()));
        assert_eq!(subscriber.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn mutations_are_visible_to_a_subsequent_list() {
        let service = get_test_service(FakeTransactionStore::new());

        let stored = service.create(transaction("", "")).await.unwrap();
        assert!(
            service
                .list()
                .await
                .iter()
                .any(|record| record.id == stored.id)
        );

        service.delete(&stored.id).await.unwrap();
        assert!(
            service
                .list()
                .await
                .iter()
                .all(|record| record.id != stored.id)
        );
    }

    #[tokio::test]
    async fn update_missing_record_fails_without_side_effects() {
        let store =
            FakeTransactionStore::with_records(vec![transaction("a", "2025-01-03T00:00:00Z")]);
        let service = get_test_service(store.clone());
        let mut subscriber = service.subscribe();

        let result = service
            .update(&transaction("missing", "2025-01-04T00:00:00Z"))
            .await;

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
        assert_eq!(subscriber.try_recv(), Err(TryRecvError::Empty));
        assert_eq!(
            store.records(),
            vec![transaction("a", "2025-01-03T00:00:00Z")]
        );
    }

    #[tokio::test]
    async fn delete_missing_record_fails_without_side_effects() {
        let store =
            FakeTransactionStore::with_records(vec![transaction("a", "2025-01-03T00:00:00Z")]);
        let service = get_test_service(store.clone());
        let mut subscriber = service.subscribe();

        let result = service.delete("missing").await;

        assert_eq!(result, Err(Error::DeleteMissingTransaction));
        assert_eq!(subscriber.try_recv(), Err(TryRecvError::Empty));
        assert_eq!(store.records().len(), 1);
    }
}
