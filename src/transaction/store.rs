//! Defines the transaction store trait.

use std::future::Future;

use crate::Error;

use super::Transaction;

/// Handles durable CRUD for transaction records.
///
/// All operations are requests to a remote service, so every method is a
/// suspend point with no ordering guarantee relative to other in-flight
/// calls.
pub trait TransactionStore: Clone + Send + Sync + 'static {
    /// Retrieve all transactions, ordered by date with the newest first.
    ///
    /// The tie-break for records with equal dates is store-defined.
    fn list(&self) -> impl Future<Output = Result<Vec<Transaction>, Error>> + Send;

    /// Add `transaction` to the store, letting the store assign the ID.
    ///
    /// Implementers must ignore any ID already set on `transaction`. Returns
    /// the record as stored.
    fn create(&self, transaction: Transaction)
    -> impl Future<Output = Result<Transaction, Error>> + Send;

    /// Write every field except the ID to the record matching
    /// `transaction.id`.
    ///
    /// # Errors
    /// Returns [Error::UpdateMissingTransaction] if no such record exists.
    fn update(&self, transaction: &Transaction) -> impl Future<Output = Result<(), Error>> + Send;

    /// Permanently remove the record with the given `id`.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingTransaction] if no such record exists.
    fn delete(&self, id: &str) -> impl Future<Output = Result<(), Error>> + Send;
}
