//! Transaction management for the money receipt tracker.
//!
//! This module contains everything related to transactions:
//! - The [Transaction] record and its boundary validation
//! - The remote document store and the best-effort local mirror
//! - The [TransactionService] tying the two together with change
//!   notifications
//! - View and API handlers for the transaction-related pages

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod firestore;
mod mirror;
mod service;
mod store;
mod transactions_page;
mod view;

#[cfg(test)]
pub(crate) mod test_utils;

pub use core::{Transaction, TransactionDraft};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use firestore::FirestoreTransactionStore;
pub use mirror::LocalMirror;
pub use service::TransactionService;
pub use store::TransactionStore;
pub use transactions_page::get_transactions_page;
