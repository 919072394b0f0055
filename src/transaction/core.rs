//! Defines the transaction record and the boundary validation applied before
//! any write is attempted against the store.

use serde::{Deserialize, Serialize};

use crate::Error;

/// A money receipt: an event where one person gave money to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction, assigned by the backing store on creation.
    ///
    /// Immutable once assigned. Client-supplied IDs are discarded by
    /// [create](crate::TransactionService::create).
    pub id: String,
    /// The display name of the person who gave the money.
    pub giver: String,
    /// The display name of the person who received the money.
    pub receiver: String,
    /// The amount of money given, as a decimal string in taka.
    ///
    /// Stored as-entered. Aggregates treat non-numeric values as zero, see
    /// [parse_amount](crate::view_model::parse_amount).
    pub amount: String,
    /// When the transaction was recorded, as an RFC 3339 timestamp.
    ///
    /// Assigned by the service at creation time and preserved on edit unless
    /// explicitly changed.
    pub date: String,
}

/// The fields of a transaction as entered by the user, before the record has
/// been accepted into the store.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    /// The display name of the person who gave the money.
    pub giver: String,
    /// The display name of the person who received the money.
    pub receiver: String,
    /// The amount of money given, as a decimal string in taka.
    pub amount: String,
}

impl TransactionDraft {
    /// Check that the draft is fit to be written to the store.
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::EmptyField] if the giver, receiver or amount is empty,
    /// - or [Error::InvalidAmount] if the amount is not a non-negative
    ///   decimal number.
    pub fn validate(&self) -> Result<(), Error> {
        if self.giver.trim().is_empty() {
            return Err(Error::EmptyField("giver"));
        }

        if self.receiver.trim().is_empty() {
            return Err(Error::EmptyField("receiver"));
        }

        if self.amount.trim().is_empty() {
            return Err(Error::EmptyField("amount"));
        }

        match self.amount.trim().parse::<f64>() {
            Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(()),
            _ => Err(Error::InvalidAmount(self.amount.clone())),
        }
    }

    /// Turn the draft into a [Transaction] with the given `id` and `date`.
    pub fn into_transaction(self, id: String, date: String) -> Transaction {
        Transaction {
            id,
            giver: self.giver,
            receiver: self.receiver,
            amount: self.amount,
            date,
        }
    }
}
