//! The Cloud Firestore implementation of the transaction store.
//!
//! Talks to the Firestore REST v1 API. Each record is a document in the
//! `transactions` collection whose fields mirror [Transaction] minus the ID;
//! the document identifier serves as the ID.

use reqwest::{Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{Error, config::ServiceConfig};

use super::{Transaction, store::TransactionStore};

/// The Firestore collection that holds the transaction documents.
const COLLECTION_NAME: &str = "transactions";

/// A transaction store backed by a Cloud Firestore collection.
#[derive(Debug, Clone)]
pub struct FirestoreTransactionStore {
    http_client: HttpClient,
    base_url: String,
    project_id: String,
    api_key: String,
}

impl FirestoreTransactionStore {
    /// Create a store from the service configuration.
    pub fn new(http_client: HttpClient, config: &ServiceConfig) -> Self {
        Self {
            http_client,
            base_url: config.firestore_url.clone(),
            project_id: config.project_id.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// The URL of the database's document root, e.g.
    /// "https://firestore.googleapis.com/v1/projects/foo/databases/(default)/documents".
    fn documents_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents",
            self.base_url, self.project_id
        )
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{}/{}", self.documents_url(), COLLECTION_NAME, id)
    }
}

impl TransactionStore for FirestoreTransactionStore {
    async fn list(&self) -> Result<Vec<Transaction>, Error> {
        let query = json!({
            "structuredQuery": {
                "from": [{ "collectionId": COLLECTION_NAME }],
                "orderBy": [{
                    "field": { "fieldPath": "date" },
                    "direction": "DESCENDING",
                }],
            },
        });

        let response = self
            .http_client
            .post(format!("{}:runQuery", self.documents_url()))
            .query(&[("key", self.api_key.as_str())])
            .json(&query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response("list", response).await);
        }

        let entries: Vec<RunQueryEntry> = response.json().await?;

        entries
            .into_iter()
            // Entries that carry only a read time have no document.
            .filter_map(|entry| entry.document)
            .map(transaction_from_document)
            .collect()
    }

    async fn create(&self, transaction: Transaction) -> Result<Transaction, Error> {
        let document = document_from_transaction(&transaction);

        let response = self
            .http_client
            .post(format!("{}/{}", self.documents_url(), COLLECTION_NAME))
            .query(&[("key", self.api_key.as_str())])
            .json(&document)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response("create", response).await);
        }

        let stored: Document = response.json().await?;

        transaction_from_document(stored)
    }

    async fn update(&self, transaction: &Transaction) -> Result<(), Error> {
        let document = document_from_transaction(transaction);

        let response = self
            .http_client
            .patch(self.document_url(&transaction.id))
            .query(&[
                ("key", self.api_key.as_str()),
                ("currentDocument.exists", "true"),
                ("updateMask.fieldPaths", "giver"),
                ("updateMask.fieldPaths", "receiver"),
                ("updateMask.fieldPaths", "amount"),
                ("updateMask.fieldPaths", "date"),
            ])
            .json(&document)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND | StatusCode::CONFLICT => Err(Error::UpdateMissingTransaction),
            _ => Err(error_from_response("update", response).await),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        let response = self
            .http_client
            .delete(self.document_url(id))
            .query(&[
                ("key", self.api_key.as_str()),
                ("currentDocument.exists", "true"),
            ])
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND | StatusCode::CONFLICT => Err(Error::DeleteMissingTransaction),
            _ => Err(error_from_response("delete", response).await),
        }
    }
}

/// Build a [Error::StoreError] from a non-success Firestore response.
async fn error_from_response(action: &str, response: reqwest::Response) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    Error::StoreError(format!("{action} failed with status {status}: {body}"))
}

/// A Firestore document as sent over the REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Document {
    /// The full resource name, e.g.
    /// "projects/foo/databases/(default)/documents/transactions/abc123".
    /// Not set on documents that have not been stored yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    fields: DocumentFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct DocumentFields {
    giver: StringValue,
    receiver: StringValue,
    amount: StringValue,
    date: StringValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StringValue {
    #[serde(rename = "stringValue")]
    string_value: String,
}

impl From<&str> for StringValue {
    fn from(value: &str) -> Self {
        Self {
            string_value: value.to_owned(),
        }
    }
}

/// One element of a `runQuery` response.
#[derive(Debug, Deserialize)]
struct RunQueryEntry {
    #[serde(default)]
    document: Option<Document>,
}

fn document_from_transaction(transaction: &Transaction) -> Document {
    Document {
        name: None,
        fields: DocumentFields {
            giver: transaction.giver.as_str().into(),
            receiver: transaction.receiver.as_str().into(),
            amount: transaction.amount.as_str().into(),
            date: transaction.date.as_str().into(),
        },
    }
}

fn transaction_from_document(document: Document) -> Result<Transaction, Error> {
    let name = document
        .name
        .ok_or_else(|| Error::StoreError("document is missing its resource name".to_owned()))?;
    let id = name
        .rsplit('/')
        .next()
        .unwrap_or(&name)
        .to_owned();

    Ok(Transaction {
        id,
        giver: document.fields.giver.string_value,
        receiver: document.fields.receiver.string_value,
        amount: document.fields.amount.string_value,
        date: document.fields.date.string_value,
    })
}
