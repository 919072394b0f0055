//! Defines the endpoint for updating an existing transaction.

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use serde::Deserialize;

use crate::{AppState, auth::IdentityProvider, endpoints};

use super::{TransactionDraft, TransactionService, store::TransactionStore};

/// The state needed to update a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState<S>
where
    S: TransactionStore,
{
    /// The service managing the transaction ledger.
    pub transactions: TransactionService<S>,
}

impl<S, P> FromRef<AppState<S, P>> for EditTransactionState<S>
where
    S: TransactionStore,
    P: IdentityProvider,
{
    fn from_ref(state: &AppState<S, P>) -> Self {
        Self {
            transactions: state.transactions.clone(),
        }
    }
}

/// The form data for editing a transaction.
#[derive(Debug, Deserialize)]
pub struct EditTransactionForm {
    /// The display name of the person who gave the money.
    pub giver: String,
    /// The display name of the person who received the money.
    pub receiver: String,
    /// The amount of money given, as entered.
    pub amount: String,
    /// The record's date, carried through the edit form unchanged.
    pub date: String,
}

/// A route handler for updating a transaction, redirects to the ledger on
/// success.
///
/// The route sits behind the admin guard. The ID in the path wins over
/// anything in the form, and the date is preserved from the hidden form
/// field rather than reset to now.
pub async fn edit_transaction_endpoint<S>(
    State(state): State<EditTransactionState<S>>,
    Path(transaction_id): Path<String>,
    Form(form): Form<EditTransactionForm>,
) -> Response
where
    S: TransactionStore,
{
    let draft = TransactionDraft {
        giver: form.giver,
        receiver: form.receiver,
        amount: form.amount,
    };

    if let Err(error) = draft.validate() {
        return error.into_alert_response();
    }

    let transaction = draft.into_transaction(transaction_id, form.date);

    if let Err(error) = state.transactions.update(&transaction).await {
        tracing::error!("could not update transaction: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::ROOT.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod edit_endpoint_tests {
    use axum::{Router, routing::put};
    use axum_test::TestServer;

    use crate::{
        endpoints::{self, format_endpoint},
        transaction::{
            Transaction, TransactionService,
            test_utils::{FakeTransactionStore, get_test_service},
        },
    };

    use super::{EditTransactionState, edit_transaction_endpoint};

    fn stored_transaction() -> Transaction {
        Transaction {
            id: "abc123".to_owned(),
            giver: "Rahim".to_owned(),
            receiver: "Karim".to_owned(),
            amount: "120.5".to_owned(),
            date: "2025-01-05T09:12:00Z".to_owned(),
        }
    }

    fn get_test_server(
        store: FakeTransactionStore,
    ) -> (TestServer, TransactionService<FakeTransactionStore>) {
        let transactions = get_test_service(store);
        let state = EditTransactionState {
            transactions: transactions.clone(),
        };

        let app = Router::new()
            .route(
                endpoints::TRANSACTION,
                put(edit_transaction_endpoint::<FakeTransactionStore>),
            )
            .with_state(state);

        (
            TestServer::new(app),
            transactions,
        )
    }

    #[tokio::test]
    async fn edit_rewrites_fields_and_preserves_the_date() {
        let store = FakeTransactionStore::with_records(vec![stored_transaction()]);
        let (server, transactions) = get_test_server(store);

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, "abc123"))
            .form(&[
                ("giver", "Salma"),
                ("receiver", "Karim"),
                ("amount", "99"),
                ("date", "2025-01-05T09:12:00Z"),
            ])
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("hx-redirect"), endpoints::ROOT);

        let stored = transactions.list().await;
        assert_eq!(stored[0].giver, "Salma");
        assert_eq!(stored[0].amount, "99");
        assert_eq!(stored[0].date, "2025-01-05T09:12:00Z");
    }

    #[tokio::test]
    async fn editing_a_missing_record_is_reported() {
        let (server, _) = get_test_server(FakeTransactionStore::new());

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, "missing"))
            .form(&[
                ("giver", "Salma"),
                ("receiver", "Karim"),
                ("amount", "99"),
                ("date", "2025-01-05T09:12:00Z"),
            ])
            .await;

        response.assert_status_not_found();
        response.assert_text_contains("Could not update transaction");
    }

    #[tokio::test]
    async fn invalid_amount_leaves_the_record_unchanged() {
        let store = FakeTransactionStore::with_records(vec![stored_transaction()]);
        let (server, transactions) = get_test_server(store);

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, "abc123"))
            .form(&[
                ("giver", "Salma"),
                ("receiver", "Karim"),
                ("amount", "ten"),
                ("date", "2025-01-05T09:12:00Z"),
            ])
            .await;

        response.assert_status_bad_request();
        assert_eq!(transactions.list().await[0].giver, "Rahim");
    }
}
