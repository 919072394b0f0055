//! Defines the endpoint for recording a new transaction.

use axum::{
    extract::{FromRef, State},
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

/// The state needed to record a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState<S>
where
    S: TransactionStore,
{
    /// The service managing the transaction ledger.
    pub transactions: TransactionService<S>,
}

impl<S, P> FromRef<AppState<S, P>> for CreateTransactionState<S>
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

/// The form data for recording a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// The display name of the person who gave the money.
    pub giver: String,
    /// The display name of the person who received the money.
    pub receiver: String,
    /// The amount of money given, as entered.
    pub amount: String,
}

/// A route handler for recording a new transaction, redirects to the ledger
/// on success.
///
/// This endpoint is public: anyone may record a receipt. The record's ID and
/// date are assigned server-side.
pub async fn create_transaction_endpoint<S>(
    State(state): State<CreateTransactionState<S>>,
    Form(form): Form<TransactionForm>,
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

    // The service discards these placeholders and assigns its own.
    let transaction = draft.into_transaction(String::new(), String::new());

    if let Err(error) = state.transactions.create(transaction).await {
        tracing::error!("could not record transaction: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::ROOT.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod create_endpoint_tests {
    use axum::{Router, routing::post};
    use axum_test::TestServer;

    use crate::{
        endpoints,
        transaction::{
            TransactionService,
            test_utils::{FakeTransactionStore, get_test_service},
        },
    };

    use super::{CreateTransactionState, create_transaction_endpoint};

    fn get_test_server() -> (TestServer, TransactionService<FakeTransactionStore>) {
        let transactions = get_test_service(FakeTransactionStore::new());
        let state = CreateTransactionState {
            transactions: transactions.clone(),
        };

        let app = Router::new()
            .route(
                endpoints::TRANSACTIONS_API,
                post(create_transaction_endpoint::<FakeTransactionStore>),
            )
            .with_state(state);

        (
            TestServer::new(app),
            transactions,
        )
    }

    #[tokio::test]
    async fn valid_form_records_and_redirects() {
        let (server, transactions) = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .form(&[("giver", "Rahim"), ("receiver", "Karim"), ("amount", "50")])
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("hx-redirect"), endpoints::ROOT);

        let stored = transactions.list().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].giver, "Rahim");
    }

    #[tokio::test]
    async fn empty_giver_is_rejected_with_an_alert() {
        let (server, transactions) = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .form(&[("giver", "  "), ("receiver", "Karim"), ("amount", "50")])
            .await;

        response.assert_status_bad_request();
        response.assert_text_contains("Please fill in the giver field.");
        assert!(transactions.list().await.is_empty());
    }

    #[tokio::test]
    async fn negative_amount_is_rejected_with_an_alert() {
        let (server, transactions) = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .form(&[("giver", "Rahim"), ("receiver", "Karim"), ("amount", "-5")])
            .await;

        response.assert_status_bad_request();
        response.assert_text_contains("is not a non-negative number");
        assert!(transactions.list().await.is_empty());
    }
}
