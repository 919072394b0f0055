//! Defines the endpoint for deleting a transaction.

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{AppState, auth::IdentityProvider, endpoints};

use super::{TransactionService, store::TransactionStore};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState<S>
where
    S: TransactionStore,
{
    /// The service managing the transaction ledger.
    pub transactions: TransactionService<S>,
}

impl<S, P> FromRef<AppState<S, P>> for DeleteTransactionState<S>
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

/// A route handler for permanently deleting a transaction, redirects to the
/// ledger on success.
///
/// The route sits behind the admin guard. Deleting is remote-only: the local
/// mirror is deliberately left untouched.
pub async fn delete_transaction_endpoint<S>(
    State(state): State<DeleteTransactionState<S>>,
    Path(transaction_id): Path<String>,
) -> Response
where
    S: TransactionStore,
{
    if let Err(error) = state.transactions.delete(&transaction_id).await {
        tracing::error!("could not delete transaction: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::ROOT.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod delete_endpoint_tests {
    use axum::{Router, routing::delete};
    use axum_test::TestServer;

    use crate::{
        endpoints::{self, format_endpoint},
        transaction::{
            Transaction, TransactionService,
            test_utils::{FakeTransactionStore, get_test_service},
        },
    };

    use super::{DeleteTransactionState, delete_transaction_endpoint};

    fn get_test_server(
        store: FakeTransactionStore,
    ) -> (TestServer, TransactionService<FakeTransactionStore>) {
        let transactions = get_test_service(store);
        let state = DeleteTransactionState {
            transactions: transactions.clone(),
        };

        let app = Router::new()
            .route(
                endpoints::TRANSACTION,
                delete(delete_transaction_endpoint::<FakeTransactionStore>),
            )
            .with_state(state);

        (
            TestServer::new(app),
            transactions,
        )
    }

    #[tokio::test]
    async fn delete_removes_the_record_and_redirects() {
        let store = FakeTransactionStore::with_records(vec![Transaction {
            id: "abc123".to_owned(),
            giver: "Rahim".to_owned(),
            receiver: "Karim".to_owned(),
            amount: "120.5".to_owned(),
            date: "2025-01-05T09:12:00Z".to_owned(),
        }]);
        let (server, transactions) = get_test_server(store);

        let response = server
            .delete(&format_endpoint(endpoints::TRANSACTION, "abc123"))
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("hx-redirect"), endpoints::ROOT);
        assert!(transactions.list().await.is_empty());
    }

    #[tokio::test]
    async fn deleting_a_missing_record_is_reported() {
        let (server, _) = get_test_server(FakeTransactionStore::new());

        let response = server
            .delete(&format_endpoint(endpoints::TRANSACTION, "missing"))
            .await;

        response.assert_status_not_found();
        response.assert_text_contains("Could not delete transaction");
    }
}
