//! Defines the route handler for the page for editing a transaction.

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    auth::IdentityProvider,
    html::{base, render},
};

use super::{TransactionService, store::TransactionStore, view::edit_transaction_view};

/// The state needed to display the edit page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState<S>
where
    S: TransactionStore,
{
    /// The service managing the transaction ledger.
    pub transactions: TransactionService<S>,
}

impl<S, P> FromRef<AppState<S, P>> for EditTransactionPageState<S>
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

/// A route handler for displaying the form to edit a transaction.
///
/// Serves a 404 page if no transaction has the given ID. The route sits
/// behind the admin guard.
pub async fn get_edit_transaction_page<S>(
    State(state): State<EditTransactionPageState<S>>,
    Path(transaction_id): Path<String>,
) -> Response
where
    S: TransactionStore,
{
    let transactions = state.transactions.list().await;

    match transactions
        .into_iter()
        .find(|transaction| transaction.id == transaction_id)
    {
        Some(transaction) => render(
            StatusCode::OK,
            base("Edit Transaction", &edit_transaction_view(&transaction)),
        ),
        None => Error::NotFound.into_response(),
    }
}

#[cfg(test)]
mod edit_page_tests {
    use axum::{Router, routing::get};
    use axum_test::TestServer;

    use crate::{
        endpoints::{self, format_endpoint},
        transaction::{
            Transaction,
            test_utils::{FakeTransactionStore, get_test_service},
        },
    };

    use super::{EditTransactionPageState, get_edit_transaction_page};

    fn get_test_server(store: FakeTransactionStore) -> TestServer {
        let state = EditTransactionPageState {
            transactions: get_test_service(store),
        };

        let app = Router::new()
            .route(
                endpoints::EDIT_TRANSACTION_VIEW,
                get(get_edit_transaction_page::<FakeTransactionStore>),
            )
            .with_state(state);

        TestServer::new(app)
    }

    #[tokio::test]
    async fn edit_page_prefills_the_stored_record() {
        let store = FakeTransactionStore::with_records(vec![Transaction {
            id: "abc123".to_owned(),
            giver: "Rahim".to_owned(),
            receiver: "Karim".to_owned(),
            amount: "120.5".to_owned(),
            date: "2025-01-05T09:12:00Z".to_owned(),
        }]);
        let server = get_test_server(store);

        let response = server
            .get(&format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, "abc123"))
            .await;

        response.assert_status_ok();
        response.assert_text_contains("value=\"Rahim\"");
        response.assert_text_contains("value=\"120.5\"");
        // The stored date rides along in a hidden input.
        response.assert_text_contains("value=\"2025-01-05T09:12:00Z\"");
    }

    #[tokio::test]
    async fn unknown_id_serves_the_404_page() {
        let server = get_test_server(FakeTransactionStore::new());

        let response = server
            .get(&format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, "nope"))
            .await;

        response.assert_status_not_found();
    }
}
