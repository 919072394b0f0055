//! Defines the route handler for the ledger page.

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    auth::{AuthGate, IdentityProvider},
    html::{base, render},
    timezone::get_local_offset,
};

use super::{TransactionService, store::TransactionStore, view::transactions_view};

/// The state needed to display the ledger page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState<S, P>
where
    S: TransactionStore,
    P: IdentityProvider,
{
    /// The service managing the transaction ledger.
    pub transactions: TransactionService<S>,
    /// The gate holding the current session.
    pub auth_gate: AuthGate<P>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Dhaka".
    pub local_timezone: String,
}

impl<S, P> FromRef<AppState<S, P>> for TransactionsPageState<S, P>
where
    S: TransactionStore,
    P: IdentityProvider,
{
    fn from_ref(state: &AppState<S, P>) -> Self {
        Self {
            transactions: state.transactions.clone(),
            auth_gate: state.auth_gate.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for displaying the transaction ledger.
///
/// The page is public. Edit and delete actions are rendered only for the
/// administrator, and a retrieval failure renders as an empty ledger rather
/// than an error page.
pub async fn get_transactions_page<S, P>(
    State(state): State<TransactionsPageState<S, P>>,
) -> Response
where
    S: TransactionStore,
    P: IdentityProvider,
{
    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Error::InvalidTimezoneError(state.local_timezone).into_response();
    };

    let transactions = state.transactions.list().await;
    let content = transactions_view(&transactions, state.auth_gate.is_admin(), local_offset);

    render(StatusCode::OK, base("Ledger", &content))
}
