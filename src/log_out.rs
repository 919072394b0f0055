//! Log-out route handler that ends the current session and redirects users.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    auth::{AuthGateState, IdentityProvider},
    endpoints,
};

/// End the current session and redirect the client to the ledger.
///
/// The local session is always cleared; a provider-side failure is logged
/// but does not block the redirect.
pub async fn get_log_out<P>(State(state): State<AuthGateState<P>>) -> Response
where
    P: IdentityProvider,
{
    if let Err(error) = state.auth_gate.sign_out().await {
        tracing::error!("Error signing out of the identity provider: {error}");
    }

    Redirect::to(endpoints::ROOT).into_response()
}
