//! Implements a struct that holds the state of the REST server.

use crate::{
    auth::{AuthGate, IdentityProvider},
    transaction::{TransactionService, TransactionStore},
};

/// The state of the REST server.
///
/// Route handlers take narrower per-endpoint state structs extracted from
/// this via `FromRef`, so tests only have to construct the parts an endpoint
/// actually uses.
#[derive(Debug, Clone)]
pub struct AppState<S, P>
where
    S: TransactionStore,
    P: IdentityProvider,
{
    /// The service managing the transaction ledger.
    pub transactions: TransactionService<S>,
    /// The gate deciding who may edit the ledger.
    pub auth_gate: AuthGate<P>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Dhaka".
    pub local_timezone: String,
    /// The OAuth client ID for the Google sign-in button, if federated
    /// sign-in is enabled.
    pub google_client_id: Option<String>,
}

impl<S, P> AppState<S, P>
where
    S: TransactionStore,
    P: IdentityProvider,
{
    /// Create a new [AppState].
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g.
    /// "Asia/Dhaka".
    pub fn new(
        transactions: TransactionService<S>,
        auth_gate: AuthGate<P>,
        local_timezone: &str,
        google_client_id: Option<String>,
    ) -> Self {
        Self {
            transactions,
            auth_gate,
            local_timezone: local_timezone.to_owned(),
            google_client_id,
        }
    }
}
