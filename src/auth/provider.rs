//! Defines the identity provider trait that backs the sign-in flows.

use std::future::Future;

/// A signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    /// The email address the account is registered under.
    pub email: String,
}

/// The errors an identity provider may report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// No account exists for the given email address.
    #[error("no account exists for that email address")]
    UserNotFound,

    /// The email and password combination does not match an account.
    #[error("the email and password do not match an account")]
    InvalidCredentials,

    /// The provider rejected the federated flow because the serving domain is
    /// not on its allow-list.
    #[error("this domain is not authorized for federated sign-in")]
    UnauthorizedDomain,

    /// Any other provider failure. The message is for server logs only.
    #[error("the identity provider failed: {0}")]
    Other(String),
}

/// Verifies credentials and manages provider-side sessions.
///
/// Providers only authenticate; whether an identity is allowed in is decided
/// by [AuthGate](crate::AuthGate).
pub trait IdentityProvider: Clone + Send + Sync + 'static {
    /// Verify an email and password pair.
    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Identity, ProviderError>> + Send;

    /// Register a new account with the given email and password and sign it
    /// in.
    fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Identity, ProviderError>> + Send;

    /// Verify a federated ID token, e.g. a Google ID token from the sign-in
    /// button, and return the identity it asserts.
    fn sign_in_with_idp(
        &self,
        id_token: &str,
    ) -> impl Future<Output = Result<Identity, ProviderError>> + Send;

    /// Restore the provider-side session left over from a previous run, if
    /// any.
    fn restore_session(&self) -> impl Future<Output = Option<Identity>> + Send;

    /// End the provider-side session.
    fn sign_out(&self) -> impl Future<Output = Result<(), ProviderError>> + Send;
}
