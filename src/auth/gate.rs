//! The single-admin identity gate.
//!
//! The gate sits between the HTTP handlers and the identity provider. The
//! provider only answers "who is this?"; the gate enforces the one rule that
//! matters here: only [ADMIN_EMAIL] is allowed to hold a session.

use std::sync::{Arc, PoisonError, RwLock};

use crate::Error;

use super::provider::{Identity, IdentityProvider, ProviderError};

/// The email address of the sole administrator account.
///
/// Any identity with another address is refused a session, and a federated
/// sign-in that comes back with another address is immediately signed out of
/// the provider again.
pub const ADMIN_EMAIL: &str = "admin@hisab.app";

#[derive(Debug, Default)]
struct SessionState {
    identity: Option<Identity>,
    dev_override: bool,
}

/// The application's identity gate.
///
/// Holds the current session and decides who gets one. Clones share the same
/// session.
#[derive(Debug, Clone)]
pub struct AuthGate<P> {
    provider: P,
    session: Arc<RwLock<SessionState>>,
}

impl<P> AuthGate<P>
where
    P: IdentityProvider,
{
    /// Create a gate over `provider` with no one signed in.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            session: Arc::new(RwLock::new(SessionState::default())),
        }
    }

    /// Whether the current session belongs to the administrator.
    pub fn is_admin(&self) -> bool {
        let session = self.read_session();

        session.dev_override
            || session
                .identity
                .as_ref()
                .is_some_and(|identity| identity.email == ADMIN_EMAIL)
    }

    /// The identity currently signed in, if any.
    pub fn current_identity(&self) -> Option<Identity> {
        self.read_session().identity.clone()
    }

    /// Restore the provider-side session from a previous run, if there is
    /// one.
    ///
    /// Must complete before the server starts taking requests so that the
    /// first admin-gated request does not race the restore. A restored
    /// identity that is not the administrator is signed back out of the
    /// provider.
    pub async fn restore_session(&self) {
        let Some(identity) = self.provider.restore_session().await else {
            return;
        };

        if identity.email != ADMIN_EMAIL {
            tracing::warn!("Restored session for a non-admin account, signing it out.");
            if let Err(error) = self.provider.sign_out().await {
                tracing::error!("Error signing out restored session: {error}");
            }
            return;
        }

        self.write_session().identity = Some(identity);
    }

    /// Sign in with an email and password.
    ///
    /// Non-admin addresses are refused before the provider is contacted, so
    /// this flow leaks nothing about which accounts exist. The first ever
    /// sign-in bootstraps the admin account: if the provider has no account
    /// for [ADMIN_EMAIL], one is registered with the given password.
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::AccessRestricted] if `email` is not the admin address,
    /// - [Error::InvalidCredentials] if the password is wrong,
    /// - or [Error::AuthProviderError] for any other provider failure.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<(), Error> {
        if email != ADMIN_EMAIL {
            return Err(Error::AccessRestricted);
        }

        let identity = match self.provider.sign_in_with_password(email, password).await {
            Ok(identity) => identity,
            Err(ProviderError::UserNotFound) => self
                .provider
                .sign_up(email, password)
                .await
                .map_err(error_from_provider)?,
            Err(error) => return Err(error_from_provider(error)),
        };

        self.write_session().identity = Some(identity);

        Ok(())
    }

    /// Sign in with a federated ID token, e.g. from the Google sign-in
    /// button.
    ///
    /// The federated flow cannot restrict which account the user picks, so
    /// the check happens after the fact: a verified identity that is not the
    /// administrator is signed straight back out of the provider and refused
    /// a session.
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::AccessRestricted] if the token asserts a non-admin account,
    /// - [Error::UnauthorizedDomain] if the provider refuses the serving
    ///   domain,
    /// - or [Error::AuthProviderError] for any other provider failure.
    pub async fn sign_in_with_google(&self, id_token: &str) -> Result<(), Error> {
        let identity = self
            .provider
            .sign_in_with_idp(id_token)
            .await
            .map_err(error_from_provider)?;

        if identity.email != ADMIN_EMAIL {
            self.write_session().identity = None;
            if let Err(error) = self.provider.sign_out().await {
                tracing::error!("Error signing out non-admin federated account: {error}");
            }

            return Err(Error::AccessRestricted);
        }

        self.write_session().identity = Some(identity);

        Ok(())
    }

    /// Grant an admin session without contacting the identity provider.
    ///
    /// Compiled in only with the `dev-override` feature, for working on the
    /// app without provider credentials. The override is local: signing out
    /// of it never touches the provider.
    #[cfg(feature = "dev-override")]
    pub fn sign_in_dev_override(&self) {
        self.write_session().dev_override = true;
    }

    /// End the current session.
    ///
    /// The local session is cleared before the provider is contacted, so the
    /// gate refuses admin actions even if the provider-side sign-out fails.
    /// A session granted by the dev override is cleared locally only.
    ///
    /// # Errors
    /// Returns [Error::AuthProviderError] if the provider-side sign-out
    /// fails.
    pub async fn sign_out(&self) -> Result<(), Error> {
        let was_dev_override = {
            let mut session = self.write_session();
            let was_dev_override = session.dev_override;
            session.identity = None;
            session.dev_override = false;

            was_dev_override
        };

        if was_dev_override {
            return Ok(());
        }

        self.provider.sign_out().await.map_err(error_from_provider)
    }

    fn read_session(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_session(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn error_from_provider(error: ProviderError) -> Error {
    match error {
        ProviderError::InvalidCredentials | ProviderError::UserNotFound => {
            Error::InvalidCredentials
        }
        ProviderError::UnauthorizedDomain => Error::UnauthorizedDomain,
        ProviderError::Other(message) => Error::AuthProviderError(message),
    }
}
