//! An in-memory identity provider for testing.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use super::provider::{Identity, IdentityProvider, ProviderError};

/// An in-memory [IdentityProvider] with configurable accounts, federated
/// results and restored sessions.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeIdentityProvider {
    accounts: Arc<Mutex<HashMap<String, String>>>,
    federated_identity: Arc<Mutex<Option<Result<Identity, ProviderError>>>>,
    restored_session: Arc<Mutex<Option<Identity>>>,
    password_sign_in_attempts: Arc<AtomicUsize>,
    sign_out_calls: Arc<AtomicUsize>,
    fail_sign_out: Arc<AtomicBool>,
}

impl FakeIdentityProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_account(self, email: &str, password: &str) -> Self {
        self.accounts
            .lock()
            .unwrap()
            .insert(email.to_owned(), password.to_owned());

        self
    }

    /// What `sign_in_with_idp` returns, regardless of the token.
    pub(crate) fn with_federated_identity(self, result: Result<Identity, ProviderError>) -> Self {
        *self.federated_identity.lock().unwrap() = Some(result);

        self
    }

    pub(crate) fn with_restored_session(self, identity: Identity) -> Self {
        *self.restored_session.lock().unwrap() = Some(identity);

        self
    }

    pub(crate) fn set_fail_sign_out(&self, fail: bool) {
        self.fail_sign_out.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn account_exists(&self, email: &str) -> bool {
        self.accounts.lock().unwrap().contains_key(email)
    }

    pub(crate) fn password_sign_in_attempts(&self) -> usize {
        self.password_sign_in_attempts.load(Ordering::SeqCst)
    }

    pub(crate) fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }
}

impl IdentityProvider for FakeIdentityProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, ProviderError> {
        self.password_sign_in_attempts.fetch_add(1, Ordering::SeqCst);

        match self.accounts.lock().unwrap().get(email) {
            None => Err(ProviderError::UserNotFound),
            Some(stored) if stored != password => Err(ProviderError::InvalidCredentials),
            Some(_) => Ok(Identity {
                email: email.to_owned(),
            }),
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, ProviderError> {
        let mut accounts = self.accounts.lock().unwrap();

        if accounts.contains_key(email) {
            return Err(ProviderError::Other("EMAIL_EXISTS".to_owned()));
        }

        accounts.insert(email.to_owned(), password.to_owned());

        Ok(Identity {
            email: email.to_owned(),
        })
    }

    async fn sign_in_with_idp(&self, _id_token: &str) -> Result<Identity, ProviderError> {
        self.federated_identity
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(Err(ProviderError::Other(
                "no federated identity configured".to_owned(),
            )))
    }

    async fn restore_session(&self) -> Option<Identity> {
        self.restored_session.lock().unwrap().take()
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(ProviderError::Other(
                "the fake provider is offline".to_owned(),
            ));
        }

        Ok(())
    }
}
