//! The Google Identity Toolkit implementation of the identity provider.
//!
//! Talks to the Identity Toolkit REST API. The provider holds no session
//! state of its own: tokens returned by the API are discarded once the
//! asserted email has been extracted, so [restore_session] always comes back
//! empty and [sign_out] is a no-op.
//!
//! [restore_session]: IdentityToolkitProvider::restore_session
//! [sign_out]: IdentityToolkitProvider::sign_out

use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;

use crate::config::ServiceConfig;

use super::provider::{Identity, IdentityProvider, ProviderError};

/// An identity provider backed by the Google Identity Toolkit REST API.
#[derive(Debug, Clone)]
pub struct IdentityToolkitProvider {
    http_client: HttpClient,
    base_url: String,
    api_key: String,
}

impl IdentityToolkitProvider {
    /// Create a provider from the service configuration.
    pub fn new(http_client: HttpClient, config: &ServiceConfig) -> Self {
        Self {
            http_client,
            base_url: config.identity_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    async fn post_account_request(
        &self,
        action: &str,
        body: serde_json::Value,
    ) -> Result<Identity, ProviderError> {
        let response = self
            .http_client
            .post(format!("{}/accounts:{action}", self.base_url))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|error| ProviderError::Other(error.to_string()))?;

        if !response.status().is_success() {
            let error: ErrorResponse = response
                .json()
                .await
                .map_err(|error| ProviderError::Other(error.to_string()))?;

            return Err(provider_error_from_message(&error.error.message));
        }

        let account: AccountResponse = response
            .json()
            .await
            .map_err(|error| ProviderError::Other(error.to_string()))?;

        match account.email {
            Some(email) => Ok(Identity { email }),
            None => Err(ProviderError::Other(
                "the identity provider did not return an email address".to_owned(),
            )),
        }
    }
}

impl IdentityProvider for IdentityToolkitProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, ProviderError> {
        self.post_account_request(
            "signInWithPassword",
            json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }),
        )
        .await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, ProviderError> {
        self.post_account_request(
            "signUp",
            json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }),
        )
        .await
    }

    async fn sign_in_with_idp(&self, id_token: &str) -> Result<Identity, ProviderError> {
        self.post_account_request(
            "signInWithIdp",
            json!({
                "postBody": format!("id_token={id_token}&providerId=google.com"),
                "requestUri": "http://localhost",
                "returnSecureToken": true,
            }),
        )
        .await
    }

    async fn restore_session(&self) -> Option<Identity> {
        None
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// Map an Identity Toolkit error code to a provider error.
///
/// Domain authorization errors arrive with a variable prefix, so that code is
/// matched by substring.
fn provider_error_from_message(message: &str) -> ProviderError {
    match message {
        "EMAIL_NOT_FOUND" => ProviderError::UserNotFound,
        "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => ProviderError::InvalidCredentials,
        message if message.contains("UNAUTHORIZED_DOMAIN") => ProviderError::UnauthorizedDomain,
        message => ProviderError::Other(message.to_owned()),
    }
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}
