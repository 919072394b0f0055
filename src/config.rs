//! Configuration for the remote services, read from the environment.

use std::env;

use crate::Error;

/// The default base URL for the Firestore REST API.
const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";

/// The default base URL for the Identity Toolkit REST API.
const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Connection details for the document store and identity provider.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// The Firebase project that holds the transaction documents.
    pub project_id: String,
    /// The web API key used by both the document store and the identity
    /// provider.
    pub api_key: String,
    /// The base URL of the Firestore REST API. Overridable for tests.
    pub firestore_url: String,
    /// The base URL of the Identity Toolkit REST API. Overridable for tests.
    pub identity_url: String,
    /// The OAuth client ID for the Google sign-in button, if federated
    /// sign-in is enabled.
    pub google_client_id: Option<String>,
}

impl ServiceConfig {
    /// Read the configuration from environment variables.
    ///
    /// `FIREBASE_PROJECT_ID` and `FIREBASE_API_KEY` are required.
    /// `FIRESTORE_URL`, `IDENTITY_TOOLKIT_URL` and `GOOGLE_CLIENT_ID` are
    /// optional.
    ///
    /// # Errors
    /// Returns [Error::MissingConfig] naming the first missing required
    /// variable.
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            project_id: require_env("FIREBASE_PROJECT_ID")?,
            api_key: require_env("FIREBASE_API_KEY")?,
            firestore_url: env::var("FIRESTORE_URL")
                .unwrap_or_else(|_| DEFAULT_FIRESTORE_URL.to_owned()),
            identity_url: env::var("IDENTITY_TOOLKIT_URL")
                .unwrap_or_else(|_| DEFAULT_IDENTITY_URL.to_owned()),
            google_client_id: env::var("GOOGLE_CLIENT_ID").ok(),
        })
    }
}

fn require_env(name: &'static str) -> Result<String, Error> {
    env::var(name).map_err(|_| Error::MissingConfig(name))
}
