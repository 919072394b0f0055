//! Hisab is a web app for keeping a shared money-receipt ledger: who gave
//! money, who received it, and how much.
//!
//! Records live in a remote document store and every write is mirrored to a
//! best-effort local copy for offline continuity. Anyone may record a new
//! transaction, but only the single designated administrator may edit or
//! delete entries. The library serves HTML pages directly over a REST API.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod config;
mod endpoints;
mod html;
mod internal_server_error;
mod log_in;
mod log_out;
mod logging;
mod not_found;
mod routing;
mod timezone;
mod transaction;
pub mod view_model;

pub use app_state::AppState;
pub use auth::{
    ADMIN_EMAIL, AuthGate, Identity, IdentityProvider, IdentityToolkitProvider, ProviderError,
};
pub use config::ServiceConfig;
pub use logging::logging_middleware;
pub use routing::build_router;
pub use transaction::{
    FirestoreTransactionStore, LocalMirror, Transaction, TransactionService, TransactionStore,
};

use crate::{
    alert::AlertTemplate,
    html::render,
    internal_server_error::{InternalServerErrorPageTemplate, render_internal_server_error},
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required form field was submitted empty.
    ///
    /// Caught at the boundary, before any write is attempted against the
    /// store.
    #[error("the {0} field cannot be empty")]
    EmptyField(&'static str),

    /// The amount entered by the user is not a non-negative decimal number.
    #[error("{0:?} is not a valid amount")]
    InvalidAmount(String),

    /// An identity other than the administrator tried to sign in, or was
    /// returned by the federated sign-in flow.
    #[error("only the administrator can sign in")]
    AccessRestricted,

    /// The identity provider rejected the federated flow because the serving
    /// domain is not authorized.
    ///
    /// Kept distinct from other provider errors so the log-in page can point
    /// the user at the email/password method instead.
    #[error("this domain is not authorized for federated sign-in")]
    UnauthorizedDomain,

    /// The user provided an invalid combination of email and password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// An unexpected error from the identity provider.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error message.
    #[error("the identity provider reported an error: {0}")]
    AuthProviderError(String),

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the store")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the store")]
    DeleteMissingTransaction,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The remote document store could not complete a request.
    #[error("the transaction store reported an error: {0}")]
    StoreError(String),

    /// An unexpected error from the local mirror database.
    #[error("the local mirror reported an error: {0}")]
    MirrorError(String),

    /// Could not acquire the lock on the local mirror connection.
    #[error("could not acquire the local mirror lock")]
    MirrorLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// A required environment variable was not set.
    #[error("the environment variable '{0}' must be set")]
    MissingConfig(&'static str),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        Error::MirrorError(value.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::StoreError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => {
                render_internal_server_error(InternalServerErrorPageTemplate {
                    description: "Invalid Timezone Settings",
                    fix: &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                    ),
                })
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(Default::default())
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::EmptyField(field) => render(
                StatusCode::BAD_REQUEST,
                AlertTemplate::error(
                    "Missing information",
                    &format!("Please fill in the {field} field."),
                )
                .into_markup(),
            ),
            Error::InvalidAmount(amount) => render(
                StatusCode::BAD_REQUEST,
                AlertTemplate::error(
                    "Invalid amount",
                    &format!("{amount:?} is not a non-negative number."),
                )
                .into_markup(),
            ),
            Error::AccessRestricted => render(
                StatusCode::FORBIDDEN,
                AlertTemplate::error(
                    "Access restricted",
                    "Only the administrator can perform this action.",
                )
                .into_markup(),
            ),
            Error::UpdateMissingTransaction => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not update transaction",
                    "The transaction could not be found.",
                )
                .into_markup(),
            ),
            Error::DeleteMissingTransaction => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not delete transaction",
                    "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted.",
                )
                .into_markup(),
            ),
            Error::InvalidTimezoneError(timezone) => render(
                StatusCode::INTERNAL_SERVER_ERROR,
                AlertTemplate::error(
                    "Invalid Timezone Settings",
                    &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                    ),
                )
                .into_markup(),
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    AlertTemplate::error(
                        "Something went wrong",
                        "An unexpected error occurred, check the server logs for more details.",
                    )
                    .into_markup(),
                )
            }
        }
    }
}
