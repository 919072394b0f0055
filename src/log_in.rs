//! This file defines the routes for displaying the log-in page and handling
//! sign-in requests. The auth module handles the gate and provider logic.

use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::{AuthGate, IdentityProvider, normalize_redirect_url},
    endpoints,
    html::base,
    transaction::TransactionStore,
};

/// The state needed to serve the log-in page and sign-in requests.
#[derive(Debug, Clone)]
pub struct LogInState<P>
where
    P: IdentityProvider,
{
    /// The gate holding the current session.
    pub auth_gate: AuthGate<P>,
    /// The OAuth client ID for the Google sign-in button, if federated
    /// sign-in is enabled.
    pub google_client_id: Option<String>,
}

impl<S, P> FromRef<AppState<S, P>> for LogInState<P>
where
    S: TransactionStore,
    P: IdentityProvider,
{
    fn from_ref(state: &AppState<S, P>) -> Self {
        Self {
            auth_gate: state.auth_gate.clone(),
            google_client_id: state.google_client_id.clone(),
        }
    }
}

fn log_in_form(email: &str, error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-target="this"
            hx-swap="outerHTML"
            class="stacked"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            div
            {
                label for="email" { "Email" }
                input
                    type="email"
                    name="email"
                    id="email"
                    value=(email)
                    required
                    autofocus;
            }

            div
            {
                label for="password" { "Password" }
                input
                    type="password"
                    name="password"
                    id="password"
                    placeholder="••••••••"
                    required;
            }

            @if let Some(error_message) = error_message
            {
                p class="alert alert-error" { (error_message) }
            }

            button type="submit" { "Log in" }
        }
    }
}

/// The Google sign-in button, which posts the ID token as a `credential`
/// form field.
fn google_sign_in_section(client_id: &str) -> Markup {
    html! {
        script src="https://accounts.google.com/gsi/client" async {}

        div
            id="g_id_onload"
            data-client_id=(client_id)
            data-login_uri=(endpoints::LOG_IN_GOOGLE_API) {}

        div class="g_id_signin" data-type="standard" {}
    }
}

#[cfg(feature = "dev-override")]
fn dev_override_section() -> Markup {
    html! {
        form method="post" action=(endpoints::LOG_IN_DEV_API)
        {
            button type="submit" { "Continue as developer" }
        }
    }
}

#[cfg(not(feature = "dev-override"))]
fn dev_override_section() -> Markup {
    html! {}
}

fn log_in_page(
    email: &str,
    error_message: Option<&str>,
    redirect_url: Option<&str>,
    google_client_id: Option<&str>,
) -> Markup {
    let content = html! {
        h1 { "Log in" }

        p { "Only the administrator can edit the ledger." }

        (log_in_form(email, error_message, redirect_url))

        @if let Some(client_id) = google_client_id
        {
            hr;
            (google_sign_in_section(client_id))
        }

        (dev_override_section())
    };

    base("Log In", &content)
}

fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    match raw_url.and_then(normalize_redirect_url) {
        Some(redirect_url) => Some(redirect_url),
        None => {
            if let Some(redirect_url) = raw_url {
                tracing::warn!("Invalid redirect URL from {source}: {redirect_url}");
            }
            None
        }
    }
}

/// The optional post-sign-in destination carried in the page query.
#[derive(Debug, Deserialize)]
pub struct RedirectQuery {
    /// Where to send the user after a successful sign-in.
    pub redirect_url: Option<String>,
}

/// Display the log-in page.
///
/// An already signed-in administrator is sent straight back to the ledger.
pub async fn get_log_in_page<P>(
    State(state): State<LogInState<P>>,
    Query(query): Query<RedirectQuery>,
) -> Response
where
    P: IdentityProvider,
{
    if state.auth_gate.is_admin() {
        return Redirect::to(endpoints::ROOT).into_response();
    }

    let redirect_url = parse_redirect_url(query.redirect_url.as_deref(), "log-in query");

    log_in_page(
        "",
        None,
        redirect_url.as_deref(),
        state.google_client_id.as_deref(),
    )
    .into_response()
}

/// The form data for an email and password sign-in.
#[derive(Debug, Deserialize)]
pub struct LogInData {
    /// The email address entered by the user.
    pub email: String,
    /// The password entered by the user.
    pub password: String,
    /// Where to send the user after a successful sign-in.
    pub redirect_url: Option<String>,
}

fn password_error_message(error: &Error) -> &'static str {
    match error {
        Error::AccessRestricted => "Only the administrator can sign in.",
        Error::InvalidCredentials => "Please check your email and password.",
        _ => "An internal error occurred. Please try again later.",
    }
}

/// Handler for email and password sign-in requests via the POST method.
///
/// On success the client is redirected to the requested page, or the ledger
/// if none was requested. Otherwise, the form is returned with an error
/// message explaining the problem.
pub async fn post_log_in<P>(
    State(state): State<LogInState<P>>,
    Form(user_data): Form<LogInData>,
) -> Response
where
    P: IdentityProvider,
{
    let redirect_url = parse_redirect_url(user_data.redirect_url.as_deref(), "log-in form");
    let redirect_url = redirect_url.as_deref();

    match state
        .auth_gate
        .sign_in_with_password(&user_data.email, &user_data.password)
        .await
    {
        Ok(()) => (
            StatusCode::SEE_OTHER,
            HxRedirect(redirect_url.unwrap_or(endpoints::ROOT).to_owned()),
            (),
        )
            .into_response(),
        Err(error) => {
            if let Error::AuthProviderError(message) = &error {
                tracing::error!("Unhandled error while signing in: {message}");
            }

            log_in_form(
                &user_data.email,
                Some(password_error_message(&error)),
                redirect_url,
            )
            .into_response()
        }
    }
}

/// The form data posted by the Google sign-in button.
#[derive(Debug, Deserialize)]
pub struct GoogleLogInData {
    /// The Google ID token asserting the user's identity.
    pub credential: String,
}

fn google_error_message(error: &Error) -> &'static str {
    match error {
        Error::AccessRestricted => "Only the administrator can sign in.",
        Error::UnauthorizedDomain => {
            "Google sign-in is not available from this domain. \
            Use your email and password instead."
        }
        _ => "An internal error occurred. Please try again later.",
    }
}

/// Handler for the credential posted by the Google sign-in button.
///
/// The button performs a full-page POST, so success is a plain HTTP redirect
/// and failure re-renders the log-in page with an error message.
pub async fn post_log_in_google<P>(
    State(state): State<LogInState<P>>,
    Form(token_data): Form<GoogleLogInData>,
) -> Response
where
    P: IdentityProvider,
{
    match state
        .auth_gate
        .sign_in_with_google(&token_data.credential)
        .await
    {
        Ok(()) => Redirect::to(endpoints::ROOT).into_response(),
        Err(error) => {
            if let Error::AuthProviderError(message) = &error {
                tracing::error!("Unhandled error while signing in with Google: {message}");
            }

            log_in_page(
                "",
                Some(google_error_message(&error)),
                None,
                state.google_client_id.as_deref(),
            )
            .into_response()
        }
    }
}

/// Handler that grants an admin session without provider credentials.
#[cfg(feature = "dev-override")]
pub async fn post_log_in_dev<P>(State(state): State<LogInState<P>>) -> Response
where
    P: IdentityProvider,
{
    state.auth_gate.sign_in_dev_override();

    Redirect::to(endpoints::ROOT).into_response()
}
