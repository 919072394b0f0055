//! Middleware that keeps the admin-only routes behind the identity gate.

use axum::{
    extract::{FromRef, Request, State},
    http::{StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::HxRedirect;

use crate::{AppState, auth::IdentityProvider, endpoints, transaction::TransactionStore};

use super::gate::AuthGate;

/// The state needed for the admin guard middleware.
#[derive(Debug, Clone)]
pub struct AuthGateState<P>
where
    P: IdentityProvider,
{
    /// The gate holding the current session.
    pub auth_gate: AuthGate<P>,
}

impl<S, P> FromRef<AppState<S, P>> for AuthGateState<P>
where
    S: TransactionStore,
    P: IdentityProvider,
{
    fn from_ref(state: &AppState<S, P>) -> Self {
        Self {
            auth_gate: state.auth_gate.clone(),
        }
    }
}

fn is_safe_redirect_target(target: &str) -> bool {
    if !target.starts_with('/') || target.starts_with("//") {
        return false;
    }

    let path = target
        .split_once('?')
        .map(|(path, _)| path)
        .unwrap_or(target);

    path != endpoints::LOG_IN_VIEW
}

/// Validate a user-supplied redirect URL, keeping only same-site paths that
/// do not point back at the log-in page.
pub(crate) fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }
    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_target(path_and_query).then(|| path_and_query.to_owned())
}

/// Build the log-in page URL with `target` as the post-sign-in destination.
///
/// Unsafe or missing targets fall back to the plain log-in page.
fn build_log_in_redirect_url(target: Option<&str>) -> String {
    let Some(target) = target.filter(|target| is_safe_redirect_target(target)) else {
        return endpoints::LOG_IN_VIEW.to_owned();
    };

    match serde_urlencoded::to_string([("redirect_url", target)]) {
        Ok(param) => format!("{}?{}", endpoints::LOG_IN_VIEW, param),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {target}: {error}");
            endpoints::LOG_IN_VIEW.to_owned()
        }
    }
}

/// The destination to come back to after signing in, taken from the
/// HX-Current-URL header since the request URI of an API call is not a page.
fn redirect_target_from_hx_request(request: &Request) -> Option<String> {
    let current_url = request
        .headers()
        .get("hx-current-url")
        .and_then(|header| header.to_str().ok())?;

    let uri = current_url.parse::<Uri>().ok()?;

    Some(uri.path_and_query()?.as_str().to_owned())
}

/// Middleware function that lets the request through only when the current
/// session belongs to the administrator, otherwise redirects to the log-in
/// page with the request URI as the post-sign-in destination.
pub async fn admin_guard<P>(
    State(state): State<AuthGateState<P>>,
    request: Request,
    next: Next,
) -> Response
where
    P: IdentityProvider,
{
    if state.auth_gate.is_admin() {
        return next.run(request).await;
    }

    let target = request
        .uri()
        .path_and_query()
        .map(|path_and_query| path_and_query.as_str().to_owned());

    Redirect::to(&build_log_in_redirect_url(target.as_deref())).into_response()
}

/// Middleware function like [admin_guard] for HTMX requests: a rejection is
/// an HX-Redirect to the log-in page rather than an HTTP redirect, since
/// HTMX follows HTTP redirects inside the swap target.
pub async fn admin_guard_hx<P>(
    State(state): State<AuthGateState<P>>,
    request: Request,
    next: Next,
) -> Response
where
    P: IdentityProvider,
{
    if state.auth_gate.is_admin() {
        return next.run(request).await;
    }

    let target = redirect_target_from_hx_request(&request);
    let redirect_url = build_log_in_redirect_url(target.as_deref());

    (HxRedirect(redirect_url), StatusCode::OK).into_response()
}
