//! Application router configuration with public and admin-gated route
//! definitions.

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::{
    AppState,
    auth::{IdentityProvider, admin_guard, admin_guard_hx},
    endpoints,
    internal_server_error::get_internal_server_error_page,
    log_in::{get_log_in_page, post_log_in, post_log_in_google},
    log_out::get_log_out,
    not_found::get_404_not_found,
    transaction::{
        TransactionStore, create_transaction_endpoint, delete_transaction_endpoint,
        edit_transaction_endpoint, get_edit_transaction_page, get_transactions_page,
    },
};

/// Return a router with all the app's routes.
///
/// Viewing the ledger and recording a transaction are public; editing and
/// deleting sit behind the admin guard.
pub fn build_router<S, P>(state: AppState<S, P>) -> Router
where
    S: TransactionStore,
    P: IdentityProvider,
{
    let public_routes = Router::new()
        .route(endpoints::ROOT, get(get_transactions_page::<S, P>))
        .route(
            endpoints::TRANSACTIONS_API,
            post(create_transaction_endpoint::<S>),
        )
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page::<P>))
        .route(endpoints::LOG_IN_API, post(post_log_in::<P>))
        .route(
            endpoints::LOG_IN_GOOGLE_API,
            post(post_log_in_google::<P>),
        )
        .route(endpoints::LOG_OUT, get(get_log_out::<P>))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    #[cfg(feature = "dev-override")]
    let public_routes = public_routes.route(
        endpoints::LOG_IN_DEV_API,
        post(crate::log_in::post_log_in_dev::<P>),
    );

    let admin_routes = Router::new()
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page::<S>),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_guard::<P>,
        ));

    // These PUT/DELETE routes need to use the HX-Redirect header for auth
    // redirects to work properly for HTMX requests.
    let admin_routes = admin_routes.merge(
        Router::new()
            .route(
                endpoints::TRANSACTION,
                put(edit_transaction_endpoint::<S>).delete(delete_transaction_endpoint::<S>),
            )
            .layer(middleware::from_fn_with_state(
                state.clone(),
                admin_guard_hx::<P>,
            )),
    );

    public_routes
        .merge(admin_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}
