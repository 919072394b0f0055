//! The single-admin identity gate and its supporting pieces: the identity
//! provider abstraction, the Google Identity Toolkit implementation, and the
//! route guard middleware.

mod gate;
mod identity_toolkit;
mod middleware;
mod provider;

#[cfg(test)]
pub(crate) mod test_utils;

pub use gate::{ADMIN_EMAIL, AuthGate};
pub use identity_toolkit::IdentityToolkitProvider;
pub use middleware::{AuthGateState, admin_guard, admin_guard_hx};
pub(crate) use middleware::normalize_redirect_url;
pub use provider::{Identity, IdentityProvider, ProviderError};
