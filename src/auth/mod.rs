// ============================================================================
// Authentication
// ============================================================================
//
// - session  - signed-cookie sessions and the AuthContext request extractor
// - provider - OAuth2 authorization-code client for the identity provider
//
// No server-side session state: everything a request needs to prove who it
// is travels in a cookie signed with the application key.
//
// ============================================================================

mod provider;
mod session;

pub use provider::{IdentityProvider, OidcConfig, OidcProvider};
pub use session::{AuthContext, SessionManager, SESSION_COOKIE, STATE_COOKIE};

#[cfg(test)]
pub(crate) use provider::testing;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Login state does not match")]
    StateMismatch,

    #[error("Login was denied: {0}")]
    Denied(String),

    #[error("Identity provider request failed: {0}")]
    Provider(String),

    #[error("Could not create session cookie")]
    Session,
}
