//! Identity gate
//!
//! Sessions belong to the external identity provider. This module only answers
//! "who is the current user, if anyone" and exposes the provider's sign-in /
//! sign-out entry points for the views.

mod jwt;

pub use jwt::{JwtSessionProvider, SessionClaims};

use actix_web::HttpRequest;

/// The signed-in user as seen by this app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub display_name: Option<String>,
}

/// Where the sign-in / sign-out controls point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthControls {
    pub sign_in_url: String,
    pub sign_out_url: String,
}

pub trait IdentityProvider: Send + Sync {
    /// Current user, or `None` when the request carries no valid session
    fn current_session(&self, req: &HttpRequest) -> Option<Session>;

    fn controls(&self) -> &AuthControls;
}
