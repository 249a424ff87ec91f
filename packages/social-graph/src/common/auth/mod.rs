//! Caller identity for the social graph API.
//!
//! Tokens are issued elsewhere; this module only verifies them and turns the
//! claims into an [`AuthenticatedPrincipal`] handlers can extract.

mod errors;
mod jwt;
mod principal;

pub use errors::AuthError;
pub use jwt::{Claims, JwtService};
pub use principal::{AuthenticatedPrincipal, Role};
