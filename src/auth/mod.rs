//! Authentication module
//!
//! Sessions are issued by an external identity provider. This service only
//! verifies the provider's signed session token and reads the user ID from it.

mod session;

pub use session::{SessionClaims, SessionError, SessionVerifier, SESSION_COOKIE};
