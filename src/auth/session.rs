//! Session token verification
//!
//! The identity provider signs a JWT (HS256) with a secret shared with this
//! service. The `sub` claim is the user ID every row is scoped by.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Cookie the identity provider stores the session token in
pub const SESSION_COOKIE: &str = "__session";

/// Claims read from a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User ID
    pub sub: String,
    /// Expiry (seconds since epoch)
    pub exp: usize,
    /// Issued at (seconds since epoch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<usize>,
    /// Issuer (identity provider instance)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Missing session token")]
    Missing,

    #[error("Session expired")]
    Expired,

    #[error("Invalid session token")]
    Invalid,
}

/// Verifies session tokens against the shared secret
#[derive(Clone)]
pub struct SessionVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(secret: &str, issuer: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify a token and return its claims
    pub fn verify(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(SessionError::Missing);
        }

        let data = decode::<SessionClaims>(token, &self.key, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
                _ => {
                    tracing::debug!("Rejected session token: {}", e);
                    SessionError::Invalid
                }
            }
        })?;

        if data.claims.sub.is_empty() {
            return Err(SessionError::Invalid);
        }

        Ok(data.claims)
    }
}

impl std::fmt::Debug for SessionVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionVerifier")
            .field("issuer", &self.validation.iss)
            .finish_non_exhaustive()
    }
}
