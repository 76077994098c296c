//! Signed bearer tokens (HS256 JWT).
//!
//! Tokens are stateless: a token is valid if and only if its signature
//! verifies under the server secret, it names a non-empty username, and it
//! has not expired.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::unix_now;

/// Default token lifetime: 24 hours.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;

/// JWT claims payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub iat: u64,
    pub exp: u64,
}

/// Every verification failure collapses into this one error.
#[derive(Debug, thiserror::Error)]
#[error("Invalid or expired token")]
pub struct InvalidToken;

/// Mints and checks tokens with a process-wide secret.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("secret", &"[REDACTED]")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_secs,
        }
    }

    /// Issue a token for `username`, valid from now.
    pub fn issue(&self, username: &str) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_at(username, unix_now())
    }

    /// Issue a token as if it had been minted at `issued_at` (Unix seconds).
    pub fn issue_at(
        &self,
        username: &str,
        issued_at: u64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            username: username.to_string(),
            iat: issued_at,
            exp: issued_at.saturating_add(self.ttl_secs),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    /// Verify a token and return the username it was issued for.
    pub fn verify(&self, token: &str) -> Result<String, InvalidToken> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            // Cause stays server-side; callers only ever see InvalidToken
            tracing::debug!(error = %e, "Token rejected");
            InvalidToken
        })?;

        if data.claims.username.is_empty() {
            tracing::debug!("Token rejected: empty username claim");
            return Err(InvalidToken);
        }

        Ok(data.claims.username)
    }
}
