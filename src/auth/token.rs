use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{AuthError, Clock, Identity};
use crate::config::{ConfigError, SecurityConfig};

/// Token lifetime used when the caller doesn't ask for one.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies bearer tokens with a single symmetric secret.
///
/// The codec holds no mutable state and is shared across requests behind an
/// `Arc`. The secret comes in through the constructor; there is no fallback.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("default_ttl", &self.default_ttl)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(
        secret: &[u8],
        default_ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        if secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against our own clock in `verify`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            default_ttl,
            clock,
        })
    }

    /// Build the codec from startup configuration.
    ///
    /// # Errors
    /// * `ConfigError::MissingSecret` - `JWT_SECRET` absent or blank
    /// * `ConfigError::Invalid` - expiry hours put `exp` past the representable range
    pub fn from_config(
        security: &SecurityConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        let secret = security.require_secret()?;
        let invalid_hours = || ConfigError::Invalid {
            var: "SECURITY_JWT_EXPIRY_HOURS",
            value: security.jwt_expiry_hours.to_string(),
        };
        let ttl = i64::try_from(security.jwt_expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .ok_or_else(invalid_hours)?;
        if clock.now().checked_add_signed(ttl).is_none() {
            return Err(invalid_hours());
        }
        Self::new(secret.as_bytes(), ttl, clock)
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issue a signed token for `identity`, valid for `ttl` (or the default).
    ///
    /// A TTL under one second, or one whose expiry falls outside the
    /// representable date range, is `AuthError::InvalidTtl`.
    pub fn issue(&self, identity: &Identity, ttl: Option<Duration>) -> Result<String, AuthError> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        if ttl.num_seconds() < 1 {
            return Err(AuthError::InvalidTtl);
        }

        let now = self.clock.now();
        let expires_at = now.checked_add_signed(ttl).ok_or(AuthError::InvalidTtl)?;
        let claims = Claims {
            sub: identity.as_str().to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(AuthError::Signing)
    }

    /// Verify `token` and return the identity it was issued for.
    ///
    /// Signature and structure are checked first, so a forged token never
    /// reports as expired.
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AuthError::InvalidToken)?;
        let claims = data.claims;

        let identity = Identity::new(claims.sub).map_err(|_| AuthError::InvalidToken)?;

        if self.clock.now().timestamp() >= claims.exp {
            return Err(AuthError::ExpiredToken);
        }

        Ok(identity)
    }
}
