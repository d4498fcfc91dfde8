use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::{SecurityConfig, MAX_JWT_EXPIRY_HOURS};
use crate::types::Role;

/// Claims carried by a credential.
///
/// `role` is the role at issuance time. It is informational only: access
/// decisions are always made against the profile resolved per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    /// Deliberately carries no detail: malformed, badly signed and expired
    /// tokens are indistinguishable to callers.
    #[error("Invalid or expired token")]
    Invalid,

    #[error("JWT secret is not configured")]
    MissingSecret,

    #[error("Token expiry must be positive and within range")]
    InvalidExpiry,

    #[error("JWT generation error: {0}")]
    Generation(String),
}

/// A freshly signed credential
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
    pub claims: Claims,
}

/// Issues and verifies HS256 credentials. Stateless; never touches the store.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, issuer: impl Into<String>, ttl: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }
        if ttl <= Duration::zero() {
            return Err(TokenError::InvalidExpiry);
        }

        let issuer = issuer.into();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&issuer]);
        validation.set_required_spec_claims(&["exp", "iat", "iss", "sub"]);
        // Expiry is a hard edge
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            issuer,
            ttl,
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, TokenError> {
        if security.jwt_expiry_hours > MAX_JWT_EXPIRY_HOURS {
            return Err(TokenError::InvalidExpiry);
        }
        Self::new(
            &security.jwt_secret,
            security.jwt_issuer.clone(),
            Duration::hours(security.jwt_expiry_hours as i64),
        )
    }

    /// Bind identity, email and role into a signed credential
    pub fn issue(&self, user_id: Uuid, email: &str, role: Role) -> Result<IssuedToken, TokenError> {
        let now = Utc::now();
        let expires_at = now.checked_add_signed(self.ttl).ok_or(TokenError::InvalidExpiry)?;
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
        };

        let token = self.sign(&claims)?;
        Ok(IssuedToken {
            token,
            expires_in: self.ttl.num_seconds(),
            claims,
        })
    }

    /// Check signature, issuer and expiry. Any failure is `Invalid`.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                TokenError::Invalid
            })
    }

    pub(crate) fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }
}
