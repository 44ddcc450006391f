//! Session Token Generation and Validation
//!
//! Uses EdDSA (Ed25519). The dashboard only needs the public key to verify
//! tokens issued by the identity provider; the private key is optional and
//! used by tooling and tests to mint tokens.
//!
//! The `role` claim is the only role the server trusts. Role hints held by
//! the client (cookies, local storage) are never consulted.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{AuthError, AuthResult};

/// Session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID as UUID string).
    pub sub: String,
    /// Role identifier assigned by the identity provider.
    pub role: String,
    /// Token ID (UUID string); one per login, keys the server-side session.
    pub jti: String,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at (Unix timestamp).
    pub iat: i64,
}

impl Claims {
    /// Parse the subject as a user ID.
    pub fn user_id(&self) -> AuthResult<Uuid> {
        self.sub.parse().map_err(|_| AuthError::InvalidToken)
    }

    /// Parse the token ID as a session ID.
    pub fn session_id(&self) -> AuthResult<Uuid> {
        self.jti.parse().map_err(|_| AuthError::InvalidToken)
    }
}

/// Decode a base64-encoded PEM key.
fn decode_pem_key(base64_key: &str) -> AuthResult<Vec<u8>> {
    STANDARD
        .decode(base64_key)
        .map_err(|_| AuthError::Internal("Invalid base64 in JWT key".to_string()))
}

/// Mint a session token.
///
/// # Arguments
/// * `user_id` - The user's UUID
/// * `role` - Role identifier to embed
/// * `private_key` - Ed25519 private key (PEM format, base64-encoded)
/// * `expiry_seconds` - Token validity (typically 900 = 15 min)
pub fn generate_session_token(
    user_id: Uuid,
    role: &str,
    private_key: &str,
    expiry_seconds: i64,
) -> AuthResult<String> {
    let now = Utc::now();

    let key_bytes = decode_pem_key(private_key)?;
    let encoding_key = EncodingKey::from_ed_pem(&key_bytes)
        .map_err(|e| AuthError::Internal(format!("Invalid Ed25519 private key: {e}")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        jti: Uuid::now_v7().to_string(),
        exp: (now + Duration::seconds(expiry_seconds)).timestamp(),
        iat: now.timestamp(),
    };

    Ok(encode(&Header::new(Algorithm::EdDSA), &claims, &encoding_key)?)
}

/// Validate and decode a session token.
///
/// Returns `TokenExpired` for an expired token and `InvalidToken` for any
/// other verification failure.
pub fn validate_session_token(token: &str, public_key: &str) -> AuthResult<Claims> {
    let mut validation = Validation::new(Algorithm::EdDSA);
    validation.validate_exp = true;
    validation.leeway = 0;

    let key_bytes = decode_pem_key(public_key)?;
    let decoding_key = DecodingKey::from_ed_pem(&key_bytes)
        .map_err(|e| AuthError::Internal(format!("Invalid Ed25519 public key: {e}")))?;

    let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| match e.kind()
    {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}
