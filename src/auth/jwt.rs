//! Bearer-token generation and validation.
//!
//! Tokens are HS256-signed JWTs whose subject is the user's id. They are
//! opaque to clients; the server is the only party that signs or inspects
//! them.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, the user's id.
    pub sub: Uuid,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

pub fn issue_token(
    user_id: Uuid,
    secret: &str,
    expiry_hours: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        exp: now + expiry_hours * 3600,
        iat: now,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Validate signature and expiry, returning the embedded [`Claims`].
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-long-enough-for-hmac";

    #[test]
    fn issue_and_validate_round_trip() {
        let user_id = Uuid::now_v7();
        let token = issue_token(user_id, SECRET, 1).expect("token generation should succeed");

        let claims = validate_token(&token, SECRET).expect("token validation should succeed");
        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_fails() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::now_v7(),
            // Well past the default 60-second leeway.
            exp: now - 300,
            iat: now - 600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("encoding should succeed");

        assert!(validate_token(&token, SECRET).is_err());
    }

    #[test]
    fn wrong_secret_fails() {
        let token = issue_token(Uuid::now_v7(), SECRET, 1).expect("token generation should succeed");
        assert!(validate_token(&token, "some-other-secret").is_err());
    }
}
