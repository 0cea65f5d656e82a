//! HS256 JSON web tokens

use chrono::DateTime;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use jsonwebtoken::errors::ErrorKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use super::{Payload, TokenError, TokenMaker};
use crate::config::MIN_SYMMETRIC_KEY_LEN;

const ISSUER: &str = "simplebank";

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
struct Claims {
    jti: String,
    sub: String, // Subject (username)
    iss: String,
    iat: i64,
    nbf: i64,
    exp: i64,
}

impl From<&Payload> for Claims {
    fn from(payload: &Payload) -> Self {
        Self {
            jti: payload.id.to_string(),
            sub: payload.username.clone(),
            iss: ISSUER.to_string(),
            iat: payload.issued_at.timestamp(),
            nbf: payload.issued_at.timestamp(),
            exp: payload.expired_at.timestamp(),
        }
    }
}

impl TryFrom<Claims> for Payload {
    type Error = TokenError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Payload {
            id: Uuid::parse_str(&claims.jti).map_err(|_| TokenError::Invalid)?,
            username: claims.sub,
            issued_at: DateTime::from_timestamp(claims.iat, 0).ok_or(TokenError::Invalid)?,
            expired_at: DateTime::from_timestamp(claims.exp, 0).ok_or(TokenError::Invalid)?,
        })
    }
}

/// Token maker signing with a shared secret
pub struct JwtMaker {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtMaker {
    pub fn new(secret_key: &str) -> Result<Self, TokenError> {
        if secret_key.len() < MIN_SYMMETRIC_KEY_LEN {
            return Err(TokenError::Create(format!(
                "invalid key size: must be at least {} characters",
                MIN_SYMMETRIC_KEY_LEN
            )));
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret_key.as_bytes()),
        })
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation
    }
}

impl TokenMaker for JwtMaker {
    fn create_token(&self, username: &str, duration: Duration) -> Result<(String, Payload), TokenError> {
        let payload = Payload::new(username, duration)?;
        let token = encode(
            &Header::new(Algorithm::HS256),
            &Claims::from(&payload),
            &self.encoding_key,
        )
        .map_err(|e| TokenError::Create(e.to_string()))?;
        Ok((token, payload))
    }

    fn verify_token(&self, token: &str) -> Result<Payload, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Self::validation()).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            },
        )?;
        Payload::try_from(token_data.claims)
    }
}
