//! API token issuance and validation.
//!
//! Tokens are HS256 JWTs signed with the shared `JWT_SECRET`. The subject is
//! the user's ObjectId in hex; the middleware re-reads the user on every
//! request, so admin rights and deletions take effect before expiry.

use jsonwebtoken::{
    decode, encode, errors::Error as JwtError, get_current_timestamp, Algorithm, DecodingKey,
    EncodingKey, Header, Validation,
};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Token lifetime when `JWT_EXPIRY_SECS` is not set (4 hours).
pub const DEFAULT_TOKEN_EXPIRY_SECS: u64 = 4 * 60 * 60;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret used to sign and verify tokens
    pub secret: String,
    /// Token lifetime in seconds
    pub token_expiry: u64,
}

/// Claims carried by an API token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// User id (hex ObjectId)
    pub sub: String,
    pub email: String,
    pub iat: u64,
    pub exp: u64,
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    pub fn generate_token(&self, user_id: ObjectId, email: &str) -> Result<String, JwtError> {
        let now = get_current_timestamp();
        let claims = Claims {
            sub: user_id.to_hex(),
            email: email.to_string(),
            iat: now,
            exp: now + self.config.token_expiry,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    /// Checks signature, algorithm and expiry.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    pub fn token_expiry(&self) -> u64 {
        self.config.token_expiry
    }
}
