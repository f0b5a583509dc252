//! Access claims carried by bearer tokens

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Rights levels on the books collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rights {
    None = 0,
    Read = 1,
    Write = 2,
}

/// JWT Claims for callers of the books routes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookClaims {
    pub sub: String,
    pub rights: Rights,
    pub exp: i64,
    pub iat: i64,
}

impl BookClaims {
    /// Claims for `sub` valid for `expiration_hours` from now
    pub fn new(sub: impl Into<String>, rights: Rights, expiration_hours: u64) -> Self {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::hours(expiration_hours as i64);
        Self {
            sub: sub.into(),
            rights,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    // Read is the only level checked: every books route, create included, sits behind it.
    pub fn require_read_books(&self) -> Result<(), AppError> {
        if self.rights as u8 >= Rights::Read as u8 {
            Ok(())
        } else {
            Err(AppError::Authorization("Insufficient rights to read books".to_string()))
        }
    }
}
