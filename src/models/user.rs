//! User model and JWT claims
//!
//! Users exist only to authenticate API writers and admin-console staff;
//! there is no account management surface.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

/// User account from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_staff: bool,
}

/// Claims carried in a JWT token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub is_staff: bool,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
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

    /// Admin-console access requires a staff account
    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.is_staff {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Staff account required".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn claims(is_staff: bool) -> UserClaims {
        let now = Utc::now().timestamp();
        UserClaims {
            sub: "admin".to_string(),
            user_id: 1,
            is_staff,
            exp: now + 3600,
            iat: now,
        }
    }

    #[test]
    fn token_round_trip_preserves_claims() {
        let original = claims(true);
        let token = original.create_token("test-secret").unwrap();
        let decoded = UserClaims::from_token(&token, "test-secret").unwrap();

        assert_eq!(decoded.sub, "admin");
        assert_eq!(decoded.user_id, 1);
        assert!(decoded.is_staff);
    }

    #[test]
    fn token_with_wrong_secret_is_rejected() {
        let token = claims(true).create_token("test-secret").unwrap();
        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now().timestamp();
        let expired = UserClaims {
            exp: now - 3600,
            ..claims(true)
        };
        let token = expired.create_token("test-secret").unwrap();
        assert!(UserClaims::from_token(&token, "test-secret").is_err());
    }

    #[test]
    fn non_staff_claims_fail_staff_check() {
        assert!(claims(false).require_staff().is_err());
        assert!(claims(true).require_staff().is_ok());
    }
}
