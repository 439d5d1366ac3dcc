//! User identity and permission claims

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::AppError;

/// Named permission gating loan renewal and the all-borrowed listing
pub const CAN_MARK_RETURNED: &str = "catalog.can_mark_returned";
/// Named permission gating author creation
pub const CAN_ADD_AUTHOR: &str = "catalog.can_add_author";
/// Named permission gating book, copy, genre and language creation
pub const CAN_ADD_BOOK: &str = "catalog.can_add_book";

/// User model from database.
///
/// Identity lives outside the catalog: the server authenticates existing
/// users and reads their permission grants, nothing more.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub permissions: Vec<String>,
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

    pub fn has_permission(&self, name: &str) -> bool {
        self.permissions.iter().any(|p| p == name)
    }

    /// Require a named permission, failing with Forbidden when absent
    pub fn require_permission(&self, name: &str) -> Result<(), AppError> {
        if self.has_permission(name) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Missing required permission: {}",
                name
            )))
        }
    }

    pub fn require_mark_returned(&self) -> Result<(), AppError> {
        self.require_permission(CAN_MARK_RETURNED)
    }

    pub fn require_add_author(&self) -> Result<(), AppError> {
        self.require_permission(CAN_ADD_AUTHOR)
    }

    pub fn require_add_book(&self) -> Result<(), AppError> {
        self.require_permission(CAN_ADD_BOOK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn claims_with(permissions: Vec<String>) -> UserClaims {
        let now = Utc::now().timestamp();
        UserClaims {
            sub: "testuser".to_string(),
            user_id: 1,
            permissions,
            exp: now + 3600,
            iat: now,
        }
    }

    #[test]
    fn token_round_trip() {
        let claims = claims_with(vec![CAN_MARK_RETURNED.to_string()]);
        let token = claims.create_token("test-secret").unwrap();
        let decoded = UserClaims::from_token(&token, "test-secret").unwrap();
        assert_eq!(decoded.sub, "testuser");
        assert_eq!(decoded.user_id, 1);
        assert!(decoded.has_permission(CAN_MARK_RETURNED));
    }

    #[test]
    fn token_with_wrong_secret_is_rejected() {
        let claims = claims_with(vec![]);
        let token = claims.create_token("test-secret").unwrap();
        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn require_permission_checks_the_exact_name() {
        let claims = claims_with(vec![CAN_ADD_AUTHOR.to_string()]);
        assert!(claims.require_add_author().is_ok());
        assert!(matches!(
            claims.require_mark_returned(),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            claims.require_add_book(),
            Err(AppError::Forbidden(_))
        ));
    }
}
