//! User model, groups, permissions and JWT claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::AppError;

/// Group granting access to the member-facing borrowed list
pub const GROUP_LIBRARY_MEMBERS: &str = "Library Members";

/// Permission flags checked by the gated handlers
pub const PERM_CAN_MARK_RETURNED: &str = "can_mark_returned";
pub const PERM_CAN_MODIFY_AUTHOR_LIST: &str = "can_modify_author_list";
pub const PERM_ADD_BOOK: &str = "add_book";
pub const PERM_CHANGE_BOOK: &str = "change_book";
pub const PERM_DELETE_BOOK: &str = "delete_book";

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub crea_date: Option<DateTime<Utc>>,
}

/// JWT claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub groups: Vec<String>,
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

    fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    fn require_permission(&self, permission: &str) -> Result<(), AppError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Missing permission: {}",
                permission
            )))
        }
    }

    // Authorization checks, called first in every gated handler body

    pub fn require_mark_returned(&self) -> Result<(), AppError> {
        self.require_permission(PERM_CAN_MARK_RETURNED)
    }

    pub fn require_modify_author_list(&self) -> Result<(), AppError> {
        self.require_permission(PERM_CAN_MODIFY_AUTHOR_LIST)
    }

    pub fn require_add_book(&self) -> Result<(), AppError> {
        self.require_permission(PERM_ADD_BOOK)
    }

    pub fn require_change_book(&self) -> Result<(), AppError> {
        self.require_permission(PERM_CHANGE_BOOK)
    }

    pub fn require_delete_book(&self) -> Result<(), AppError> {
        self.require_permission(PERM_DELETE_BOOK)
    }

    /// Require membership in the "Library Members" group
    pub fn require_library_member(&self) -> Result<(), AppError> {
        if self.groups.iter().any(|g| g == GROUP_LIBRARY_MEMBERS) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Membership in the '{}' group required",
                GROUP_LIBRARY_MEMBERS
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(groups: &[&str], permissions: &[&str]) -> UserClaims {
        UserClaims {
            sub: "librarian".to_string(),
            user_id: 1,
            groups: groups.iter().map(|s| s.to_string()).collect(),
            permissions: permissions.iter().map(|s| s.to_string()).collect(),
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn permission_check_allows_holder() {
        let c = claims(&[], &[PERM_CAN_MARK_RETURNED]);
        assert!(c.require_mark_returned().is_ok());
    }

    #[test]
    fn permission_check_denies_non_holder() {
        let c = claims(&[], &[PERM_ADD_BOOK]);
        assert!(matches!(
            c.require_mark_returned(),
            Err(AppError::Authorization(_))
        ));
    }

    #[test]
    fn book_permissions_are_independent() {
        let c = claims(&[], &[PERM_ADD_BOOK]);
        assert!(c.require_add_book().is_ok());
        assert!(c.require_change_book().is_err());
        assert!(c.require_delete_book().is_err());
    }

    #[test]
    fn group_check_requires_library_members() {
        let member = claims(&[GROUP_LIBRARY_MEMBERS], &[]);
        assert!(member.require_library_member().is_ok());

        let outsider = claims(&["Staff"], &[]);
        assert!(outsider.require_library_member().is_err());
    }
}
