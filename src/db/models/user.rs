//! User Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

pub type UserId = RecordId;

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

/// User account (password stored as an argon2 hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<UserId>,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default = "default_avatar")]
    pub avatar: String,
    #[serde(default)]
    pub phone: String,
    /// "user" or "admin"
    #[serde(default = "default_role")]
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_avatar() -> String {
    "https://cdn-icons-png.flaticon.com/512/149/149071.png".to_string()
}

fn default_role() -> String {
    ROLE_USER.to_string()
}

impl User {
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            name,
            email,
            password_hash,
            avatar: default_avatar(),
            phone: String::new(),
            role: default_role(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// Verify a password against the stored hash using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.password_hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using argon2 with a random salt
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

/// Public view of a user, safe to serialize to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub phone: String,
    pub role: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            name: user.name.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
            phone: user.phone.clone(),
            role: user.role.clone(),
        }
    }
}

/// Update payload (admin user management)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        let hash = User::hash_password("Sup3rSecret").expect("hashing should succeed");
        let user = User::new("Test".into(), "t@example.com".into(), hash);

        assert!(user.verify_password("Sup3rSecret").unwrap());
        assert!(!user.verify_password("wrong").unwrap());
    }

    #[test]
    fn new_user_defaults_to_user_role() {
        let user = User::new("Test".into(), "t@example.com".into(), "h".into());
        assert_eq!(user.role, ROLE_USER);
        assert!(!user.is_admin());
    }
}
