//! User Repository

use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::{User, UserUpdate};

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all users
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY createdAt")
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let user: Option<User> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(user)
    }

    /// Find user by email (emails are unique)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user
    ///
    /// Rejects duplicate emails before writing.
    pub async fn create(&self, user: User) -> RepoResult<User> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "User with email '{}' already exists",
                user.email
            )));
        }

        let created: Option<User> = self.base.db().create(TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Update a user (admin management)
    pub async fn update(&self, id: &str, data: UserUpdate) -> RepoResult<User> {
        let mut user = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))?;

        if let Some(email) = &data.email
            && email != &user.email
            && self.find_by_email(email).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "User with email '{}' already exists",
                email
            )));
        }

        if let Some(v) = data.name {
            user.name = v;
        }
        if let Some(v) = data.email {
            user.email = v;
        }
        if let Some(v) = data.phone {
            user.phone = v;
        }
        if let Some(v) = data.avatar {
            user.avatar = v;
        }
        if let Some(v) = data.role {
            user.role = v;
        }
        user.updated_at = Utc::now();

        let pure_id = strip_table_prefix(TABLE, id).to_string();
        let mut content = user;
        content.id = None;
        let updated: Option<User> = self.base.db().update((TABLE, pure_id)).content(content).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Delete a user
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let pure_id = strip_table_prefix(TABLE, id);
        let result: Option<User> = self.base.db().delete((TABLE, pure_id)).await?;
        if result.is_none() {
            return Err(RepoError::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }
}
