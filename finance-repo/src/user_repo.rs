use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type UserId = i64;

pub const DEFAULT_ROLE: &str = "user";

#[async_trait]
pub trait UserRepo: Sync + Send {
    async fn get_user(&self, user_id: UserId) -> Result<User, UserRepoError>;
    async fn get_user_by_external_id(&self, external_auth_id: &str) -> Result<User, UserRepoError>;
    async fn create_user(&self, new_user: NewUser) -> Result<User, UserRepoError>;
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "sqlx-repo", derive(sqlx::FromRow))]
pub struct User {
    pub id: UserId,
    pub external_auth_id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewUser {
    pub external_auth_id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl NewUser {
    pub fn new(external_auth_id: String, name: String, email: String) -> NewUser {
        NewUser {
            external_auth_id,
            name,
            email,
            role: DEFAULT_ROLE.to_owned(),
        }
    }

    pub fn with_role(mut self, role: String) -> NewUser {
        self.role = role;
        self
    }

    pub fn to_user(self, id: UserId, created_at: DateTime<Utc>) -> User {
        User {
            id,
            external_auth_id: self.external_auth_id,
            name: self.name,
            email: self.email,
            role: self.role,
            created_at,
        }
    }
}

#[derive(Error, Debug)]
pub enum UserRepoError {
    #[error("User {0} not found")]
    UserNotFound(String),
    #[error("User {0} already exists")]
    UserAlreadyExists(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
