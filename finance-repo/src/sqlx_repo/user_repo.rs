use crate::sqlx_repo::SQLxRepo;
use crate::user_repo::{NewUser, User, UserId, UserRepo, UserRepoError};
use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::query_as;
use tracing::instrument;

const SELECT_USER: &str =
    "SELECT id, external_auth_id, name, email, role, created_at FROM users";

#[async_trait]
impl UserRepo for SQLxRepo {
    #[instrument(skip(self))]
    async fn get_user(&self, user_id: UserId) -> Result<User, UserRepoError> {
        let user: Option<User> = query_as(&format!("{} WHERE id = ?", SELECT_USER))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Unable to get user {}", user_id))?;
        user.ok_or_else(|| UserRepoError::UserNotFound(user_id.to_string()))
    }

    #[instrument(skip(self))]
    async fn get_user_by_external_id(&self, external_auth_id: &str) -> Result<User, UserRepoError> {
        let user: Option<User> =
            query_as(&format!("{} WHERE external_auth_id = ?", SELECT_USER))
                .bind(external_auth_id)
                .fetch_optional(&self.pool)
                .await
                .with_context(|| format!("Unable to get user {}", external_auth_id))?;
        user.ok_or_else(|| UserRepoError::UserNotFound(external_auth_id.to_owned()))
    }

    #[instrument(skip(self))]
    async fn create_user(&self, new_user: NewUser) -> Result<User, UserRepoError> {
        let user: Option<User> = query_as(
            "INSERT INTO users(external_auth_id, name, email, role, created_at) VALUES (?, ?, ?, ?, ?) \
             ON CONFLICT DO NOTHING \
             RETURNING id, external_auth_id, name, email, role, created_at",
        )
        .bind(&new_user.external_auth_id)
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.role)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to create user {}", new_user.external_auth_id))?;
        user.ok_or(UserRepoError::UserAlreadyExists(new_user.external_auth_id))
    }
}
