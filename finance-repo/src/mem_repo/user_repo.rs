use crate::mem_repo::MemRepo;
use crate::user_repo::UserRepoError::{UserAlreadyExists, UserNotFound};
use crate::user_repo::{NewUser, User, UserId, UserRepo, UserRepoError};
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
impl UserRepo for MemRepo {
    async fn get_user(&self, user_id: UserId) -> Result<User, UserRepoError> {
        let read_guard = self.read_lock()?;

        read_guard
            .users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| UserNotFound(user_id.to_string()))
    }

    async fn get_user_by_external_id(&self, external_auth_id: &str) -> Result<User, UserRepoError> {
        let read_guard = self.read_lock()?;

        read_guard
            .users
            .values()
            .find(|u| u.external_auth_id == external_auth_id)
            .cloned()
            .ok_or_else(|| UserNotFound(external_auth_id.to_owned()))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, UserRepoError> {
        let mut write_guard = self.write_lock()?;

        let duplicate = write_guard.users.values().any(|u| {
            u.external_auth_id == new_user.external_auth_id || u.email == new_user.email
        });
        if duplicate {
            return Err(UserAlreadyExists(new_user.external_auth_id));
        }

        let id = write_guard.next_id();
        let user = new_user.to_user(id, Utc::now());
        write_guard.users.insert(id, user.clone());

        Ok(user)
    }
}
