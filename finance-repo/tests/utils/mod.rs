#![allow(dead_code)]

pub mod generator;

use finance_repo::category_repo::{Category, NewCategory};
use finance_repo::kind::Kind;
use finance_repo::user_repo::{NewUser, User};
use finance_repo::Repos;
use tracing::info;
use uuid::Uuid;

const TEST_DATABASE_URL: &str = "sqlite::memory:";

#[derive(Debug)]
pub enum RepoType {
    SQLx,
    Mem,
}

pub async fn build_repos(repo_type: RepoType) -> Repos {
    match repo_type {
        RepoType::SQLx => finance_repo::sqlx_repo::create_repos(TEST_DATABASE_URL, 1)
            .await
            .unwrap(),
        RepoType::Mem => finance_repo::mem_repo::create_repos(),
    }
}

pub fn new_test_user() -> NewUser {
    let external_auth_id = "test-user-".to_owned() + &Uuid::new_v4().to_string();
    let email = format!("{}@example.com", external_auth_id);
    NewUser::new(external_auth_id, "Test User".to_owned(), email)
}

pub async fn create_test_user(repos: &Repos) -> User {
    let user = repos.user_repo.create_user(new_test_user()).await.unwrap();
    info!(user_id = user.id, "Created user");
    user
}

pub async fn create_category(repos: &Repos, user: &User, name: &str, kind: Kind) -> Category {
    repos
        .category_repo
        .create_category(user.id, NewCategory::new(name.to_owned(), kind))
        .await
        .unwrap()
}
