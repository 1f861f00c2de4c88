#![allow(dead_code, unused_macros)]

use finance_repo::user_repo::{NewUser, User};
use finance_repo::Repos;
use rstest::*;
use tracing::info;
use tracing::Level;
use uuid::Uuid;

pub mod mock;

macro_rules! build_app {
    ($repos:expr, $user_id:expr) => {{
        let repos: finance_repo::Repos = $repos.clone();
        let user_id: Option<finance_repo::user_repo::UserId> = $user_id;
        let app = App::new()
            .app_data(Data::new(repos.user_repo))
            .app_data(Data::new(repos.category_repo))
            .app_data(Data::new(repos.transaction_repo))
            .app_data(finance_lib::json_config())
            .app_data(finance_lib::query_config())
            .wrap(finance_lib::tracing::create_middleware())
            .service(finance_lib::user::user_service().wrap(MockAuthentication { user_id }))
            .service(finance_lib::category::category_service().wrap(MockAuthentication { user_id }))
            .service(
                finance_lib::transaction::transaction_service()
                    .wrap(MockAuthentication { user_id }),
            );
        tracing::info!("Built app");
        app
    }};
}

macro_rules! create_category {
    (&$service:ident, $payload:expr) => {{
        let request = TestRequest::post()
            .uri("/categories")
            .set_json($payload)
            .to_request();
        let response = test::call_service(&$service, request).await;
        assert_eq!(
            response.status(),
            actix_web::http::StatusCode::CREATED,
            "Got {} response when creating category",
            response.status()
        );
        let category: finance_repo::category_repo::Category = test::read_body_json(response).await;
        category
    }};
}

macro_rules! create_transaction {
    (&$service:ident, $payload:expr) => {{
        let request = TestRequest::post()
            .uri("/transactions")
            .set_json($payload)
            .to_request();
        let response = test::call_service(&$service, request).await;
        assert_eq!(
            response.status(),
            actix_web::http::StatusCode::CREATED,
            "Got {} response when creating transaction",
            response.status()
        );
        let transaction: finance_repo::transaction_repo::Transaction =
            test::read_body_json(response).await;
        transaction
    }};
}

pub async fn create_test_user(repos: &Repos) -> User {
    let external_auth_id = "test-user-".to_owned() + &Uuid::new_v4().to_string();
    let email = format!("{}@example.com", external_auth_id);
    let user = repos
        .user_repo
        .create_user(NewUser::new(external_auth_id, "Test User".to_owned(), email))
        .await
        .unwrap();
    info!(user_id = user.id, "Created user");
    user
}

#[fixture]
#[once]
pub fn tracing_setup() -> () {
    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_max_level(Level::DEBUG)
        .try_init();
    info!("tracing initialized");
}

#[fixture]
pub fn repos() -> Repos {
    finance_repo::mem_repo::create_repos()
}
