#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{App, HttpServer};
use finance_client::{FinanceClient, MemoryCredentialStore};
use finance_lib::auth::jwt::JWTAuth;
use finance_lib::auth::CredentialProvider;
use finance_repo::Repos;
use rstest::fixture;

pub struct TestServer {
    pub base_url: String,
    pub repos: Repos,
}

/// Serves the API over in-memory repos on an ephemeral local port.
pub async fn start_server() -> TestServer {
    let repos = finance_repo::mem_repo::create_repos();
    let secret: [u8; 32] = rand::random();
    let credentials: Arc<dyn CredentialProvider> = Arc::new(JWTAuth::from_secret(secret.to_vec()));

    let app_repos = repos.clone();
    let server = HttpServer::new(move || {
        App::new().configure(finance_lib::app_config_func(
            credentials.clone(),
            app_repos.clone(),
            true,
        ))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .unwrap();
    let address = server.addrs()[0];
    actix_rt::spawn(server.run());

    TestServer {
        base_url: format!("http://{}", address),
        repos,
    }
}

#[fixture]
pub fn store() -> Arc<MemoryCredentialStore> {
    Arc::new(MemoryCredentialStore::default())
}

pub fn client(server: &TestServer, store: &Arc<MemoryCredentialStore>) -> FinanceClient {
    FinanceClient::new(server.base_url.clone(), store.clone())
}
