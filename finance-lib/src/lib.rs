#[macro_use]
extern crate actix_web;

use std::sync::Arc;

use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::web::{self, Data};
use actix_web::HttpResponse;
use actix_web_httpauth::middleware::HttpAuthentication;
use finance_repo::Repos;

use crate::auth::CredentialProvider;

pub mod auth;
pub mod category;
pub mod config;
pub mod error;
pub mod health;
pub mod tracing;
pub mod transaction;
pub mod user;
mod validation;

/// Registers shared state and every route of the API. Everything except `/auth` and `/health`
/// sits behind bearer authentication.
pub fn app_config_func(
    credentials: Arc<dyn CredentialProvider>,
    repos: Repos,
    signups_enabled: bool,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let bearer_auth_middleware = HttpAuthentication::bearer(auth::credentials_validator);
        cfg.app_data(Data::new(credentials))
            .app_data(Data::new(repos.user_repo))
            .app_data(Data::new(repos.category_repo))
            .app_data(Data::new(repos.transaction_repo))
            .app_data(Data::new(repos.health_check))
            .app_data(json_config())
            .app_data(query_config())
            .service(health::health)
            .service(auth::auth_service(signups_enabled))
            .service(user::user_service().wrap(bearer_auth_middleware.clone()))
            .service(category::category_service().wrap(bearer_auth_middleware.clone()))
            .service(transaction::transaction_service().wrap(bearer_auth_middleware));
    }
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        ::tracing::error!(req_path = req.path(), %err);
        match err {
            JsonPayloadError::Deserialize(deserialize_err) => {
                let error_body = serde_json::json!({
                    "error": "Unable to parse JSON payload",
                    "detail": format!("{}", deserialize_err),
                });
                InternalError::from_response(
                    deserialize_err,
                    HttpResponse::BadRequest().json(error_body),
                )
                .into()
            }
            _ => err.into(),
        }
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, req| {
        ::tracing::error!(req_path = req.path(), %err);
        match err {
            QueryPayloadError::Deserialize(deserialize_err) => {
                let error_body = serde_json::json!({
                    "error": "Unable to parse query string",
                    "detail": format!("{}", deserialize_err),
                });
                InternalError::from_response(
                    deserialize_err,
                    HttpResponse::BadRequest().json(error_body),
                )
                .into()
            }
            _ => err.into(),
        }
    })
}
