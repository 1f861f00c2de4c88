use std::sync::Arc;

use actix_web::dev::ServiceRequest;
use actix_web::error::ErrorInternalServerError;
use actix_web::web::{self, Data};
use actix_web::{Error, HttpMessage, Scope};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use actix_web_httpauth::extractors::{bearer, AuthenticationError};
use actix_web_httpauth::headers::www_authenticate::bearer::Bearer;
use finance_repo::user_repo::UserId;
use thiserror::Error;
use tracing::{debug, error};
use tracing_actix_web::RootSpan;

pub mod handlers;
pub mod jwt;

/// Issues bearer credentials and turns them back into the user they were issued for.
pub trait CredentialProvider: Send + Sync {
    fn issue(&self, user: UserId) -> Result<String, AuthError>;
    fn authenticate(&self, token: &str) -> Result<UserId, AuthError>;
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
    #[error("Unable to create token")]
    TokenCreation(#[source] jsonwebtoken::errors::Error),
}

pub fn auth_service(signups_enabled: bool) -> Scope {
    let scope = web::scope("/auth").service(handlers::login);
    if signups_enabled {
        scope.service(handlers::signup)
    } else {
        scope
    }
}

/// Validates credentials using the registered [CredentialProvider]. If valid, injects the user id
/// into the request and into the [RootSpan]
pub async fn credentials_validator(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let authenticated = req
        .app_data::<Data<Arc<dyn CredentialProvider>>>()
        .map(|provider| provider.authenticate(credentials.token()));

    match authenticated {
        Some(Ok(user)) => {
            if let Some(root_span) = req.extensions().get::<RootSpan>() {
                root_span.record("user_id", &user);
            }
            req.extensions_mut().insert::<UserId>(user);
            Ok(req)
        }
        Some(Err(e)) => {
            debug!(error = %e, "Rejected bearer token");
            let challenge = Bearer::build().error(bearer::Error::InvalidToken).finish();
            Err((AuthenticationError::new(challenge).into(), req))
        }
        None => {
            error!("No credential provider registered");
            Err((ErrorInternalServerError("Internal server error"), req))
        }
    }
}
