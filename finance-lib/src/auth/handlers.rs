use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use finance_repo::user_repo::{NewUser, User, UserRepo};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::CredentialProvider;
use crate::error::HandlerError;
use crate::validation;

#[derive(Serialize, Deserialize)]
pub struct SignupRequest {
    pub external_auth_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl SignupRequest {
    fn into_new_user(self) -> Result<NewUser, HandlerError> {
        let external_auth_id = validation::text(self.external_auth_id);
        let name = validation::text(self.name);
        let email = validation::text(self.email);
        match (external_auth_id, name, email) {
            (Some(external_auth_id), Some(name), Some(email)) => {
                let new_user = NewUser::new(external_auth_id, name, email);
                Ok(match validation::text(self.role) {
                    Some(role) => new_user.with_role(role),
                    None => new_user,
                })
            }
            (external_auth_id, name, email) => Err(validation::missing([
                ("external_auth_id", external_auth_id.is_none()),
                ("name", name.is_none()),
                ("email", email.is_none()),
            ])),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct LoginRequest {
    pub external_auth_id: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

#[post("/signup")]
pub async fn signup(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    request: web::Json<SignupRequest>,
) -> Result<impl Responder, HandlerError> {
    let new_user = request.into_inner().into_new_user()?;
    let user = user_repo.create_user(new_user).await?;
    info!(user_id = user.id, "Registered user");

    Ok(HttpResponse::Created().json(user))
}

/// Exchanges an identity issued by the external provider for a bearer token.
#[post("/login")]
pub async fn login(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    credentials: web::Data<Arc<dyn CredentialProvider>>,
    request: web::Json<LoginRequest>,
) -> Result<impl Responder, HandlerError> {
    let external_auth_id = validation::text(request.into_inner().external_auth_id)
        .ok_or_else(|| validation::missing([("external_auth_id", true)]))?;

    let user = user_repo.get_user_by_external_id(&external_auth_id).await?;
    let token = credentials.issue(user.id)?;

    Ok(HttpResponse::Ok().json(LoginResponse { user, token }))
}
