use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use finance_repo::user_repo::UserRepo;

use crate::error::HandlerError;
use crate::user::Owner;

#[get("")]
pub async fn get_current_user(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    owner: Owner,
) -> Result<impl Responder, HandlerError> {
    let user = user_repo.get_user(owner.0).await?;
    Ok(HttpResponse::Ok().json(user))
}
