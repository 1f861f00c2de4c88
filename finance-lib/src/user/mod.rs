mod handlers;

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest, Scope};
use finance_repo::user_repo::UserId;

use crate::error::HandlerError;

pub fn user_service() -> Scope {
    web::scope("/user").service(handlers::get_current_user)
}

/// The authenticated user that scopes every read and write. Rejected with
/// [HandlerError::MissingOwner] when authentication did not attach a user id.
#[derive(Clone, Copy, Debug)]
pub struct Owner(pub UserId);

impl FromRequest for Owner {
    type Error = HandlerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<UserId>()
                .copied()
                .map(Owner)
                .ok_or(HandlerError::MissingOwner),
        )
    }
}
