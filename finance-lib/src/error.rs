use actix_web::body::BoxBody;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use finance_repo::category_repo::CategoryRepoError;
use finance_repo::summary::TotalsOverflow;
use finance_repo::transaction_repo::TransactionRepoError;
use finance_repo::user_repo::UserRepoError;
use thiserror::Error;
use tracing::error;

use crate::auth::AuthError;

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("Owner id is required")]
    MissingOwner,
    #[error("Owner id does not match the authenticated user")]
    OwnerMismatch,
    #[error(transparent)]
    UserError(#[from] UserRepoError),
    #[error(transparent)]
    CategoryError(#[from] CategoryRepoError),
    #[error(transparent)]
    TransactionError(#[from] TransactionRepoError),
    #[error(transparent)]
    AuthError(#[from] AuthError),
    #[error(transparent)]
    TotalsError(#[from] TotalsOverflow),
}

impl HandlerError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> HandlerError {
        HandlerError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

impl ResponseError for HandlerError {
    fn status_code(&self) -> StatusCode {
        match self {
            HandlerError::MissingFields(_)
            | HandlerError::InvalidField { .. }
            | HandlerError::MissingOwner => StatusCode::BAD_REQUEST,
            HandlerError::OwnerMismatch => StatusCode::UNAUTHORIZED,
            HandlerError::UserError(e) => match e {
                UserRepoError::UserNotFound(_) => StatusCode::NOT_FOUND,
                UserRepoError::UserAlreadyExists(_) => StatusCode::CONFLICT,
                UserRepoError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            HandlerError::CategoryError(e) => match e {
                CategoryRepoError::CategoryNotFound(_) => StatusCode::NOT_FOUND,
                CategoryRepoError::CategoryInUse(_) => StatusCode::CONFLICT,
                CategoryRepoError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            HandlerError::TransactionError(e) => match e {
                TransactionRepoError::TransactionNotFound(_) => StatusCode::NOT_FOUND,
                // The transaction payload references a category it may not use.
                TransactionRepoError::CategoryNotFound(_)
                | TransactionRepoError::KindMismatch { .. } => StatusCode::BAD_REQUEST,
                TransactionRepoError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            HandlerError::AuthError(_) | HandlerError::TotalsError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!(error = ?self, "Request failed");
            "Internal server error".to_owned()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(serde_json::json!({ "error": message }))
    }
}
