use chrono::{Duration, Utc};
use finance_repo::user_repo::UserId;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::Deserialize;
use serde::Serialize;

use crate::auth::{AuthError, CredentialProvider};

#[derive(Clone)]
pub struct JWTAuth {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

#[derive(Serialize, Deserialize)]
struct Claims {
    exp: usize,
    sub: String,
}

impl JWTAuth {
    const EXPIRE_DAYS: i64 = 30;

    pub fn from_secret(secret: Vec<u8>) -> JWTAuth {
        JWTAuth {
            encoding_key: EncodingKey::from_secret(&secret),
            decoding_key: DecodingKey::from_secret(&secret),
        }
    }

    fn generate_exp() -> usize {
        (Utc::now() + Duration::days(Self::EXPIRE_DAYS)).timestamp() as usize
    }
}

impl CredentialProvider for JWTAuth {
    fn issue(&self, user: UserId) -> Result<String, AuthError> {
        let claims = Claims {
            exp: Self::generate_exp(),
            sub: user.to_string(),
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(AuthError::TokenCreation)
    }

    fn authenticate(&self, token: &str) -> Result<UserId, AuthError> {
        let claim = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(AuthError::InvalidToken)?;
        claim
            .claims
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidToken(ErrorKind::InvalidSubject.into()))
    }
}
