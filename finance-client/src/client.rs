use std::sync::Arc;

use finance_repo::category_repo::{Category, CategoryId, NewCategory};
use finance_repo::kind::Kind;
use finance_repo::summary::Totals;
use finance_repo::transaction_repo::{Filter, NewTransaction, Transaction, TransactionId};
use finance_repo::user_repo::User;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::{ClientError, CredentialStore};

#[derive(Deserialize)]
struct Session {
    user: User,
    token: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct FinanceClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl FinanceClient {
    pub fn new(base_url: impl Into<String>, credentials: Arc<dyn CredentialStore>) -> FinanceClient {
        FinanceClient {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            credentials,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn is_logged_in(&self) -> Result<bool, ClientError> {
        Ok(self.credentials.load()?.is_some())
    }

    pub async fn signup(
        &self,
        external_auth_id: &str,
        name: &str,
        email: &str,
    ) -> Result<User, ClientError> {
        let request = self.http.post(self.url("/auth/signup")).json(&json!({
            "external_auth_id": external_auth_id,
            "name": name,
            "email": email,
        }));
        self.send_json(request).await
    }

    /// Exchanges the external identity for a token and stores it.
    pub async fn login(&self, external_auth_id: &str) -> Result<User, ClientError> {
        let request = self
            .http
            .post(self.url("/auth/login"))
            .json(&json!({ "external_auth_id": external_auth_id }));
        let session: Session = self.send_json(request).await?;
        self.credentials.save(&session.token)?;
        debug!(user_id = session.user.id, "Logged in");
        Ok(session.user)
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        self.credentials.clear()
    }

    pub async fn current_user(&self) -> Result<User, ClientError> {
        self.send_json(self.http.get(self.url("/user"))).await
    }

    pub async fn categories(&self, kind: Option<Kind>) -> Result<Vec<Category>, ClientError> {
        let mut request = self.http.get(self.url("/categories"));
        if let Some(kind) = kind {
            request = request.query(&[("kind", kind.as_str())]);
        }
        self.send_json(request).await
    }

    pub async fn create_category(
        &self,
        new_category: &NewCategory,
    ) -> Result<Category, ClientError> {
        let request = self.http.post(self.url("/categories")).json(new_category);
        self.send_json(request).await
    }

    pub async fn update_category(
        &self,
        category_id: CategoryId,
        updated_category: &NewCategory,
    ) -> Result<Category, ClientError> {
        let request = self
            .http
            .put(self.url(&format!("/categories/{}", category_id)))
            .json(updated_category);
        self.send_json(request).await
    }

    pub async fn delete_category(&self, category_id: CategoryId) -> Result<(), ClientError> {
        let request = self
            .http
            .delete(self.url(&format!("/categories/{}", category_id)));
        self.send(request).await?;
        Ok(())
    }

    pub async fn transactions(&self, filter: &Filter) -> Result<Vec<Transaction>, ClientError> {
        let request = self.http.get(self.url("/transactions")).query(filter);
        self.send_json(request).await
    }

    pub async fn summary(&self, filter: &Filter) -> Result<Totals, ClientError> {
        let request = self.http.get(self.url("/transactions/summary")).query(filter);
        self.send_json(request).await
    }

    pub async fn transaction(&self, transaction_id: TransactionId) -> Result<Transaction, ClientError> {
        let request = self
            .http
            .get(self.url(&format!("/transactions/{}", transaction_id)));
        self.send_json(request).await
    }

    pub async fn create_transaction(
        &self,
        new_transaction: &NewTransaction,
    ) -> Result<Transaction, ClientError> {
        let request = self.http.post(self.url("/transactions")).json(new_transaction);
        self.send_json(request).await
    }

    pub async fn update_transaction(
        &self,
        transaction_id: TransactionId,
        updated_transaction: &NewTransaction,
    ) -> Result<Transaction, ClientError> {
        let request = self
            .http
            .put(self.url(&format!("/transactions/{}", transaction_id)))
            .json(updated_transaction);
        self.send_json(request).await
    }

    pub async fn delete_transaction(&self, transaction_id: TransactionId) -> Result<(), ClientError> {
        let request = self
            .http
            .delete(self.url(&format!("/transactions/{}", transaction_id)));
        self.send(request).await?;
        Ok(())
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        Ok(self.send(request).await?.json().await?)
    }

    /// Attaches the stored token. A `401` clears it, since the server will not accept it again.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let request = match self.credentials.load()? {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("Credentials rejected, clearing stored token");
            self.credentials.clear()?;
            return Err(ClientError::Unauthorized);
        }
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status.to_string(),
            };
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}
