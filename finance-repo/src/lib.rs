use async_trait::async_trait;
use std::sync::Arc;

use crate::category_repo::CategoryRepo;
use crate::transaction_repo::TransactionRepo;
use crate::user_repo::UserRepo;

pub mod category_repo;
pub mod kind;
pub mod summary;
pub mod transaction_repo;
pub mod user_repo;

// implementation modules
pub mod mem_repo;
#[cfg(feature = "sqlx-repo")]
pub mod sqlx_repo;

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check(&self) -> bool;
}

/// Handles to every repository of one storage backend.
#[derive(Clone)]
pub struct Repos {
    pub user_repo: Arc<dyn UserRepo>,
    pub category_repo: Arc<dyn CategoryRepo>,
    pub transaction_repo: Arc<dyn TransactionRepo>,
    pub health_check: Arc<dyn HealthCheck>,
}
