use crate::category_repo::{Category, CategoryId};
use crate::transaction_repo::{Transaction, TransactionId};
use crate::user_repo::{User, UserId};
use crate::{HealthCheck, Repos};
use anyhow::anyhow;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

mod category_repo;
mod transaction_repo;
mod user_repo;

struct State {
    users: HashMap<UserId, User>,
    categories: HashMap<CategoryId, Category>,
    transactions: HashMap<TransactionId, Transaction>,
    next_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn owned_category(&self, user: UserId, category_id: CategoryId) -> Option<&Category> {
        self.categories
            .get(&category_id)
            .filter(|c| c.owner_id == user)
    }

    /// Stored transactions carry no category name; it is joined in on the way out.
    fn with_category_name(&self, transaction: &Transaction) -> Transaction {
        let mut transaction = transaction.clone();
        transaction.category_name = self
            .categories
            .get(&transaction.category_id)
            .map(|c| c.name.clone());
        transaction
    }
}

/// Keeps everything in process memory. One lock guards all tables, so every operation is
/// atomic with respect to the others.
pub struct MemRepo {
    state: RwLock<State>,
}

impl MemRepo {
    pub fn new() -> MemRepo {
        let state = State {
            users: HashMap::new(),
            categories: HashMap::new(),
            transactions: HashMap::new(),
            next_id: 0,
        };
        MemRepo {
            state: RwLock::new(state),
        }
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<State>, anyhow::Error> {
        self.state
            .read()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<State>, anyhow::Error> {
        self.state
            .write()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }
}

impl Default for MemRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HealthCheck for MemRepo {
    async fn check(&self) -> bool {
        self.read_lock().is_ok()
    }
}

pub fn create_repos() -> Repos {
    let repo = Arc::new(MemRepo::new());

    Repos {
        user_repo: repo.clone(),
        category_repo: repo.clone(),
        transaction_repo: repo.clone(),
        health_check: repo,
    }
}
