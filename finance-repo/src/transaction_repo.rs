use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

use crate::category_repo::CategoryId;
use crate::kind::Kind;
use crate::user_repo::UserId;

pub type TransactionId = i64;

#[derive(Clone, Copy, Debug)]
pub struct PageOptions {
    pub offset: i64,
    pub limit: i64,
}

/// Narrows a transaction listing. `None` fields do not filter.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
pub struct Filter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<Kind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Filter {
    pub const NONE: Filter = Filter {
        from: None,
        to: None,
        kind: None,
        category: None,
    };

    /// The date bounds apply only as a pair; a lone `from` or `to` leaves dates unfiltered.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.from, self.to) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => None,
        }
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        let in_range = self
            .date_range()
            .map_or(true, |(from, to)| from <= transaction.date && transaction.date <= to);
        let kind_matches = self.kind.map_or(true, |kind| kind == transaction.kind);
        let category_matches = self
            .category
            .as_ref()
            .map_or(true, |c| transaction.category_name.as_ref() == Some(c));
        in_range && kind_matches && category_matches
    }
}

#[async_trait]
pub trait TransactionRepo: Sync + Send {
    async fn get_transaction(
        &self,
        user: UserId,
        transaction_id: TransactionId,
    ) -> Result<Transaction, TransactionRepoError>;

    /// Matching transactions, newest first (date, then id, descending).
    async fn get_all_transactions(
        &self,
        user: UserId,
        filter: Filter,
        page_options: Option<PageOptions>,
    ) -> Result<Vec<Transaction>, TransactionRepoError>;

    /// Checks the referenced category and inserts in one atomic step.
    async fn create_new_transaction(
        &self,
        user: UserId,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError>;

    async fn update_transaction(
        &self,
        user: UserId,
        transaction_id: TransactionId,
        updated_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError>;

    async fn delete_transaction(
        &self,
        user: UserId,
        transaction_id: TransactionId,
    ) -> Result<(), TransactionRepoError>;
}

#[derive(Error, Debug)]
pub enum TransactionRepoError {
    #[error("Transaction with id {0} not found")]
    TransactionNotFound(TransactionId),
    #[error("Category with id {0} does not exist")]
    CategoryNotFound(CategoryId),
    #[error("Category {category_id} is an {category_kind} category, transaction kind is {transaction_kind}")]
    KindMismatch {
        category_id: CategoryId,
        category_kind: Kind,
        transaction_kind: Kind,
    },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Transaction {
    pub id: TransactionId,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub kind: Kind,
    pub category_id: CategoryId,
    pub category_name: Option<String>,
    pub owner_id: UserId,
}

impl Ord for Transaction {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for Transaction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct NewTransaction {
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub kind: Kind,
    pub category_id: CategoryId,
}

impl NewTransaction {
    pub const fn new(
        description: String,
        amount: Decimal,
        date: NaiveDate,
        kind: Kind,
        category_id: CategoryId,
    ) -> NewTransaction {
        NewTransaction {
            description,
            amount,
            date,
            kind,
            category_id,
        }
    }

    pub fn to_transaction(
        self,
        id: TransactionId,
        owner_id: UserId,
        category_name: Option<String>,
    ) -> Transaction {
        Transaction {
            id,
            description: self.description,
            amount: self.amount,
            date: self.date,
            kind: self.kind,
            category_id: self.category_id,
            category_name,
            owner_id,
        }
    }
}
