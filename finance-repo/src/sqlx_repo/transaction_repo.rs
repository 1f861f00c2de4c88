use crate::category_repo::CategoryId;
use crate::kind::Kind;
use crate::sqlx_repo::SQLxRepo;
use crate::transaction_repo::TransactionRepoError::{
    CategoryNotFound, KindMismatch, TransactionNotFound,
};
use crate::transaction_repo::{
    Filter, NewTransaction, PageOptions, Transaction, TransactionId, TransactionRepo,
    TransactionRepoError,
};
use crate::user_repo::UserId;
use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{query, query_as, query_scalar, Executor, QueryBuilder, Sqlite, SqliteConnection};
use std::str::FromStr;
use tracing::instrument;

const SELECT_TRANSACTION: &str = "SELECT t.id, t.description, t.amount, t.date, t.kind, \
     t.category_id, c.name AS category_name, t.owner_id \
     FROM transactions t LEFT JOIN categories c ON t.category_id = c.id";

#[derive(sqlx::FromRow)]
struct TransactionEntry {
    id: i64,
    description: String,
    amount: String,
    date: NaiveDate,
    kind: String,
    category_id: i64,
    category_name: Option<String>,
    owner_id: i64,
}

impl TryFrom<TransactionEntry> for Transaction {
    type Error = anyhow::Error;

    fn try_from(value: TransactionEntry) -> Result<Self, Self::Error> {
        let amount = Decimal::from_str(&value.amount)
            .with_context(|| format!("Invalid amount stored for transaction {}", value.id))?;
        Ok(Transaction {
            id: value.id,
            description: value.description,
            amount,
            date: value.date,
            kind: value.kind.parse()?,
            category_id: value.category_id,
            category_name: value.category_name,
            owner_id: value.owner_id,
        })
    }
}

impl SQLxRepo {
    #[instrument(skip(db_executor))]
    async fn get_transaction_entry<'e, E>(
        db_executor: E,
        user: UserId,
        transaction_id: TransactionId,
    ) -> Result<Option<TransactionEntry>, TransactionRepoError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let transaction_entry = query_as(&format!(
            "{} WHERE t.id = ? AND t.owner_id = ?",
            SELECT_TRANSACTION
        ))
        .bind(transaction_id)
        .bind(user)
        .fetch_optional(db_executor)
        .await
        .with_context(|| format!("Unable to get transaction {}", transaction_id))?;
        Ok(transaction_entry)
    }

    #[instrument(skip(self))]
    async fn get_transaction_entries(
        &self,
        user: UserId,
        filter: Filter,
        page_options: Option<PageOptions>,
    ) -> Result<Vec<TransactionEntry>, TransactionRepoError> {
        let mut query_builder = QueryBuilder::<Sqlite>::new(SELECT_TRANSACTION);
        query_builder.push(" WHERE t.owner_id = ").push_bind(user);
        if let Some((from, to)) = filter.date_range() {
            query_builder
                .push(" AND t.date BETWEEN ")
                .push_bind(from)
                .push(" AND ")
                .push_bind(to);
        }
        if let Some(kind) = filter.kind {
            query_builder.push(" AND t.kind = ").push_bind(kind.as_str());
        }
        if let Some(category) = filter.category {
            query_builder.push(" AND c.name = ").push_bind(category);
        }
        query_builder.push(" ORDER BY t.date DESC, t.id DESC");
        if let Some(po) = page_options {
            query_builder
                .push(" LIMIT ")
                .push_bind(po.limit)
                .push(" OFFSET ")
                .push_bind(po.offset);
        }

        let transaction_entries: Vec<TransactionEntry> = query_builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Unable to get transactions for user {}", user))?;
        Ok(transaction_entries)
    }

    /// Verifies that the category belongs to `user` and has the same kind as the transaction.
    async fn check_category(
        conn: &mut SqliteConnection,
        user: UserId,
        category_id: CategoryId,
        kind: Kind,
    ) -> Result<(), TransactionRepoError> {
        let category_kind: Option<String> =
            query_scalar("SELECT kind FROM categories WHERE id = ? AND owner_id = ?")
                .bind(category_id)
                .bind(user)
                .fetch_optional(conn)
                .await
                .with_context(|| format!("Unable to get category {}", category_id))?;
        let category_kind: Kind = category_kind
            .ok_or(CategoryNotFound(category_id))?
            .parse()
            .context("Invalid kind stored for category")?;
        if category_kind != kind {
            return Err(KindMismatch {
                category_id,
                category_kind,
                transaction_kind: kind,
            });
        }
        Ok(())
    }

    #[instrument(skip(conn))]
    async fn insert_transaction_entry(
        conn: &mut SqliteConnection,
        user: UserId,
        new_transaction: &NewTransaction,
    ) -> Result<TransactionId, TransactionRepoError> {
        let id = query_scalar(
            "INSERT INTO transactions(description, amount, date, kind, category_id, owner_id) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&new_transaction.description)
        .bind(new_transaction.amount.to_string())
        .bind(new_transaction.date)
        .bind(new_transaction.kind.as_str())
        .bind(new_transaction.category_id)
        .bind(user)
        .fetch_one(conn)
        .await
        .context("Unable to insert transaction")?;
        Ok(id)
    }

    #[instrument(skip(conn))]
    async fn update_transaction_entry(
        conn: &mut SqliteConnection,
        user: UserId,
        transaction_id: TransactionId,
        updated_transaction: &NewTransaction,
    ) -> Result<(), TransactionRepoError> {
        query(
            "UPDATE transactions SET description = ?, amount = ?, date = ?, kind = ?, category_id = ? \
             WHERE id = ? AND owner_id = ?",
        )
        .bind(&updated_transaction.description)
        .bind(updated_transaction.amount.to_string())
        .bind(updated_transaction.date)
        .bind(updated_transaction.kind.as_str())
        .bind(updated_transaction.category_id)
        .bind(transaction_id)
        .bind(user)
        .execute(conn)
        .await
        .with_context(|| format!("Unable to update transaction {}", transaction_id))?;
        Ok(())
    }
}

#[async_trait]
impl TransactionRepo for SQLxRepo {
    #[instrument(skip(self))]
    async fn get_transaction(
        &self,
        user: UserId,
        transaction_id: TransactionId,
    ) -> Result<Transaction, TransactionRepoError> {
        let entry = Self::get_transaction_entry(&self.pool, user, transaction_id)
            .await?
            .ok_or(TransactionNotFound(transaction_id))?;
        Ok(entry.try_into()?)
    }

    #[instrument(skip(self))]
    async fn get_all_transactions(
        &self,
        user: UserId,
        filter: Filter,
        page_options: Option<PageOptions>,
    ) -> Result<Vec<Transaction>, TransactionRepoError> {
        let transactions = self
            .get_transaction_entries(user, filter, page_options)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect::<Result<Vec<Transaction>, anyhow::Error>>()?;

        Ok(transactions)
    }

    #[instrument(skip(self, new_transaction))]
    async fn create_new_transaction(
        &self,
        user: UserId,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Unable to begin transaction")?;

        Self::check_category(
            &mut tx,
            user,
            new_transaction.category_id,
            new_transaction.kind,
        )
        .await?;
        let id = Self::insert_transaction_entry(&mut tx, user, &new_transaction).await?;
        let entry = Self::get_transaction_entry(&mut *tx, user, id)
            .await?
            .ok_or(TransactionNotFound(id))?;

        tx.commit().await.context("Unable to commit transaction")?;
        Ok(entry.try_into()?)
    }

    #[instrument(skip(self, updated_transaction))]
    async fn update_transaction(
        &self,
        user: UserId,
        transaction_id: TransactionId,
        updated_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Unable to begin transaction")?;

        if Self::get_transaction_entry(&mut *tx, user, transaction_id)
            .await?
            .is_none()
        {
            return Err(TransactionNotFound(transaction_id));
        }
        Self::check_category(
            &mut tx,
            user,
            updated_transaction.category_id,
            updated_transaction.kind,
        )
        .await?;
        Self::update_transaction_entry(&mut tx, user, transaction_id, &updated_transaction)
            .await?;
        let entry = Self::get_transaction_entry(&mut *tx, user, transaction_id)
            .await?
            .ok_or(TransactionNotFound(transaction_id))?;

        tx.commit().await.context("Unable to commit transaction")?;
        Ok(entry.try_into()?)
    }

    #[instrument(skip(self))]
    async fn delete_transaction(
        &self,
        user: UserId,
        transaction_id: TransactionId,
    ) -> Result<(), TransactionRepoError> {
        let result = query("DELETE FROM transactions WHERE id = ? AND owner_id = ?")
            .bind(transaction_id)
            .bind(user)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Unable to delete transaction {}", transaction_id))?;
        if result.rows_affected() == 0 {
            Err(TransactionNotFound(transaction_id))
        } else {
            Ok(())
        }
    }
}
