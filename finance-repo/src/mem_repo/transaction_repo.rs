use crate::category_repo::CategoryId;
use crate::kind::Kind;
use crate::mem_repo::{MemRepo, State};
use crate::transaction_repo::TransactionRepoError::{
    CategoryNotFound, KindMismatch, TransactionNotFound,
};
use crate::transaction_repo::{
    Filter, NewTransaction, PageOptions, Transaction, TransactionId, TransactionRepo,
    TransactionRepoError,
};
use crate::user_repo::UserId;
use async_trait::async_trait;

impl State {
    fn check_category(
        &self,
        user: UserId,
        category_id: CategoryId,
        kind: Kind,
    ) -> Result<(), TransactionRepoError> {
        let category = self
            .owned_category(user, category_id)
            .ok_or(CategoryNotFound(category_id))?;
        if category.kind != kind {
            return Err(KindMismatch {
                category_id,
                category_kind: category.kind,
                transaction_kind: kind,
            });
        }
        Ok(())
    }

    fn owned_transaction(&self, user: UserId, transaction_id: TransactionId) -> Option<&Transaction> {
        self.transactions
            .get(&transaction_id)
            .filter(|t| t.owner_id == user)
    }
}

#[async_trait]
impl TransactionRepo for MemRepo {
    async fn get_transaction(
        &self,
        user: UserId,
        transaction_id: TransactionId,
    ) -> Result<Transaction, TransactionRepoError> {
        let read_guard = self.read_lock()?;

        read_guard
            .owned_transaction(user, transaction_id)
            .map(|t| read_guard.with_category_name(t))
            .ok_or(TransactionNotFound(transaction_id))
    }

    async fn get_all_transactions(
        &self,
        user: UserId,
        filter: Filter,
        page_options: Option<PageOptions>,
    ) -> Result<Vec<Transaction>, TransactionRepoError> {
        let read_guard = self.read_lock()?;

        let mut transactions: Vec<Transaction> = read_guard
            .transactions
            .values()
            .filter(|t| t.owner_id == user)
            .map(|t| read_guard.with_category_name(t))
            .filter(|t| filter.matches(t))
            .collect();
        transactions.sort_by(|a, b| b.cmp(a));

        if let Some(page_options) = page_options {
            transactions = transactions
                .into_iter()
                .skip(page_options.offset.max(0) as usize)
                .take(page_options.limit.max(0) as usize)
                .collect();
        }

        Ok(transactions)
    }

    async fn create_new_transaction(
        &self,
        user: UserId,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        write_guard.check_category(user, new_transaction.category_id, new_transaction.kind)?;

        let id = write_guard.next_id();
        let transaction = new_transaction.to_transaction(id, user, None);
        write_guard.transactions.insert(id, transaction.clone());

        Ok(write_guard.with_category_name(&transaction))
    }

    async fn update_transaction(
        &self,
        user: UserId,
        transaction_id: TransactionId,
        updated_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        if write_guard.owned_transaction(user, transaction_id).is_none() {
            return Err(TransactionNotFound(transaction_id));
        }
        write_guard.check_category(
            user,
            updated_transaction.category_id,
            updated_transaction.kind,
        )?;

        let transaction = updated_transaction.to_transaction(transaction_id, user, None);
        write_guard
            .transactions
            .insert(transaction_id, transaction.clone());

        Ok(write_guard.with_category_name(&transaction))
    }

    async fn delete_transaction(
        &self,
        user: UserId,
        transaction_id: TransactionId,
    ) -> Result<(), TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        if write_guard.owned_transaction(user, transaction_id).is_none() {
            return Err(TransactionNotFound(transaction_id));
        }
        write_guard.transactions.remove(&transaction_id);

        Ok(())
    }
}
