use finance_repo::category_repo::{Category, CategoryId, NewCategory};
use finance_repo::kind::Kind;
use finance_repo::summary::{self, Selection, Totals, TotalsOverflow};
use finance_repo::transaction_repo::{Filter, NewTransaction, Transaction, TransactionId};
use finance_repo::user_repo::User;
use tracing::info;

use crate::{ClientError, FinanceClient};

/// Client-side view of one user's data: the full transaction list, the active filter and the
/// error banner. Filtering and totals are recomputed locally on every read.
///
/// Operations that talk to the server never return the error. It is shown in the banner
/// instead, and a rejected credential additionally sets [Dashboard::login_required].
pub struct Dashboard {
    client: FinanceClient,
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
    filter: Filter,
    error: Option<String>,
    login_required: bool,
}

impl Dashboard {
    pub fn new(client: FinanceClient) -> Dashboard {
        let login_required = !client.is_logged_in().unwrap_or(false);
        Dashboard {
            client,
            categories: Vec::new(),
            transactions: Vec::new(),
            filter: Filter::default(),
            error: None,
            login_required,
        }
    }

    fn record<T>(&mut self, result: Result<T, ClientError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                if let ClientError::Unauthorized = e {
                    self.login_required = true;
                }
                self.error = Some(e.to_string());
                None
            }
        }
    }

    pub fn client(&self) -> &FinanceClient {
        &self.client
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn login_required(&self) -> bool {
        self.login_required
    }

    pub async fn login(&mut self, external_auth_id: &str) -> Option<User> {
        let result = self.client.login(external_auth_id).await;
        let user = self.record(result)?;
        self.login_required = false;
        self.load().await;
        Some(user)
    }

    pub fn logout(&mut self) {
        let result = self.client.logout();
        self.record(result);
        self.categories.clear();
        self.transactions.clear();
        self.login_required = true;
    }

    /// Replaces local state with the server's categories and transactions.
    pub async fn load(&mut self) {
        let categories = self.client.categories(None).await;
        if let Some(categories) = self.record(categories) {
            self.categories = categories;
        }
        let transactions = self.client.transactions(&Filter::NONE).await;
        if let Some(transactions) = self.record(transactions) {
            self.transactions = transactions;
            info!(count = self.transactions.len(), "Loaded transactions");
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn clear_filter(&mut self) {
        self.filter = Filter::default();
    }

    pub fn selection(&self) -> Result<Selection<'_>, TotalsOverflow> {
        summary::select(&self.transactions, &self.filter)
    }

    pub fn totals(&self) -> Result<Totals, TotalsOverflow> {
        Ok(self.selection()?.totals)
    }

    pub fn category_options(&self, kind: Kind) -> Vec<&Category> {
        summary::category_options(&self.categories, kind)
    }

    fn sort_transactions(&mut self) {
        self.transactions.sort_by(|a, b| b.cmp(a));
    }

    pub async fn add_transaction(&mut self, new_transaction: NewTransaction) -> Option<Transaction> {
        let result = self.client.create_transaction(&new_transaction).await;
        let transaction = self.record(result)?;
        self.transactions.push(transaction.clone());
        self.sort_transactions();
        Some(transaction)
    }

    pub async fn edit_transaction(
        &mut self,
        transaction_id: TransactionId,
        updated_transaction: NewTransaction,
    ) -> Option<Transaction> {
        let result = self
            .client
            .update_transaction(transaction_id, &updated_transaction)
            .await;
        let transaction = self.record(result)?;
        match self.transactions.iter_mut().find(|t| t.id == transaction_id) {
            Some(existing) => *existing = transaction.clone(),
            None => self.transactions.push(transaction.clone()),
        }
        self.sort_transactions();
        Some(transaction)
    }

    pub async fn remove_transaction(&mut self, transaction_id: TransactionId) -> bool {
        let result = self.client.delete_transaction(transaction_id).await;
        if self.record(result).is_none() {
            return false;
        }
        self.transactions.retain(|t| t.id != transaction_id);
        true
    }

    pub async fn add_category(&mut self, new_category: NewCategory) -> Option<Category> {
        let result = self.client.create_category(&new_category).await;
        let category = self.record(result)?;
        self.categories.push(category.clone());
        Some(category)
    }

    /// Also renames the category on the local transactions that reference it.
    pub async fn edit_category(
        &mut self,
        category_id: CategoryId,
        updated_category: NewCategory,
    ) -> Option<Category> {
        let result = self
            .client
            .update_category(category_id, &updated_category)
            .await;
        let category = self.record(result)?;
        if let Some(existing) = self.categories.iter_mut().find(|c| c.id == category_id) {
            *existing = category.clone();
        }
        for transaction in self
            .transactions
            .iter_mut()
            .filter(|t| t.category_id == category_id)
        {
            transaction.category_name = Some(category.name.clone());
        }
        Some(category)
    }

    pub async fn remove_category(&mut self, category_id: CategoryId) -> bool {
        let result = self.client.delete_category(category_id).await;
        if self.record(result).is_none() {
            return false;
        }
        self.categories.retain(|c| c.id != category_id);
        true
    }
}
