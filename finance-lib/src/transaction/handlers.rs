use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use finance_repo::category_repo::CategoryId;
use finance_repo::summary;
use finance_repo::transaction_repo::{
    Filter, NewTransaction, PageOptions, TransactionId, TransactionRepo,
};
use finance_repo::user_repo::UserId;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::error::HandlerError;
use crate::user::Owner;
use crate::validation;

#[derive(Deserialize, Debug, Default)]
pub struct TransactionQuery {
    #[serde(alias = "userId")]
    owner_id: Option<UserId>,
    #[serde(alias = "fromDate")]
    from: Option<String>,
    #[serde(alias = "toDate")]
    to: Option<String>,
    #[serde(alias = "type")]
    kind: Option<String>,
    category: Option<String>,
    offset: Option<i64>,
    limit: Option<i64>,
}

impl TransactionQuery {
    fn to_filter(&self, owner: UserId) -> Result<Filter, HandlerError> {
        validation::check_owner(owner, self.owner_id)?;
        Ok(Filter {
            from: validation::date_filter("from", self.from.clone())?,
            to: validation::date_filter("to", self.to.clone())?,
            kind: validation::kind_filter(self.kind.clone())?,
            category: validation::category_filter(self.category.clone()),
        })
    }

    fn page_options(&self) -> Result<Option<PageOptions>, HandlerError> {
        match (self.offset, self.limit) {
            (None, None) => Ok(None),
            (Some(offset), Some(limit)) if offset >= 0 && limit >= 0 => {
                Ok(Some(PageOptions { offset, limit }))
            }
            (Some(_), Some(_)) => Err(HandlerError::invalid(
                "offset",
                "offset and limit must not be negative",
            )),
            _ => Err(HandlerError::invalid(
                "limit",
                "offset and limit must be given together",
            )),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct TransactionPayload {
    description: Option<String>,
    /// JSON numbers are read from their literal digits, not through `f64`.
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    amount: Option<Decimal>,
    date: Option<String>,
    #[serde(alias = "type")]
    kind: Option<String>,
    #[serde(alias = "categoryId")]
    category_id: Option<CategoryId>,
    #[serde(alias = "userId")]
    owner_id: Option<UserId>,
}

impl TransactionPayload {
    fn into_new_transaction(self, owner: UserId) -> Result<NewTransaction, HandlerError> {
        validation::check_owner(owner, self.owner_id)?;
        let description = validation::text(self.description);
        let date = validation::text(self.date);
        let kind = validation::text(self.kind);
        match (description, self.amount, date, kind, self.category_id) {
            (Some(description), Some(amount), Some(date), Some(kind), Some(category_id)) => {
                Ok(NewTransaction::new(
                    description,
                    validation::positive_amount(amount)?,
                    validation::parse_date("date", date)?,
                    validation::parse_kind("kind", kind)?,
                    category_id,
                ))
            }
            (description, amount, date, kind, category_id) => Err(validation::missing([
                ("description", description.is_none()),
                ("amount", amount.is_none()),
                ("date", date.is_none()),
                ("kind", kind.is_none()),
                ("category_id", category_id.is_none()),
            ])),
        }
    }
}

#[get("")]
pub async fn get_all_transactions(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    owner: Owner,
    query: web::Query<TransactionQuery>,
) -> Result<impl Responder, HandlerError> {
    let filter = query.to_filter(owner.0)?;
    let page_options = query.page_options()?;

    let transactions = transaction_repo
        .get_all_transactions(owner.0, filter, page_options)
        .await?;
    Ok(HttpResponse::Ok().json(transactions))
}

/// Totals of the transactions matching the query filter.
#[get("/summary")]
pub async fn get_summary(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    owner: Owner,
    query: web::Query<TransactionQuery>,
) -> Result<impl Responder, HandlerError> {
    let filter = query.to_filter(owner.0)?;

    let transactions = transaction_repo
        .get_all_transactions(owner.0, Filter::NONE, None)
        .await?;
    let selection = summary::select(&transactions, &filter)?;
    Ok(HttpResponse::Ok().json(selection.totals))
}

#[get("/{transaction_id}")]
pub async fn get_transaction(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    owner: Owner,
    transaction_id: web::Path<TransactionId>,
) -> Result<impl Responder, HandlerError> {
    let transaction = transaction_repo
        .get_transaction(owner.0, transaction_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(transaction))
}

#[post("")]
pub async fn create_new_transaction(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    owner: Owner,
    payload: web::Json<TransactionPayload>,
) -> Result<impl Responder, HandlerError> {
    let new_transaction = payload.into_inner().into_new_transaction(owner.0)?;
    let transaction = transaction_repo
        .create_new_transaction(owner.0, new_transaction)
        .await?;
    info!(transaction_id = transaction.id, "Created transaction");

    Ok(HttpResponse::Created().json(transaction))
}

#[put("/{transaction_id}")]
pub async fn update_transaction(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    owner: Owner,
    transaction_id: web::Path<TransactionId>,
    payload: web::Json<TransactionPayload>,
) -> Result<impl Responder, HandlerError> {
    let updated_transaction = payload.into_inner().into_new_transaction(owner.0)?;
    let transaction = transaction_repo
        .update_transaction(owner.0, transaction_id.into_inner(), updated_transaction)
        .await?;
    Ok(HttpResponse::Ok().json(transaction))
}

#[delete("/{transaction_id}")]
pub async fn delete_transaction(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    owner: Owner,
    transaction_id: web::Path<TransactionId>,
) -> Result<impl Responder, HandlerError> {
    let transaction_id = transaction_id.into_inner();
    transaction_repo
        .delete_transaction(owner.0, transaction_id)
        .await?;
    info!(transaction_id, "Deleted transaction");

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Transaction deleted" })))
}
