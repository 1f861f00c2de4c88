use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use finance_repo::category_repo::{CategoryId, CategoryRepo, NewCategory};
use finance_repo::user_repo::UserId;
use serde::Deserialize;
use tracing::info;

use crate::error::HandlerError;
use crate::user::Owner;
use crate::validation;

#[derive(Deserialize, Debug)]
pub struct CategoryQuery {
    #[serde(alias = "userId")]
    owner_id: Option<UserId>,
    #[serde(alias = "type")]
    kind: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct CategoryPayload {
    name: Option<String>,
    #[serde(alias = "type")]
    kind: Option<String>,
    #[serde(alias = "userId")]
    owner_id: Option<UserId>,
}

impl CategoryPayload {
    fn into_new_category(self, owner: UserId) -> Result<NewCategory, HandlerError> {
        validation::check_owner(owner, self.owner_id)?;
        let name = validation::text(self.name);
        let kind = validation::text(self.kind);
        match (name, kind) {
            (Some(name), Some(kind)) => {
                Ok(NewCategory::new(name, validation::parse_kind("kind", kind)?))
            }
            (name, kind) => Err(validation::missing([
                ("name", name.is_none()),
                ("kind", kind.is_none()),
            ])),
        }
    }
}

#[get("")]
pub async fn get_all_categories(
    category_repo: web::Data<Arc<dyn CategoryRepo>>,
    owner: Owner,
    query: web::Query<CategoryQuery>,
) -> Result<impl Responder, HandlerError> {
    let query = query.into_inner();
    validation::check_owner(owner.0, query.owner_id)?;
    let kind = validation::kind_filter(query.kind)?;

    let categories = category_repo.get_all_categories(owner.0, kind).await?;
    Ok(HttpResponse::Ok().json(categories))
}

#[get("/{category_id}")]
pub async fn get_category(
    category_repo: web::Data<Arc<dyn CategoryRepo>>,
    owner: Owner,
    category_id: web::Path<CategoryId>,
) -> Result<impl Responder, HandlerError> {
    let category = category_repo
        .get_category(owner.0, category_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(category))
}

#[post("")]
pub async fn create_category(
    category_repo: web::Data<Arc<dyn CategoryRepo>>,
    owner: Owner,
    payload: web::Json<CategoryPayload>,
) -> Result<impl Responder, HandlerError> {
    let new_category = payload.into_inner().into_new_category(owner.0)?;
    let category = category_repo.create_category(owner.0, new_category).await?;
    info!(category_id = category.id, "Created category");

    Ok(HttpResponse::Created().json(category))
}

#[put("/{category_id}")]
pub async fn update_category(
    category_repo: web::Data<Arc<dyn CategoryRepo>>,
    owner: Owner,
    category_id: web::Path<CategoryId>,
    payload: web::Json<CategoryPayload>,
) -> Result<impl Responder, HandlerError> {
    let updated_category = payload.into_inner().into_new_category(owner.0)?;
    let category = category_repo
        .update_category(owner.0, category_id.into_inner(), updated_category)
        .await?;
    Ok(HttpResponse::Ok().json(category))
}

#[delete("/{category_id}")]
pub async fn delete_category(
    category_repo: web::Data<Arc<dyn CategoryRepo>>,
    owner: Owner,
    category_id: web::Path<CategoryId>,
) -> Result<impl Responder, HandlerError> {
    let category_id = category_id.into_inner();
    category_repo.delete_category(owner.0, category_id).await?;
    info!(category_id, "Deleted category");

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Category deleted" })))
}
