use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kind::Kind;
use crate::user_repo::UserId;

pub type CategoryId = i64;

#[async_trait]
pub trait CategoryRepo: Sync + Send {
    async fn get_category(
        &self,
        user: UserId,
        category_id: CategoryId,
    ) -> Result<Category, CategoryRepoError>;

    /// Categories owned by `user`, optionally restricted to one kind, in creation order.
    async fn get_all_categories(
        &self,
        user: UserId,
        kind: Option<Kind>,
    ) -> Result<Vec<Category>, CategoryRepoError>;

    async fn create_category(
        &self,
        user: UserId,
        new_category: NewCategory,
    ) -> Result<Category, CategoryRepoError>;

    /// Overwrites name and kind. Changing the kind of a category that transactions still
    /// reference fails with [CategoryRepoError::CategoryInUse].
    async fn update_category(
        &self,
        user: UserId,
        category_id: CategoryId,
        updated_category: NewCategory,
    ) -> Result<Category, CategoryRepoError>;

    /// Deletion is refused while any transaction references the category.
    async fn delete_category(
        &self,
        user: UserId,
        category_id: CategoryId,
    ) -> Result<(), CategoryRepoError>;
}

#[derive(Error, Debug)]
pub enum CategoryRepoError {
    #[error("Category with id {0} not found")]
    CategoryNotFound(CategoryId),
    #[error("Category with id {0} is referenced by transactions")]
    CategoryInUse(CategoryId),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub kind: Kind,
    pub owner_id: UserId,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct NewCategory {
    pub name: String,
    pub kind: Kind,
}

impl NewCategory {
    pub fn new(name: String, kind: Kind) -> NewCategory {
        NewCategory { name, kind }
    }

    pub fn to_category(self, id: CategoryId, owner_id: UserId) -> Category {
        Category {
            id,
            name: self.name,
            kind: self.kind,
            owner_id,
        }
    }
}
