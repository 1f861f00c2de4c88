use crate::category_repo::CategoryRepoError::{CategoryInUse, CategoryNotFound};
use crate::category_repo::{Category, CategoryId, CategoryRepo, CategoryRepoError, NewCategory};
use crate::kind::Kind;
use crate::mem_repo::MemRepo;
use crate::user_repo::UserId;
use async_trait::async_trait;

#[async_trait]
impl CategoryRepo for MemRepo {
    async fn get_category(
        &self,
        user: UserId,
        category_id: CategoryId,
    ) -> Result<Category, CategoryRepoError> {
        let read_guard = self.read_lock()?;

        read_guard
            .owned_category(user, category_id)
            .cloned()
            .ok_or(CategoryNotFound(category_id))
    }

    async fn get_all_categories(
        &self,
        user: UserId,
        kind: Option<Kind>,
    ) -> Result<Vec<Category>, CategoryRepoError> {
        let read_guard = self.read_lock()?;

        let mut categories: Vec<Category> = read_guard
            .categories
            .values()
            .filter(|c| c.owner_id == user)
            .filter(|c| kind.map_or(true, |k| c.kind == k))
            .cloned()
            .collect();
        categories.sort_by_key(|c| c.id);

        Ok(categories)
    }

    async fn create_category(
        &self,
        user: UserId,
        new_category: NewCategory,
    ) -> Result<Category, CategoryRepoError> {
        let mut write_guard = self.write_lock()?;

        let id = write_guard.next_id();
        let category = new_category.to_category(id, user);
        write_guard.categories.insert(id, category.clone());

        Ok(category)
    }

    async fn update_category(
        &self,
        user: UserId,
        category_id: CategoryId,
        updated_category: NewCategory,
    ) -> Result<Category, CategoryRepoError> {
        let mut write_guard = self.write_lock()?;

        let Some(existing) = write_guard.owned_category(user, category_id) else {
            return Err(CategoryNotFound(category_id));
        };
        if existing.kind != updated_category.kind
            && write_guard
                .transactions
                .values()
                .any(|t| t.category_id == category_id)
        {
            return Err(CategoryInUse(category_id));
        }

        let category = updated_category.to_category(category_id, user);
        write_guard.categories.insert(category_id, category.clone());

        Ok(category)
    }

    async fn delete_category(
        &self,
        user: UserId,
        category_id: CategoryId,
    ) -> Result<(), CategoryRepoError> {
        let mut write_guard = self.write_lock()?;

        if write_guard.owned_category(user, category_id).is_none() {
            return Err(CategoryNotFound(category_id));
        }
        if write_guard
            .transactions
            .values()
            .any(|t| t.category_id == category_id)
        {
            return Err(CategoryInUse(category_id));
        }

        write_guard.categories.remove(&category_id);
        Ok(())
    }
}
