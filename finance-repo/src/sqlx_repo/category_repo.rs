use crate::category_repo::CategoryRepoError::{CategoryInUse, CategoryNotFound};
use crate::category_repo::{Category, CategoryId, CategoryRepo, CategoryRepoError, NewCategory};
use crate::kind::Kind;
use crate::sqlx_repo::SQLxRepo;
use crate::user_repo::UserId;
use anyhow::Context;
use async_trait::async_trait;
use sqlx::{query, query_as, query_scalar, Executor, QueryBuilder, Sqlite, SqliteConnection};
use tracing::instrument;

#[derive(sqlx::FromRow)]
struct CategoryEntry {
    id: i64,
    name: String,
    kind: String,
    owner_id: i64,
}

impl TryFrom<CategoryEntry> for Category {
    type Error = anyhow::Error;

    fn try_from(value: CategoryEntry) -> Result<Self, Self::Error> {
        Ok(Category {
            id: value.id,
            name: value.name,
            kind: value.kind.parse()?,
            owner_id: value.owner_id,
        })
    }
}

impl SQLxRepo {
    #[instrument(skip(db_executor))]
    async fn get_category_entry<'e, E>(
        db_executor: E,
        user: UserId,
        category_id: CategoryId,
    ) -> Result<Option<CategoryEntry>, CategoryRepoError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let entry = query_as(
            "SELECT id, name, kind, owner_id FROM categories WHERE id = ? AND owner_id = ?",
        )
        .bind(category_id)
        .bind(user)
        .fetch_optional(db_executor)
        .await
        .with_context(|| format!("Unable to get category {}", category_id))?;
        Ok(entry)
    }

    async fn is_category_referenced(
        conn: &mut SqliteConnection,
        category_id: CategoryId,
    ) -> Result<bool, CategoryRepoError> {
        let references: i64 =
            query_scalar("SELECT COUNT(*) FROM transactions WHERE category_id = ?")
                .bind(category_id)
                .fetch_one(conn)
                .await
                .with_context(|| format!("Unable to count references to category {}", category_id))?;
        Ok(references > 0)
    }
}

#[async_trait]
impl CategoryRepo for SQLxRepo {
    #[instrument(skip(self))]
    async fn get_category(
        &self,
        user: UserId,
        category_id: CategoryId,
    ) -> Result<Category, CategoryRepoError> {
        let entry = Self::get_category_entry(&self.pool, user, category_id)
            .await?
            .ok_or(CategoryNotFound(category_id))?;
        Ok(entry.try_into()?)
    }

    #[instrument(skip(self))]
    async fn get_all_categories(
        &self,
        user: UserId,
        kind: Option<Kind>,
    ) -> Result<Vec<Category>, CategoryRepoError> {
        let mut query_builder = QueryBuilder::<Sqlite>::new(
            "SELECT id, name, kind, owner_id FROM categories WHERE owner_id = ",
        );
        query_builder.push_bind(user);
        if let Some(kind) = kind {
            query_builder.push(" AND kind = ").push_bind(kind.as_str());
        }
        query_builder.push(" ORDER BY id");

        let entries: Vec<CategoryEntry> = query_builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Unable to get categories for user {}", user))?;

        let categories = entries
            .into_iter()
            .map(Category::try_from)
            .collect::<Result<Vec<Category>, anyhow::Error>>()?;
        Ok(categories)
    }

    #[instrument(skip(self))]
    async fn create_category(
        &self,
        user: UserId,
        new_category: NewCategory,
    ) -> Result<Category, CategoryRepoError> {
        let id: i64 = query_scalar(
            "INSERT INTO categories(name, kind, owner_id) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&new_category.name)
        .bind(new_category.kind.as_str())
        .bind(user)
        .fetch_one(&self.pool)
        .await
        .context("Unable to insert category")?;

        Ok(new_category.to_category(id, user))
    }

    #[instrument(skip(self))]
    async fn update_category(
        &self,
        user: UserId,
        category_id: CategoryId,
        updated_category: NewCategory,
    ) -> Result<Category, CategoryRepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Unable to begin transaction")?;

        let existing: Category = Self::get_category_entry(&mut *tx, user, category_id)
            .await?
            .ok_or(CategoryNotFound(category_id))?
            .try_into()?;
        if existing.kind != updated_category.kind
            && Self::is_category_referenced(&mut tx, category_id).await?
        {
            return Err(CategoryInUse(category_id));
        }

        query("UPDATE categories SET name = ?, kind = ? WHERE id = ? AND owner_id = ?")
            .bind(&updated_category.name)
            .bind(updated_category.kind.as_str())
            .bind(category_id)
            .bind(user)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Unable to update category {}", category_id))?;

        let updated: Category = Self::get_category_entry(&mut *tx, user, category_id)
            .await?
            .ok_or(CategoryNotFound(category_id))?
            .try_into()?;

        tx.commit().await.context("Unable to commit transaction")?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_category(
        &self,
        user: UserId,
        category_id: CategoryId,
    ) -> Result<(), CategoryRepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Unable to begin transaction")?;

        if Self::get_category_entry(&mut *tx, user, category_id)
            .await?
            .is_none()
        {
            return Err(CategoryNotFound(category_id));
        }
        if Self::is_category_referenced(&mut tx, category_id).await? {
            return Err(CategoryInUse(category_id));
        }

        let result = query("DELETE FROM categories WHERE id = ? AND owner_id = ?")
            .bind(category_id)
            .bind(user)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Unable to delete category {}", category_id))?;
        if result.rows_affected() == 0 {
            return Err(CategoryNotFound(category_id));
        }

        tx.commit().await.context("Unable to commit transaction")?;
        Ok(())
    }
}
