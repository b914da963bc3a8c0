//! Category repository - Catalog category persistence.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::category::{self, Entity as CategoryEntity};
use crate::domain::Category;
use crate::errors::{AppError, AppResult};

/// Category persistence operations
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// List all categories by name
    async fn list(&self) -> AppResult<Vec<Category>>;

    /// Find category by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>>;

    /// Find category by its (display) name
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>>;

    /// Create a new category
    async fn create(
        &self,
        name: String,
        description: Option<String>,
        image: Option<String>,
    ) -> AppResult<Category>;

    /// Update category fields; `None` leaves a field unchanged
    async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
        image: Option<String>,
    ) -> AppResult<Category>;

    /// Delete a category; products keep existing via SET NULL
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Database-backed implementation of [`CategoryRepository`]
pub struct CategoryStore {
    db: DatabaseConnection,
}

impl CategoryStore {
    /// Create a new store over a connection pool
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for CategoryStore {
    async fn list(&self) -> AppResult<Vec<Category>> {
        let models = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Category::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        let result = CategoryEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Category::from))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        let result = CategoryEntity::find()
            .filter(category::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Category::from))
    }

    async fn create(
        &self,
        name: String,
        description: Option<String>,
        image: Option<String>,
    ) -> AppResult<Category> {
        let now = Utc::now();
        let active_model = category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            description: Set(description),
            image: Set(image),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;

        Ok(Category::from(model))
    }

    async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
        image: Option<String>,
    ) -> AppResult<Category> {
        let model = CategoryEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: category::ActiveModel = model.into();

        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(description) = description {
            active.description = Set(Some(description));
        }
        if let Some(image) = image {
            active.image = Set(Some(image));
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;

        Ok(Category::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = CategoryEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
