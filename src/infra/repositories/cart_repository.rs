//! Cart repository - Shopping cart persistence.
//!
//! Cart reads always join the current product row so callers see the
//! live price, stock, and status rather than values captured when the
//! line was added.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::cart_item::{self, Entity as CartItemEntity};
use super::entities::{product, ProductEntity};
use crate::domain::{CartLine, ProductStatus};
use crate::errors::{AppError, AppResult};

/// Cart persistence operations
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// All cart lines for a user, newest first, joined with product data
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<CartLine>>;

    /// Find a cart line by ID, scoped to its owner
    async fn find_line(&self, line_id: Uuid, user_id: Uuid) -> AppResult<Option<CartLine>>;

    /// Find the user's cart line for a product, if one exists
    async fn find_by_product(&self, user_id: Uuid, product_id: Uuid)
        -> AppResult<Option<CartLine>>;

    /// Insert a new cart line
    async fn insert(&self, user_id: Uuid, product_id: Uuid, quantity: i32) -> AppResult<()>;

    /// Replace the quantity on an existing line, scoped to its owner
    async fn set_quantity(&self, line_id: Uuid, user_id: Uuid, quantity: i32) -> AppResult<()>;

    /// Remove a line, scoped to its owner
    async fn remove(&self, line_id: Uuid, user_id: Uuid) -> AppResult<()>;

    /// Remove every line in the user's cart
    async fn clear(&self, user_id: Uuid) -> AppResult<()>;
}

/// Database-backed implementation of [`CartRepository`]
pub struct CartStore {
    db: DatabaseConnection,
}

impl CartStore {
    /// Create a new store over a connection pool
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Join a cart row with its product into a domain line. Rows whose
/// product vanished mid-query are dropped; the cascade delete removes
/// them anyway.
pub(crate) fn join_line(item: cart_item::Model, product: Option<product::Model>) -> Option<CartLine> {
    product.map(|p| CartLine {
        id: item.id,
        user_id: item.user_id,
        product_id: item.product_id,
        product_name: p.name,
        unit_price: p.price,
        stock_quantity: p.stock_quantity,
        status: ProductStatus::from(p.status.as_str()),
        quantity: item.quantity,
    })
}

#[async_trait]
impl CartRepository for CartStore {
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<CartLine>> {
        let rows = CartItemEntity::find()
            .filter(cart_item::Column::UserId.eq(user_id))
            .order_by_desc(cart_item::Column::CreatedAt)
            .find_also_related(ProductEntity)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .into_iter()
            .filter_map(|(item, product)| join_line(item, product))
            .collect())
    }

    async fn find_line(&self, line_id: Uuid, user_id: Uuid) -> AppResult<Option<CartLine>> {
        let row = CartItemEntity::find_by_id(line_id)
            .filter(cart_item::Column::UserId.eq(user_id))
            .find_also_related(ProductEntity)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(row.and_then(|(item, product)| join_line(item, product)))
    }

    async fn find_by_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Option<CartLine>> {
        let row = CartItemEntity::find()
            .filter(cart_item::Column::UserId.eq(user_id))
            .filter(cart_item::Column::ProductId.eq(product_id))
            .find_also_related(ProductEntity)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(row.and_then(|(item, product)| join_line(item, product)))
    }

    async fn insert(&self, user_id: Uuid, product_id: Uuid, quantity: i32) -> AppResult<()> {
        let now = Utc::now();
        let active_model = cart_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            created_at: Set(now),
            updated_at: Set(now),
        };

        active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn set_quantity(&self, line_id: Uuid, user_id: Uuid, quantity: i32) -> AppResult<()> {
        let model = CartItemEntity::find_by_id(line_id)
            .filter(cart_item::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: cart_item::ActiveModel = model.into();
        active.quantity = Set(quantity);
        active.updated_at = Set(Utc::now());

        active.update(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn remove(&self, line_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let result = CartItemEntity::delete_many()
            .filter(cart_item::Column::Id.eq(line_id))
            .filter(cart_item::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn clear(&self, user_id: Uuid) -> AppResult<()> {
        CartItemEntity::delete_many()
            .filter(cart_item::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(())
    }
}
