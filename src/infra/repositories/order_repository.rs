//! Order repository - Read and back-office access to placed orders.
//!
//! Order creation does not live here: new orders are only ever written
//! inside the placement transaction via `TxOrderRepository`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::order::{self, Entity as OrderEntity};
use super::entities::order_item::{self, Entity as OrderItemEntity};
use super::entities::ProductEntity;
use crate::domain::{Order, OrderDetail, OrderItemDetail, OrderStatus, OrderSummary};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Order persistence operations
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// All orders placed by a user, newest first
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<OrderSummary>>;

    /// Full order detail, scoped to its owner
    async fn find_for_user(&self, order_id: Uuid, user_id: Uuid)
        -> AppResult<Option<OrderDetail>>;

    /// Full order detail regardless of owner (admin)
    async fn find_by_id(&self, order_id: Uuid) -> AppResult<Option<OrderDetail>>;

    /// Page through all orders, optionally filtered by status (admin).
    /// Returns the page and the total count.
    async fn list_all(
        &self,
        status: Option<OrderStatus>,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<OrderSummary>, u64)>;

    /// Overwrite an order's status (admin). Transition rules are
    /// enforced by the service layer before calling this.
    async fn set_status(&self, order_id: Uuid, status: OrderStatus) -> AppResult<Order>;
}

/// Database-backed implementation of [`OrderRepository`]
pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    /// Create a new store over a connection pool
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn summarize(model: order::Model, item_count: i64) -> OrderSummary {
        OrderSummary {
            id: model.id,
            user_id: model.user_id,
            total_amount: model.total_amount,
            status: OrderStatus::from(model.status.as_str()),
            payment_method: model.payment_method,
            payment_status: model.payment_status.as_str().into(),
            item_count,
            created_at: model.created_at,
        }
    }

    async fn load_items(&self, order_id: Uuid) -> AppResult<Vec<OrderItemDetail>> {
        let rows = OrderItemEntity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .find_also_related(ProductEntity)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .into_iter()
            .map(|(item, product)| {
                let (name, image) = product
                    .map(|p| (p.name, p.image))
                    .unwrap_or_else(|| ("[deleted product]".to_string(), None));
                OrderItemDetail {
                    id: item.id,
                    product_id: item.product_id,
                    name,
                    image,
                    quantity: item.quantity,
                    price: item.price,
                }
            })
            .collect())
    }

    /// Count order items for a set of orders in one query
    async fn item_counts(&self, order_ids: &[Uuid]) -> AppResult<HashMap<Uuid, i64>> {
        let items = OrderItemEntity::find()
            .filter(order_item::Column::OrderId.is_in(order_ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        let mut counts: HashMap<Uuid, i64> = HashMap::new();
        for item in items {
            *counts.entry(item.order_id).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<OrderSummary>> {
        let orders = OrderEntity::find()
            .filter(order::Column::UserId.eq(user_id))
            .order_by_desc(order::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let counts = self.item_counts(&ids).await?;

        Ok(orders
            .into_iter()
            .map(|o| {
                let count = counts.get(&o.id).copied().unwrap_or(0);
                Self::summarize(o, count)
            })
            .collect())
    }

    async fn find_for_user(
        &self,
        order_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<OrderDetail>> {
        let model = OrderEntity::find_by_id(order_id)
            .filter(order::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        let Some(model) = model else {
            return Ok(None);
        };

        let items = self.load_items(model.id).await?;
        Ok(Some(OrderDetail {
            order: Order::from(model),
            items,
        }))
    }

    async fn find_by_id(&self, order_id: Uuid) -> AppResult<Option<OrderDetail>> {
        let model = OrderEntity::find_by_id(order_id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        let Some(model) = model else {
            return Ok(None);
        };

        let items = self.load_items(model.id).await?;
        Ok(Some(OrderDetail {
            order: Order::from(model),
            items,
        }))
    }

    async fn list_all(
        &self,
        status: Option<OrderStatus>,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<OrderSummary>, u64)> {
        let mut query = OrderEntity::find().order_by_desc(order::Column::CreatedAt);

        if let Some(status) = status {
            query = query.filter(order::Column::Status.eq(status.to_string()));
        }

        let paginator = query.paginate(&self.db, pagination.limit());
        let total = paginator.num_items().await?;
        let orders = paginator
            .fetch_page(pagination.page.saturating_sub(1))
            .await?;

        let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let counts = self.item_counts(&ids).await?;

        let summaries = orders
            .into_iter()
            .map(|o| {
                let count = counts.get(&o.id).copied().unwrap_or(0);
                Self::summarize(o, count)
            })
            .collect();

        Ok((summaries, total))
    }

    async fn set_status(&self, order_id: Uuid, status: OrderStatus) -> AppResult<Order> {
        let model = OrderEntity::find_by_id(order_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: order::ActiveModel = model.into();
        active.status = Set(status.to_string());
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Order::from(model))
    }
}
