//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and transaction lifecycle (begin,
//! commit, rollback). Order placement runs entirely through the
//! transaction context here: the cart read, stock checks, stock
//! decrements, order insert, and cart clear all share one database
//! transaction, so a failed placement leaves no partial state.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IsolationLevel, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::entities::{cart_item, order, order_item, product};
use super::repositories::{
    join_line, CartRepository, CartStore, CategoryRepository, CategoryStore, OrderRepository,
    OrderStore, ProductRepository, ProductStore, UserRepository, UserStore,
};
use crate::config::DEFAULT_PAYMENT_METHOD;
use crate::domain::{CartLine, OrderStatus, PaymentStatus};
use crate::errors::{AppError, AppResult};
use rust_decimal::Decimal;

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction management.
/// Note: This trait is not mockable directly due to generic methods.
/// For testing, mock at the repository level or use integration tests.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get product repository
    fn products(&self) -> Arc<dyn ProductRepository>;

    /// Get category repository
    fn categories(&self) -> Arc<dyn CategoryRepository>;

    /// Get cart repository
    fn carts(&self) -> Arc<dyn CartRepository>;

    /// Get order repository
    fn orders(&self) -> Arc<dyn OrderRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is automatically committed on success or rolled back on error.
    /// Uses ReadCommitted isolation level by default for balanced consistency/performance.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;

    /// Execute a closure within a transaction with serializable isolation.
    ///
    /// Use this for operations requiring the strongest consistency guarantees.
    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part
/// of the same database transaction. The context borrows the transaction
/// to ensure proper lifetime management.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Get cart repository for this transaction
    pub fn carts(&self) -> TxCartRepository<'_> {
        TxCartRepository::new(self.txn)
    }

    /// Get product repository for this transaction
    pub fn products(&self) -> TxProductRepository<'_> {
        TxProductRepository::new(self.txn)
    }

    /// Get order repository for this transaction
    pub fn orders(&self) -> TxOrderRepository<'_> {
        TxOrderRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    product_repo: Arc<ProductStore>,
    category_repo: Arc<CategoryStore>,
    cart_repo: Arc<CartStore>,
    order_repo: Arc<OrderStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        let product_repo = Arc::new(ProductStore::new(db.clone()));
        let category_repo = Arc::new(CategoryStore::new(db.clone()));
        let cart_repo = Arc::new(CartStore::new(db.clone()));
        let order_repo = Arc::new(OrderStore::new(db.clone()));
        Self {
            db,
            user_repo,
            product_repo,
            category_repo,
            cart_repo,
            order_repo,
        }
    }

    /// Internal transaction execution with configurable isolation level
    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.product_repo.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.category_repo.clone()
    }

    fn carts(&self) -> Arc<dyn CartRepository> {
        self.cart_repo.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.order_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, f)
            .await
    }

    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::Serializable, f)
            .await
    }
}

/// Transaction-aware cart repository.
///
/// Executes all operations within the provided transaction.
pub struct TxCartRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxCartRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Read the user's cart lines joined with current product data
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<CartLine>> {
        let rows = cart_item::Entity::find()
            .filter(cart_item::Column::UserId.eq(user_id))
            .order_by_desc(cart_item::Column::CreatedAt)
            .find_also_related(product::Entity)
            .all(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .into_iter()
            .filter_map(|(item, product)| join_line(item, product))
            .collect())
    }

    /// Delete every line in the user's cart
    pub async fn clear(&self, user_id: Uuid) -> AppResult<()> {
        cart_item::Entity::delete_many()
            .filter(cart_item::Column::UserId.eq(user_id))
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(())
    }
}

/// Transaction-aware product repository.
pub struct TxProductRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxProductRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Atomically decrement a product's stock by `quantity`.
    ///
    /// The decrement is guarded in SQL (`stock_quantity >= quantity`),
    /// so two concurrent placements can never drive stock negative:
    /// whichever commits second matches zero rows. Returns `false` when
    /// the guard rejected the decrement.
    pub async fn reserve_stock(&self, product_id: Uuid, quantity: i32) -> AppResult<bool> {
        let result = product::Entity::update_many()
            .col_expr(
                product::Column::StockQuantity,
                Expr::col(product::Column::StockQuantity).sub(quantity),
            )
            .col_expr(product::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(product::Column::Id.eq(product_id))
            .filter(product::Column::StockQuantity.gte(quantity))
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected == 1)
    }

    /// Current stock level, read inside the transaction. Used to report
    /// an accurate number after a failed reservation.
    pub async fn stock_of(&self, product_id: Uuid) -> AppResult<Option<i32>> {
        let product = product::Entity::find_by_id(product_id)
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(product.map(|p| p.stock_quantity))
    }
}

/// Transaction-aware order repository.
///
/// Only covers the writes order placement needs; reads and status
/// updates go through [`OrderRepository`] outside a transaction.
pub struct TxOrderRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxOrderRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Insert a new pending order and return its ID
    pub async fn create_order(
        &self,
        user_id: Uuid,
        total_amount: Decimal,
        shipping_address: String,
        payment_method: Option<String>,
        notes: Option<String>,
    ) -> AppResult<Uuid> {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let active_model = order::ActiveModel {
            id: Set(id),
            user_id: Set(user_id),
            total_amount: Set(total_amount),
            status: Set(OrderStatus::Pending.to_string()),
            shipping_address: Set(shipping_address),
            payment_method: Set(
                payment_method.unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string())
            ),
            payment_status: Set(PaymentStatus::Pending.to_string()),
            notes: Set(notes),
            created_at: Set(now),
            updated_at: Set(now),
        };

        active_model.insert(self.txn).await.map_err(AppError::from)?;
        Ok(id)
    }

    /// Insert one order line with its unit-price snapshot
    pub async fn add_item(
        &self,
        order_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        price: Decimal,
    ) -> AppResult<()> {
        let active_model = order_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            price: Set(price),
            created_at: Set(Utc::now()),
        };

        active_model.insert(self.txn).await.map_err(AppError::from)?;
        Ok(())
    }
}
