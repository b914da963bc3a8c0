//! Cart service - shopping cart operations for authenticated users.
//!
//! Stock checks here are advisory: they keep the cart honest while the
//! user shops, but the placement transaction re-validates everything
//! before any stock is reserved.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::domain::CartView;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Cart service trait for dependency injection
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CartService: Send + Sync {
    /// The user's cart with current prices and totals
    async fn view_cart(&self, user_id: Uuid) -> AppResult<CartView>;

    /// Add a product to the cart. Adding a product already in the cart
    /// merges quantities into the existing line.
    async fn add_to_cart(&self, user_id: Uuid, product_id: Uuid, quantity: i32) -> AppResult<()>;

    /// Replace the quantity on a cart line
    async fn update_quantity(&self, user_id: Uuid, line_id: Uuid, quantity: i32) -> AppResult<()>;

    /// Remove one line from the cart
    async fn remove_line(&self, user_id: Uuid, line_id: Uuid) -> AppResult<()>;

    /// Empty the cart
    async fn clear_cart(&self, user_id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of CartService using Unit of Work.
pub struct CartManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CartManager<U> {
    /// Create new cart service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CartService for CartManager<U> {
    async fn view_cart(&self, user_id: Uuid) -> AppResult<CartView> {
        let lines = self.uow.carts().list_for_user(user_id).await?;
        Ok(CartView::from_lines(lines))
    }

    async fn add_to_cart(&self, user_id: Uuid, product_id: Uuid, quantity: i32) -> AppResult<()> {
        if quantity <= 0 {
            return Err(AppError::validation("Quantity must be at least 1"));
        }

        let product = self
            .uow
            .products()
            .find_active_by_id(product_id)
            .await?
            .ok_or_not_found()?;

        match self.uow.carts().find_by_product(user_id, product_id).await? {
            Some(line) => {
                // Merge into the existing line; the combined quantity
                // must still fit within stock
                let merged = line.quantity + quantity;
                if !product.can_fulfill(merged) {
                    return Err(AppError::insufficient_stock(
                        product.name,
                        product.stock_quantity,
                        merged,
                    ));
                }
                self.uow.carts().set_quantity(line.id, user_id, merged).await
            }
            None => {
                if !product.can_fulfill(quantity) {
                    return Err(AppError::insufficient_stock(
                        product.name,
                        product.stock_quantity,
                        quantity,
                    ));
                }
                self.uow.carts().insert(user_id, product_id, quantity).await
            }
        }
    }

    async fn update_quantity(&self, user_id: Uuid, line_id: Uuid, quantity: i32) -> AppResult<()> {
        if quantity <= 0 {
            return Err(AppError::validation("Quantity must be at least 1"));
        }

        let line = self
            .uow
            .carts()
            .find_line(line_id, user_id)
            .await?
            .ok_or_not_found()?;

        if quantity > line.stock_quantity {
            return Err(AppError::insufficient_stock(
                line.product_name,
                line.stock_quantity,
                quantity,
            ));
        }

        self.uow.carts().set_quantity(line_id, user_id, quantity).await
    }

    async fn remove_line(&self, user_id: Uuid, line_id: Uuid) -> AppResult<()> {
        self.uow.carts().remove(line_id, user_id).await
    }

    async fn clear_cart(&self, user_id: Uuid) -> AppResult<()> {
        self.uow.carts().clear(user_id).await
    }
}
