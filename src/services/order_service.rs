//! Order service - order placement and lifecycle management.
//!
//! Placement is the one operation in the system that must be atomic:
//! the cart read, per-line validation, stock reservation, order insert,
//! and cart clear all run inside a single database transaction through
//! the Unit of Work. Validation happens for every line before any stock
//! is touched, so a cart that cannot be fulfilled leaves no trace.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::domain::{CartLine, Order, OrderDetail, OrderStatus, OrderSummary, PlacedOrder};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

/// Checkout details supplied by the customer
#[derive(Debug, Clone)]
pub struct Checkout {
    pub shipping_address: String,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

/// Order service trait for dependency injection
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Convert the user's cart into an order, atomically
    async fn place_order(&self, user_id: Uuid, checkout: Checkout) -> AppResult<PlacedOrder>;

    /// The user's order history, newest first
    async fn my_orders(&self, user_id: Uuid) -> AppResult<Vec<OrderSummary>>;

    /// One of the user's orders with its line items
    async fn get_order(&self, user_id: Uuid, order_id: Uuid) -> AppResult<OrderDetail>;

    /// Page through all orders, optionally by status (admin)
    async fn list_orders(
        &self,
        status: Option<OrderStatus>,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<OrderSummary>, u64)>;

    /// Any order with its line items (admin)
    async fn get_any_order(&self, order_id: Uuid) -> AppResult<OrderDetail>;

    /// Advance an order's status (admin). Only transitions allowed by
    /// the status state machine are accepted.
    async fn update_status(&self, order_id: Uuid, next: OrderStatus) -> AppResult<Order>;
}

/// Reject the checkout unless every cart line can be fulfilled right
/// now: the product must be orderable and have enough stock. An
/// inactive product has nothing available to sell, so it surfaces as
/// insufficient stock with zero available.
fn verify_availability(lines: &[CartLine]) -> AppResult<()> {
    for line in lines {
        if !line.status.is_orderable() {
            return Err(AppError::insufficient_stock(
                line.product_name.clone(),
                0,
                line.quantity,
            ));
        }
        if line.quantity > line.stock_quantity {
            return Err(AppError::insufficient_stock(
                line.product_name.clone(),
                line.stock_quantity,
                line.quantity,
            ));
        }
    }
    Ok(())
}

/// Order total at current catalog prices
fn order_total(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::subtotal).sum()
}

/// Concrete implementation of OrderService using Unit of Work.
pub struct OrderManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> OrderManager<U> {
    /// Create new order service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> OrderService for OrderManager<U> {
    async fn place_order(&self, user_id: Uuid, checkout: Checkout) -> AppResult<PlacedOrder> {
        let Checkout {
            shipping_address,
            payment_method,
            notes,
        } = checkout;

        let placed = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let lines = ctx.carts().list_for_user(user_id).await?;
                    if lines.is_empty() {
                        return Err(AppError::EmptyCart);
                    }

                    verify_availability(&lines)?;
                    let total = order_total(&lines);

                    let order_id = ctx
                        .orders()
                        .create_order(user_id, total, shipping_address, payment_method, notes)
                        .await?;

                    for line in &lines {
                        // The decrement is guarded in SQL; a false here
                        // means another checkout took the stock since
                        // our read, and the rollback undoes everything
                        let reserved = ctx
                            .products()
                            .reserve_stock(line.product_id, line.quantity)
                            .await?;
                        if !reserved {
                            // Our earlier read is stale by definition
                            // here; report what is actually left
                            let available = ctx
                                .products()
                                .stock_of(line.product_id)
                                .await?
                                .unwrap_or(0);
                            return Err(AppError::insufficient_stock(
                                line.product_name.clone(),
                                available,
                                line.quantity,
                            ));
                        }

                        ctx.orders()
                            .add_item(order_id, line.product_id, line.quantity, line.unit_price)
                            .await?;
                    }

                    ctx.carts().clear(user_id).await?;

                    Ok(PlacedOrder { order_id, total })
                })
            })
            .await?;

        tracing::info!(order_id = %placed.order_id, total = %placed.total, "order placed");
        Ok(placed)
    }

    async fn my_orders(&self, user_id: Uuid) -> AppResult<Vec<OrderSummary>> {
        self.uow.orders().list_for_user(user_id).await
    }

    async fn get_order(&self, user_id: Uuid, order_id: Uuid) -> AppResult<OrderDetail> {
        self.uow
            .orders()
            .find_for_user(order_id, user_id)
            .await?
            .ok_or_not_found()
    }

    async fn list_orders(
        &self,
        status: Option<OrderStatus>,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<OrderSummary>, u64)> {
        self.uow.orders().list_all(status, pagination).await
    }

    async fn get_any_order(&self, order_id: Uuid) -> AppResult<OrderDetail> {
        self.uow.orders().find_by_id(order_id).await?.ok_or_not_found()
    }

    async fn update_status(&self, order_id: Uuid, next: OrderStatus) -> AppResult<Order> {
        let detail = self
            .uow
            .orders()
            .find_by_id(order_id)
            .await?
            .ok_or_not_found()?;

        let current = detail.order.status;
        if !current.can_transition_to(next) {
            return Err(AppError::InvalidStatusTransition {
                from: current.to_string(),
                to: next.to_string(),
            });
        }

        self.uow.orders().set_status(order_id, next).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProductStatus;
    use rust_decimal_macros::dec;

    fn line(name: &str, price: Decimal, stock: i32, quantity: i32) -> CartLine {
        CartLine {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            product_name: name.to_string(),
            unit_price: price,
            stock_quantity: stock,
            status: ProductStatus::Active,
            quantity,
        }
    }

    #[test]
    fn availability_passes_when_stock_covers_every_line() {
        let lines = vec![line("Speaker", dec!(100.00), 10, 2), line("Lamp", dec!(50.00), 3, 3)];
        assert!(verify_availability(&lines).is_ok());
    }

    #[test]
    fn availability_rejects_any_short_line() {
        let lines = vec![line("Speaker", dec!(100.00), 10, 2), line("Lamp", dec!(50.00), 1, 3)];

        let err = verify_availability(&lines).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Lamp. Available: 1, Requested: 3"
        );
    }

    #[test]
    fn availability_treats_inactive_products_as_out_of_stock() {
        let mut lines = vec![line("Speaker", dec!(100.00), 10, 2)];
        lines[0].status = ProductStatus::Inactive;

        let err = verify_availability(&lines).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Speaker. Available: 0, Requested: 2"
        );
    }

    #[test]
    fn total_sums_line_subtotals() {
        let lines = vec![line("Speaker", dec!(100.00), 10, 2), line("Lamp", dec!(49.99), 5, 3)];
        assert_eq!(order_total(&lines), dec!(349.97));
    }

    #[test]
    fn total_of_no_lines_is_zero() {
        assert_eq!(order_total(&[]), Decimal::ZERO);
    }
}
