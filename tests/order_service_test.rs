//! Order service unit tests over mocked repositories.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use mockall::predicate::eq;
use rust_decimal_macros::dec;
use uuid::Uuid;

use techwave_commerce::domain::{
    Order, OrderDetail, OrderStatus, OrderSummary, PaymentStatus,
};
use techwave_commerce::errors::{AppError, AppResult};
use techwave_commerce::infra::{
    CartRepository, CategoryRepository, MockCartRepository, MockCategoryRepository,
    MockOrderRepository, MockProductRepository, MockUserRepository, OrderRepository,
    ProductRepository, TransactionContext, UnitOfWork, UserRepository,
};
use techwave_commerce::services::{OrderManager, OrderService};

/// Test mock for UnitOfWork wrapping mock repositories
struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    products: Arc<MockProductRepository>,
    categories: Arc<MockCategoryRepository>,
    carts: Arc<MockCartRepository>,
    orders: Arc<MockOrderRepository>,
}

impl TestUnitOfWork {
    fn with_orders(orders: MockOrderRepository) -> Self {
        Self {
            users: Arc::new(MockUserRepository::new()),
            products: Arc::new(MockProductRepository::new()),
            categories: Arc::new(MockCategoryRepository::new()),
            carts: Arc::new(MockCartRepository::new()),
            orders: Arc::new(orders),
        }
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.categories.clone()
    }

    fn carts(&self) -> Arc<dyn CartRepository> {
        self.carts.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.orders.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        // Transaction not supported in test mock
        Err(AppError::internal("Transactions not supported in test mock"))
    }

    async fn transaction_serializable<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}

fn test_order(id: Uuid, status: OrderStatus) -> Order {
    Order {
        id,
        user_id: Uuid::new_v4(),
        total_amount: dec!(200.00),
        status,
        shipping_address: "221B Baker Street".to_string(),
        payment_method: "cash_on_delivery".to_string(),
        payment_status: PaymentStatus::Pending,
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn test_detail(id: Uuid, status: OrderStatus) -> OrderDetail {
    OrderDetail {
        order: test_order(id, status),
        items: vec![],
    }
}

fn test_summary(user_id: Uuid) -> OrderSummary {
    OrderSummary {
        id: Uuid::new_v4(),
        user_id,
        total_amount: dec!(200.00),
        status: OrderStatus::Pending,
        payment_method: "cash_on_delivery".to_string(),
        payment_status: PaymentStatus::Pending,
        item_count: 2,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_my_orders_returns_summaries() {
    let user_id = Uuid::new_v4();

    let mut orders = MockOrderRepository::new();
    orders
        .expect_list_for_user()
        .with(eq(user_id))
        .returning(move |uid| Ok(vec![test_summary(uid), test_summary(uid)]));

    let service = OrderManager::new(Arc::new(TestUnitOfWork::with_orders(orders)));
    let result = service.my_orders(user_id).await.unwrap();

    assert_eq!(result.len(), 2);
    assert!(result.iter().all(|o| o.user_id == user_id));
}

#[tokio::test]
async fn test_get_order_scoped_to_owner() {
    let user_id = Uuid::new_v4();
    let order_id = Uuid::new_v4();

    let mut orders = MockOrderRepository::new();
    orders
        .expect_find_for_user()
        .with(eq(order_id), eq(user_id))
        .returning(|_, _| Ok(None));

    let service = OrderManager::new(Arc::new(TestUnitOfWork::with_orders(orders)));
    let result = service.get_order(user_id, order_id).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn test_update_status_allows_legal_transition() {
    let order_id = Uuid::new_v4();

    let mut orders = MockOrderRepository::new();
    orders
        .expect_find_by_id()
        .with(eq(order_id))
        .returning(|id| Ok(Some(test_detail(id, OrderStatus::Pending))));
    orders
        .expect_set_status()
        .with(eq(order_id), eq(OrderStatus::Processing))
        .returning(|id, status| Ok(test_order(id, status)));

    let service = OrderManager::new(Arc::new(TestUnitOfWork::with_orders(orders)));
    let order = service
        .update_status(order_id, OrderStatus::Processing)
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Processing);
}

#[tokio::test]
async fn test_update_status_rejects_illegal_transition() {
    let order_id = Uuid::new_v4();

    // No set_status expectation: the write must never happen
    let mut orders = MockOrderRepository::new();
    orders
        .expect_find_by_id()
        .returning(|id| Ok(Some(test_detail(id, OrderStatus::Delivered))));

    let service = OrderManager::new(Arc::new(TestUnitOfWork::with_orders(orders)));
    let result = service.update_status(order_id, OrderStatus::Processing).await;

    match result.unwrap_err() {
        AppError::InvalidStatusTransition { from, to } => {
            assert_eq!(from, "delivered");
            assert_eq!(to, "processing");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_update_status_missing_order() {
    let mut orders = MockOrderRepository::new();
    orders.expect_find_by_id().returning(|_| Ok(None));

    let service = OrderManager::new(Arc::new(TestUnitOfWork::with_orders(orders)));
    let result = service
        .update_status(Uuid::new_v4(), OrderStatus::Processing)
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn test_list_orders_filters_by_status() {
    let mut orders = MockOrderRepository::new();
    orders
        .expect_list_all()
        .withf(|status, _| *status == Some(OrderStatus::Shipped))
        .returning(|_, _| Ok((vec![], 0)));

    let service = OrderManager::new(Arc::new(TestUnitOfWork::with_orders(orders)));
    let (page, total) = service
        .list_orders(Some(OrderStatus::Shipped), Default::default())
        .await
        .unwrap();

    assert!(page.is_empty());
    assert_eq!(total, 0);
}
