//! Cart service unit tests over mocked repositories.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use mockall::predicate::eq;
use rust_decimal_macros::dec;
use uuid::Uuid;

use techwave_commerce::domain::{CartLine, Product, ProductStatus};
use techwave_commerce::errors::{AppError, AppResult};
use techwave_commerce::infra::{
    CartRepository, CategoryRepository, MockCartRepository, MockCategoryRepository,
    MockOrderRepository, MockProductRepository, MockUserRepository, OrderRepository,
    ProductRepository, TransactionContext, UnitOfWork, UserRepository,
};
use techwave_commerce::services::{CartManager, CartService};

/// Test mock for UnitOfWork wrapping mock repositories
struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    products: Arc<MockProductRepository>,
    categories: Arc<MockCategoryRepository>,
    carts: Arc<MockCartRepository>,
    orders: Arc<MockOrderRepository>,
}

impl TestUnitOfWork {
    fn new(products: MockProductRepository, carts: MockCartRepository) -> Self {
        Self {
            users: Arc::new(MockUserRepository::new()),
            products: Arc::new(products),
            categories: Arc::new(MockCategoryRepository::new()),
            carts: Arc::new(carts),
            orders: Arc::new(MockOrderRepository::new()),
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

fn service(products: MockProductRepository, carts: MockCartRepository) -> CartManager<TestUnitOfWork> {
    CartManager::new(Arc::new(TestUnitOfWork::new(products, carts)))
}

fn test_product(id: Uuid, stock: i32) -> Product {
    Product {
        id,
        name: "360 Mini Portable Speaker".to_string(),
        description: None,
        price: dec!(100.00),
        category_id: None,
        stock_quantity: stock,
        image: None,
        featured: false,
        status: ProductStatus::Active,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn test_line(user_id: Uuid, product_id: Uuid, quantity: i32, stock: i32) -> CartLine {
    CartLine {
        id: Uuid::new_v4(),
        user_id,
        product_id,
        product_name: "360 Mini Portable Speaker".to_string(),
        unit_price: dec!(100.00),
        stock_quantity: stock,
        status: ProductStatus::Active,
        quantity,
    }
}

#[tokio::test]
async fn test_view_cart_builds_totals() {
    let user_id = Uuid::new_v4();
    let product_id = Uuid::new_v4();

    let mut carts = MockCartRepository::new();
    carts
        .expect_list_for_user()
        .with(eq(user_id))
        .returning(move |uid| Ok(vec![test_line(uid, product_id, 2, 5)]));

    let cart = service(MockProductRepository::new(), carts)
        .view_cart(user_id)
        .await
        .unwrap();

    assert_eq!(cart.count, 1);
    assert_eq!(cart.total, dec!(200.00));
    assert_eq!(cart.items[0].subtotal, dec!(200.00));
}

#[tokio::test]
async fn test_add_to_cart_inserts_new_line() {
    let user_id = Uuid::new_v4();
    let product_id = Uuid::new_v4();

    let mut products = MockProductRepository::new();
    products
        .expect_find_active_by_id()
        .with(eq(product_id))
        .returning(|id| Ok(Some(test_product(id, 5))));

    let mut carts = MockCartRepository::new();
    carts
        .expect_find_by_product()
        .with(eq(user_id), eq(product_id))
        .returning(|_, _| Ok(None));
    carts
        .expect_insert()
        .with(eq(user_id), eq(product_id), eq(2))
        .returning(|_, _, _| Ok(()));

    let result = service(products, carts).add_to_cart(user_id, product_id, 2).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_add_to_cart_merges_existing_line() {
    let user_id = Uuid::new_v4();
    let product_id = Uuid::new_v4();

    let mut products = MockProductRepository::new();
    products
        .expect_find_active_by_id()
        .returning(|id| Ok(Some(test_product(id, 5))));

    let mut carts = MockCartRepository::new();
    let existing = test_line(user_id, product_id, 2, 5);
    let existing_id = existing.id;
    carts
        .expect_find_by_product()
        .returning(move |_, _| Ok(Some(existing.clone())));
    carts
        .expect_set_quantity()
        .with(eq(existing_id), eq(user_id), eq(3))
        .returning(|_, _, _| Ok(()));

    let result = service(products, carts).add_to_cart(user_id, product_id, 1).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_add_to_cart_rejects_merge_beyond_stock() {
    let user_id = Uuid::new_v4();
    let product_id = Uuid::new_v4();

    let mut products = MockProductRepository::new();
    products
        .expect_find_active_by_id()
        .returning(|id| Ok(Some(test_product(id, 3))));

    // No set_quantity expectation: the merge must not be written
    let mut carts = MockCartRepository::new();
    let existing = test_line(user_id, product_id, 2, 3);
    carts
        .expect_find_by_product()
        .returning(move |_, _| Ok(Some(existing.clone())));

    let err = service(products, carts)
        .add_to_cart(user_id, product_id, 2)
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Insufficient stock for 360 Mini Portable Speaker. Available: 3, Requested: 4"
    );
}

#[tokio::test]
async fn test_add_to_cart_unknown_product() {
    let mut products = MockProductRepository::new();
    products.expect_find_active_by_id().returning(|_| Ok(None));

    let result = service(products, MockCartRepository::new())
        .add_to_cart(Uuid::new_v4(), Uuid::new_v4(), 1)
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn test_add_to_cart_rejects_zero_quantity() {
    let result = service(MockProductRepository::new(), MockCartRepository::new())
        .add_to_cart(Uuid::new_v4(), Uuid::new_v4(), 0)
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_update_quantity_checks_stock() {
    let user_id = Uuid::new_v4();
    let line = test_line(user_id, Uuid::new_v4(), 2, 5);
    let line_id = line.id;

    let mut carts = MockCartRepository::new();
    carts
        .expect_find_line()
        .with(eq(line_id), eq(user_id))
        .returning(move |_, _| Ok(Some(line.clone())));

    let err = service(MockProductRepository::new(), carts)
        .update_quantity(user_id, line_id, 6)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::InsufficientStock {
            available: 5,
            requested: 6,
            ..
        }
    ));
}

#[tokio::test]
async fn test_clear_cart_delegates() {
    let user_id = Uuid::new_v4();

    let mut carts = MockCartRepository::new();
    carts.expect_clear().with(eq(user_id)).returning(|_| Ok(()));

    let result = service(MockProductRepository::new(), carts)
        .clear_cart(user_id)
        .await;
    assert!(result.is_ok());
}
