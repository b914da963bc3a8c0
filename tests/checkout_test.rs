//! End-to-end checkout tests against a real PostgreSQL database.
//!
//! These cover the placement transaction itself, including the
//! concurrent-checkout race the SQL stock guard exists for. Run with:
//!
//! ```bash
//! DATABASE_URL=postgres://... cargo test -- --ignored
//! ```

use std::sync::Arc;

use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use techwave_commerce::domain::{NewProduct, Product, ProductStatus};
use techwave_commerce::errors::AppError;
use techwave_commerce::infra::{Migrator, Persistence, UnitOfWork};
use techwave_commerce::services::{Checkout, OrderManager, OrderService};

async fn connect() -> DatabaseConnection {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db = sea_orm::Database::connect(&url)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None).await.expect("Migrations failed");
    db
}

async fn seed_user(uow: &Persistence) -> Uuid {
    let suffix = Uuid::new_v4().simple().to_string();
    let user = uow
        .users()
        .create(
            format!("checkout_{suffix}"),
            format!("checkout_{suffix}@example.com"),
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234".to_string(),
            "Checkout Tester".to_string(),
            None,
            None,
            "user".to_string(),
        )
        .await
        .expect("Failed to seed user");
    user.id
}

async fn seed_product(uow: &Persistence, stock: i32) -> Product {
    uow.products()
        .create(NewProduct {
            name: format!("Test Speaker {}", Uuid::new_v4().simple()),
            description: None,
            price: dec!(100.00),
            category_id: None,
            stock_quantity: stock,
            image: None,
            featured: false,
            status: ProductStatus::Active,
        })
        .await
        .expect("Failed to seed product")
}

fn checkout() -> Checkout {
    Checkout {
        shipping_address: "221B Baker Street".to_string(),
        payment_method: None,
        notes: None,
    }
}

#[tokio::test]
#[ignore = "Requires PostgreSQL via DATABASE_URL"]
async fn placement_reserves_stock_and_clears_cart() {
    let uow = Arc::new(Persistence::new(connect().await));
    let user_id = seed_user(&uow).await;
    let product = seed_product(&uow, 5).await;

    uow.carts().insert(user_id, product.id, 2).await.unwrap();

    let service = OrderManager::new(uow.clone());
    let placed = service.place_order(user_id, checkout()).await.unwrap();

    assert_eq!(placed.total, dec!(200.00));

    let remaining = uow.products().find_by_id(product.id).await.unwrap().unwrap();
    assert_eq!(remaining.stock_quantity, 3);

    let cart = uow.carts().list_for_user(user_id).await.unwrap();
    assert!(cart.is_empty());

    let detail = service.get_order(user_id, placed.order_id).await.unwrap();
    assert_eq!(detail.items.len(), 1);
    assert_eq!(detail.items[0].quantity, 2);
    assert_eq!(detail.items[0].price, dec!(100.00));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL via DATABASE_URL"]
async fn placement_rejects_short_stock_without_side_effects() {
    let uow = Arc::new(Persistence::new(connect().await));
    let user_id = seed_user(&uow).await;
    let product = seed_product(&uow, 5).await;

    uow.carts().insert(user_id, product.id, 10).await.unwrap();

    let service = OrderManager::new(uow.clone());
    let err = service.place_order(user_id, checkout()).await.unwrap_err();

    match err {
        AppError::InsufficientStock {
            available,
            requested,
            ..
        } => {
            assert_eq!(available, 5);
            assert_eq!(requested, 10);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // Nothing may have changed
    let unchanged = uow.products().find_by_id(product.id).await.unwrap().unwrap();
    assert_eq!(unchanged.stock_quantity, 5);

    let cart = uow.carts().list_for_user(user_id).await.unwrap();
    assert_eq!(cart.len(), 1);

    let orders = service.my_orders(user_id).await.unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL via DATABASE_URL"]
async fn placement_rejects_empty_cart() {
    let uow = Arc::new(Persistence::new(connect().await));
    let user_id = seed_user(&uow).await;

    let service = OrderManager::new(uow);
    let err = service.place_order(user_id, checkout()).await.unwrap_err();

    assert!(matches!(err, AppError::EmptyCart));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL via DATABASE_URL"]
async fn concurrent_placements_never_oversell() {
    let uow = Arc::new(Persistence::new(connect().await));
    let alice = seed_user(&uow).await;
    let bob = seed_user(&uow).await;
    let product = seed_product(&uow, 5).await;

    uow.carts().insert(alice, product.id, 3).await.unwrap();
    uow.carts().insert(bob, product.id, 3).await.unwrap();

    let service = Arc::new(OrderManager::new(uow.clone()));
    let (first, second) = tokio::join!(
        service.place_order(alice, checkout()),
        service.place_order(bob, checkout()),
    );

    // Stock covers only one of the two carts
    let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);

    // The losing checkout must report the stock actually left after
    // the winner committed, not the level it read at the start
    let loser = if first.is_ok() { second } else { first };
    match loser.unwrap_err() {
        AppError::InsufficientStock {
            available,
            requested,
            ..
        } => {
            assert_eq!(available, 2);
            assert_eq!(requested, 3);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let remaining = uow.products().find_by_id(product.id).await.unwrap().unwrap();
    assert_eq!(remaining.stock_quantity, 2);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL via DATABASE_URL"]
async fn database_wrapper_connects_migrates_and_pings() {
    let config = techwave_commerce::Config::from_env();
    let db = techwave_commerce::infra::Database::connect(&config)
        .await
        .expect("Failed to connect to database");

    db.ping().await.expect("Ping failed");
}
