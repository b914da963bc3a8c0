//! API-level tests for error mapping, response shapes, and domain types.

use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use rust_decimal_macros::dec;
use serde_json::Value;
use uuid::Uuid;

use techwave_commerce::domain::{CartLine, CartView, OrderStatus, Password, ProductStatus, UserRole};
use techwave_commerce::errors::AppError;

async fn response_json(error: AppError) -> (StatusCode, Value) {
    let response = error.into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_error_status_codes() {
    assert_eq!(
        AppError::Unauthorized.into_response().status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        AppError::Forbidden.into_response().status(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        AppError::InvalidCredentials.into_response().status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        AppError::NotFound.into_response().status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        AppError::conflict("Email").into_response().status(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        AppError::EmptyCart.into_response().status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        AppError::insufficient_stock("Speaker", 5, 10)
            .into_response()
            .status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        AppError::InvalidStatusTransition {
            from: "delivered".to_string(),
            to: "pending".to_string(),
        }
        .into_response()
        .status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        AppError::internal("boom").into_response().status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn test_insufficient_stock_body() {
    let (status, body) =
        response_json(AppError::insufficient_stock("360 Mini Portable Speaker", 5, 10)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INSUFFICIENT_STOCK");
    assert_eq!(
        body["error"]["message"],
        "Insufficient stock for 360 Mini Portable Speaker. Available: 5, Requested: 10"
    );
}

#[tokio::test]
async fn test_empty_cart_body() {
    let (status, body) = response_json(AppError::EmptyCart).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "EMPTY_CART");
    assert_eq!(body["error"]["message"], "Cart is empty");
}

#[tokio::test]
async fn test_internal_error_hides_details() {
    let (_, body) = response_json(AppError::internal("connection pool exhausted")).await;

    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
    assert_eq!(body["error"]["message"], "An internal error occurred");
}

#[test]
fn test_password_hashing() {
    let password = Password::new("SecurePassword123").unwrap();

    assert!(password.verify("SecurePassword123"));
    assert!(!password.verify("WrongPassword"));
    // Argon2 salts make every hash unique
    let other = Password::new("SecurePassword123").unwrap();
    assert_ne!(password.as_str(), other.as_str());
}

#[test]
fn test_password_debug_redacts_hash() {
    let password = Password::new("SecurePassword123").unwrap();
    let debug = format!("{:?}", password);

    assert!(debug.contains("REDACTED"));
    assert!(!debug.contains(password.as_str()));
}

#[test]
fn test_user_role_conversions() {
    assert_eq!(UserRole::from("admin"), UserRole::Admin);
    assert_eq!(UserRole::from("user"), UserRole::User);
    assert_eq!(UserRole::from("anything else"), UserRole::User);
    assert_eq!(UserRole::Admin.to_string(), "admin");
}

#[test]
fn test_order_status_state_machine() {
    assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Processing));
    assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
    assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Shipped));
    assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Delivered));

    assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Cancelled));
    assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Pending));
    assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Processing));
    assert!(OrderStatus::Delivered.is_terminal());
}

#[test]
fn test_cart_view_serialization() {
    let line = CartLine {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        product_id: Uuid::new_v4(),
        product_name: "360 Mini Portable Speaker".to_string(),
        unit_price: dec!(100.00),
        stock_quantity: 5,
        status: ProductStatus::Active,
        quantity: 2,
    };

    let view = CartView::from_lines(vec![line]);
    assert_eq!(view.total, dec!(200.00));
    assert_eq!(view.count, 1);

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["total"], "200.00");
    assert_eq!(json["items"][0]["subtotal"], "200.00");
}
