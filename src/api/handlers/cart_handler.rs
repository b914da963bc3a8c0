//! Shopping cart handlers. All routes require authentication.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::CartView;
use crate::errors::AppResult;
use crate::types::{MessageResponse, NoContent};

/// Add-to-cart request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddToCartRequest {
    /// Product to add
    pub product_id: Uuid,
    /// Units to add (merged into an existing line for the same product)
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    #[schema(example = 1, minimum = 1)]
    pub quantity: i32,
}

/// Cart line quantity update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCartItemRequest {
    /// New quantity for the line
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    #[schema(example = 2, minimum = 1)]
    pub quantity: i32,
}

/// Create cart routes
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(view_cart).delete(clear_cart))
        .route("/items", post(add_to_cart))
        .route("/items/:id", put(update_cart_item).delete(remove_cart_item))
}

/// View the cart with current prices and totals
#[utoipa::path(
    get,
    path = "/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Cart contents", body = CartView),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn view_cart(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<CartView>> {
    let cart = state.cart_service.view_cart(current_user.id).await?;
    Ok(Json(cart))
}

/// Add a product to the cart
#[utoipa::path(
    post,
    path = "/cart/items",
    tag = "Cart",
    security(("bearer_auth" = [])),
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Product added", body = MessageResponse),
        (status = 400, description = "Insufficient stock"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found or inactive")
    )
)]
pub async fn add_to_cart(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AddToCartRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .cart_service
        .add_to_cart(current_user.id, payload.product_id, payload.quantity)
        .await?;

    Ok(Json(MessageResponse::new("Product added to cart")))
}

/// Update the quantity on a cart line
#[utoipa::path(
    put,
    path = "/cart/items/{id}",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Cart line ID")
    ),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Quantity updated", body = MessageResponse),
        (status = 400, description = "Insufficient stock"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Cart line not found")
    )
)]
pub async fn update_cart_item(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCartItemRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .cart_service
        .update_quantity(current_user.id, id, payload.quantity)
        .await?;

    Ok(Json(MessageResponse::new("Cart updated")))
}

/// Remove one line from the cart
#[utoipa::path(
    delete,
    path = "/cart/items/{id}",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Cart line ID")
    ),
    responses(
        (status = 204, description = "Line removed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Cart line not found")
    )
)]
pub async fn remove_cart_item(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.cart_service.remove_line(current_user.id, id).await?;
    Ok(NoContent)
}

/// Empty the cart
#[utoipa::path(
    delete,
    path = "/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Cart cleared"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn clear_cart(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<NoContent> {
    state.cart_service.clear_cart(current_user.id).await?;
    Ok(NoContent)
}
