//! Order handlers for customers. All routes require authentication.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{OrderDetail, OrderSummary, PlacedOrder};
use crate::errors::AppResult;
use crate::services::Checkout;

/// Checkout request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PlaceOrderRequest {
    /// Where to ship the order
    #[validate(length(min = 1, message = "Shipping address is required"))]
    #[schema(example = "221B Baker Street, London")]
    pub shipping_address: String,
    /// Payment method; defaults to cash on delivery
    #[schema(example = "cash_on_delivery")]
    pub payment_method: Option<String>,
    /// Free-form delivery notes
    pub notes: Option<String>,
}

/// Create customer order routes
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(my_orders).post(place_order))
        .route("/:id", get(get_order))
}

/// Place an order from the cart.
///
/// The whole conversion runs in one database transaction: every cart
/// line is validated against current stock, stock is reserved, and the
/// cart is cleared. Any failure rolls everything back.
#[utoipa::path(
    post,
    path = "/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = PlacedOrder),
        (status = 400, description = "Empty cart or insufficient stock"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn place_order(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<PlaceOrderRequest>,
) -> AppResult<(StatusCode, Json<PlacedOrder>)> {
    let placed = state
        .order_service
        .place_order(
            current_user.id,
            Checkout {
                shipping_address: payload.shipping_address,
                payment_method: payload.payment_method,
                notes: payload.notes,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(placed)))
}

/// The authenticated user's order history
#[utoipa::path(
    get,
    path = "/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order history", body = Vec<OrderSummary>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn my_orders(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<OrderSummary>>> {
    let orders = state.order_service.my_orders(current_user.id).await?;
    Ok(Json(orders))
}

/// One of the authenticated user's orders, with line items
#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order detail", body = OrderDetail),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<OrderDetail>> {
    let order = state.order_service.get_order(current_user.id, id).await?;
    Ok(Json(order))
}
