//! Back-office handlers. All routes are nested under /admin and gated
//! by the admin middleware.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};
use crate::domain::{
    CategoryResponse, NewProduct, Order, OrderDetail, OrderStatus, OrderSummary, Product,
    ProductStatus, ProductUpdate, UserResponse,
};
use crate::errors::{AppError, AppResult};
use crate::types::{NoContent, Paginated, PaginationParams};

/// New product request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "360 Mini Portable Speaker")]
    pub name: String,
    pub description: Option<String>,
    /// Unit price, must be positive
    #[schema(value_type = String, example = "100.00")]
    pub price: Decimal,
    pub category_id: Option<Uuid>,
    /// Initial stock level
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    #[schema(example = 25, minimum = 0)]
    pub stock_quantity: i32,
    pub image: Option<String>,
    #[serde(default)]
    pub featured: bool,
    /// Catalog visibility; defaults to active
    pub status: Option<ProductStatus>,
}

/// Product update request; omitted fields are left unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>, example = "120.00")]
    pub price: Option<Decimal>,
    pub category_id: Option<Uuid>,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock_quantity: Option<i32>,
    pub image: Option<String>,
    pub featured: Option<bool>,
    pub status: Option<ProductStatus>,
}

/// New category request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Speakers")]
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Category update request; omitted fields are left unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Order status update request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    /// Target status; must be a legal transition from the current one
    #[schema(example = "processing")]
    pub status: OrderStatus,
}

/// Admin order listing query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct OrderListQuery {
    /// Only orders in this status
    pub status: Option<OrderStatus>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page", alias = "limit")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_per_page() -> u64 {
    DEFAULT_PAGE_SIZE
}

/// Create admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/status", put(update_order_status))
        .route("/products", post(create_product))
        .route("/products/:id", put(update_product).delete(delete_product))
        .route("/categories", post(create_category))
        .route(
            "/categories/:id",
            put(update_category).delete(delete_category),
        )
        .route("/users", get(list_users))
}

fn check_positive_price(price: Decimal) -> AppResult<()> {
    if price <= Decimal::ZERO {
        return Err(AppError::validation("Price must be positive"));
    }
    Ok(())
}

/// Page through all orders
#[utoipa::path(
    get,
    path = "/admin/orders",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(OrderListQuery),
    responses(
        (status = 200, description = "Page of orders"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<Paginated<OrderSummary>>> {
    let pagination = PaginationParams {
        page: query.page,
        per_page: query.per_page,
    };

    let (orders, total) = state
        .order_service
        .list_orders(query.status, pagination.clone())
        .await?;

    Ok(Json(Paginated::new(
        orders,
        pagination.page,
        pagination.limit(),
        total,
    )))
}

/// Any order with its line items
#[utoipa::path(
    get,
    path = "/admin/orders/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order detail", body = OrderDetail),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<OrderDetail>> {
    let order = state.order_service.get_any_order(id).await?;
    Ok(Json(order))
}

/// Advance an order's status
#[utoipa::path(
    put,
    path = "/admin/orders/{id}/status",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated"),
        (status = 400, description = "Illegal status transition"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<Order>> {
    let order = state.order_service.update_status(id, payload.status).await?;
    Ok(Json(order))
}

/// Create a catalog product
#[utoipa::path(
    post,
    path = "/admin/products",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created"),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<Product>)> {
    check_positive_price(payload.price)?;

    let product = state
        .catalog_service
        .create_product(NewProduct {
            name: payload.name,
            description: payload.description,
            price: payload.price,
            category_id: payload.category_id,
            stock_quantity: payload.stock_quantity,
            image: payload.image,
            featured: payload.featured,
            status: payload.status.unwrap_or(ProductStatus::Active),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a catalog product
#[utoipa::path(
    put,
    path = "/admin/products/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated"),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateProductRequest>,
) -> AppResult<Json<Product>> {
    if let Some(price) = payload.price {
        check_positive_price(price)?;
    }

    let product = state
        .catalog_service
        .update_product(
            id,
            ProductUpdate {
                name: payload.name,
                description: payload.description,
                price: payload.price,
                category_id: payload.category_id,
                stock_quantity: payload.stock_quantity,
                image: payload.image,
                featured: payload.featured,
                status: payload.status,
            },
        )
        .await?;

    Ok(Json(product))
}

/// Delete a catalog product
#[utoipa::path(
    delete,
    path = "/admin/products/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.catalog_service.delete_product(id).await?;
    Ok(NoContent)
}

/// Create a category
#[utoipa::path(
    post,
    path = "/admin/categories",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "Category name already taken")
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<CategoryResponse>)> {
    let category = state
        .catalog_service
        .create_category(payload.name, payload.description, payload.image)
        .await?;

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}

/// Update a category
#[utoipa::path(
    put,
    path = "/admin/categories/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCategoryRequest>,
) -> AppResult<Json<CategoryResponse>> {
    let category = state
        .catalog_service
        .update_category(id, payload.name, payload.description, payload.image)
        .await?;

    Ok(Json(CategoryResponse::from(category)))
}

/// Delete a category; its products are kept, uncategorized
#[utoipa::path(
    delete,
    path = "/admin/categories/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.catalog_service.delete_category(id).await?;
    Ok(NoContent)
}

/// List all user accounts
#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All accounts", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.user_service.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
