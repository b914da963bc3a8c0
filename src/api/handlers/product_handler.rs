//! Public product catalog handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::AppState;
use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};
use crate::domain::{ProductFilter, ProductResponse, ProductSort, SortOrder};
use crate::errors::AppResult;
use crate::types::{Paginated, PaginationParams};

/// Product listing query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct ProductListQuery {
    /// Substring match against name and description
    pub search: Option<String>,
    /// Restrict to one category
    pub category: Option<Uuid>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Only featured products
    pub featured: Option<bool>,
    #[serde(default)]
    pub sort: ProductSort,
    #[serde(default)]
    pub order: SortOrder,
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

/// Create public product routes
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/featured", get(featured_products))
        .route("/:id", get(get_product))
}

/// List active products with search, filters, and pagination
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "Page of products")
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> AppResult<Json<Paginated<ProductResponse>>> {
    let filter = ProductFilter {
        search: query.search,
        category_id: query.category,
        min_price: query.min_price,
        max_price: query.max_price,
        featured: query.featured,
        sort: query.sort,
        order: query.order,
    };
    let pagination = PaginationParams {
        page: query.page,
        per_page: query.per_page,
    };

    let (products, total) = state
        .catalog_service
        .list_products(filter, pagination.clone())
        .await?;

    Ok(Json(Paginated::new(
        products,
        pagination.page,
        pagination.limit(),
        total,
    )))
}

/// Featured storefront products
#[utoipa::path(
    get,
    path = "/products/featured",
    tag = "Products",
    responses(
        (status = 200, description = "Featured products", body = Vec<ProductResponse>)
    )
)]
pub async fn featured_products(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProductResponse>>> {
    let products = state.catalog_service.featured_products().await?;
    Ok(Json(products))
}

/// Get one active product
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product detail", body = ProductResponse),
        (status = 404, description = "Product not found or inactive")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProductResponse>> {
    let product = state.catalog_service.get_product(id).await?;
    Ok(Json(product))
}
