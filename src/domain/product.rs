//! Product domain entity and related types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Catalog visibility of a product.
///
/// Inactive products are hidden from the public catalog and cannot be
/// added to a cart or ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Active,
    Inactive,
}

impl ProductStatus {
    /// Whether a product in this state may be purchased
    pub fn is_orderable(&self) -> bool {
        matches!(self, ProductStatus::Active)
    }
}

impl From<&str> for ProductStatus {
    fn from(s: &str) -> Self {
        match s {
            "inactive" => ProductStatus::Inactive,
            _ => ProductStatus::Active,
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductStatus::Active => write!(f, "active"),
            ProductStatus::Inactive => write!(f, "inactive"),
        }
    }
}

/// Product domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Unit price with two decimal places
    pub price: Decimal,
    pub category_id: Option<Uuid>,
    pub stock_quantity: i32,
    pub image: Option<String>,
    pub featured: bool,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether `quantity` units can currently be ordered
    pub fn can_fulfill(&self, quantity: i32) -> bool {
        self.status.is_orderable() && self.stock_quantity >= quantity
    }
}

/// Product response returned to clients, including the joined category name
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductResponse {
    /// Unique product identifier
    pub id: Uuid,
    /// Product display name
    #[schema(example = "360 Mini Portable Speaker")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unit price with two decimal places
    #[schema(value_type = String, example = "100.00")]
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    /// Name of the owning category, when one is assigned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    /// Units currently available
    pub stock_quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub featured: bool,
    /// Catalog visibility
    #[schema(example = "active")]
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
}

impl ProductResponse {
    /// Build a response from a product and its (optional) category name
    pub fn new(product: Product, category_name: Option<String>) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            category_id: product.category_id,
            category_name,
            stock_quantity: product.stock_quantity,
            image: product.image,
            featured: product.featured,
            status: product.status,
            created_at: product.created_at,
        }
    }
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self::new(product, None)
    }
}

/// Fields for creating a catalog product (admin)
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: Option<Uuid>,
    pub stock_quantity: i32,
    pub image: Option<String>,
    pub featured: bool,
    pub status: ProductStatus,
}

/// Partial update for a catalog product; `None` leaves the field unchanged
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category_id: Option<Uuid>,
    pub stock_quantity: Option<i32>,
    pub image: Option<String>,
    pub featured: Option<bool>,
    pub status: Option<ProductStatus>,
}

/// Whitelisted sort keys for product listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    Name,
    Price,
    #[default]
    CreatedAt,
}

/// Sort direction for product listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Search and filter criteria for the public product listing
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Substring match against name and description
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub featured: Option<bool>,
    pub sort: ProductSort,
    pub order: SortOrder,
}
