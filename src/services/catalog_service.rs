//! Catalog service - public product browsing and admin catalog management.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::config::FEATURED_PRODUCTS_LIMIT;
use crate::domain::{
    Category, NewProduct, Product, ProductFilter, ProductResponse, ProductUpdate,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

/// Catalog service trait for dependency injection
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Search active products with filters and pagination
    async fn list_products(
        &self,
        filter: ProductFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<ProductResponse>, u64)>;

    /// Fetch one active product with its category name
    async fn get_product(&self, id: Uuid) -> AppResult<ProductResponse>;

    /// Featured storefront products
    async fn featured_products(&self) -> AppResult<Vec<ProductResponse>>;

    /// Create a catalog product (admin)
    async fn create_product(&self, product: NewProduct) -> AppResult<Product>;

    /// Update a catalog product (admin)
    async fn update_product(&self, id: Uuid, changes: ProductUpdate) -> AppResult<Product>;

    /// Delete a catalog product (admin)
    async fn delete_product(&self, id: Uuid) -> AppResult<()>;

    /// All categories, alphabetical
    async fn list_categories(&self) -> AppResult<Vec<Category>>;

    /// Fetch one category
    async fn get_category(&self, id: Uuid) -> AppResult<Category>;

    /// Create a category (admin); names are unique
    async fn create_category(
        &self,
        name: String,
        description: Option<String>,
        image: Option<String>,
    ) -> AppResult<Category>;

    /// Update a category (admin)
    async fn update_category(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
        image: Option<String>,
    ) -> AppResult<Category>;

    /// Delete a category (admin); its products are kept, uncategorized
    async fn delete_category(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of CatalogService using Unit of Work.
pub struct Catalog<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> Catalog<U> {
    /// Create new catalog service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Reject product writes that point at a missing category
    async fn check_category(&self, category_id: Option<Uuid>) -> AppResult<()> {
        if let Some(category_id) = category_id {
            if self
                .uow
                .categories()
                .find_by_id(category_id)
                .await?
                .is_none()
            {
                return Err(AppError::validation("Category does not exist"));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for Catalog<U> {
    async fn list_products(
        &self,
        filter: ProductFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<ProductResponse>, u64)> {
        self.uow.products().search(filter, pagination).await
    }

    async fn get_product(&self, id: Uuid) -> AppResult<ProductResponse> {
        let product = self
            .uow
            .products()
            .find_active_by_id(id)
            .await?
            .ok_or_not_found()?;

        let category_name = match product.category_id {
            Some(category_id) => self
                .uow
                .categories()
                .find_by_id(category_id)
                .await?
                .map(|c| c.name),
            None => None,
        };

        Ok(ProductResponse::new(product, category_name))
    }

    async fn featured_products(&self) -> AppResult<Vec<ProductResponse>> {
        self.uow.products().featured(FEATURED_PRODUCTS_LIMIT).await
    }

    async fn create_product(&self, product: NewProduct) -> AppResult<Product> {
        self.check_category(product.category_id).await?;
        self.uow.products().create(product).await
    }

    async fn update_product(&self, id: Uuid, changes: ProductUpdate) -> AppResult<Product> {
        self.check_category(changes.category_id).await?;
        self.uow.products().update(id, changes).await
    }

    async fn delete_product(&self, id: Uuid) -> AppResult<()> {
        self.uow.products().delete(id).await
    }

    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.uow.categories().list().await
    }

    async fn get_category(&self, id: Uuid) -> AppResult<Category> {
        self.uow.categories().find_by_id(id).await?.ok_or_not_found()
    }

    async fn create_category(
        &self,
        name: String,
        description: Option<String>,
        image: Option<String>,
    ) -> AppResult<Category> {
        if self.uow.categories().find_by_name(&name).await?.is_some() {
            return Err(AppError::conflict("Category"));
        }
        self.uow.categories().create(name, description, image).await
    }

    async fn update_category(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
        image: Option<String>,
    ) -> AppResult<Category> {
        if let Some(name) = &name {
            if let Some(existing) = self.uow.categories().find_by_name(name).await? {
                if existing.id != id {
                    return Err(AppError::conflict("Category"));
                }
            }
        }
        self.uow
            .categories()
            .update(id, name, description, image)
            .await
    }

    async fn delete_category(&self, id: Uuid) -> AppResult<()> {
        self.uow.categories().delete(id).await
    }
}
