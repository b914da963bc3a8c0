//! Product repository - Catalog product persistence.
//!
//! Stock decrements during order placement do NOT go through this
//! repository; they happen inside the placement transaction via
//! `TxProductRepository` so the check and the write share one
//! transaction.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::product::{self, Entity as ProductEntity};
use super::entities::CategoryEntity;
use crate::domain::{
    NewProduct, Product, ProductFilter, ProductResponse, ProductSort, ProductStatus,
    ProductUpdate, SortOrder,
};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Product persistence operations
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Find product by ID regardless of status (admin use)
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>>;

    /// Find an active product by ID (public catalog)
    async fn find_active_by_id(&self, id: Uuid) -> AppResult<Option<Product>>;

    /// Search active products with filters, sorting, and pagination.
    /// Returns the page of products (with category names) and the total count.
    async fn search(
        &self,
        filter: ProductFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<ProductResponse>, u64)>;

    /// List featured active products, newest first, up to `limit`
    async fn featured(&self, limit: u64) -> AppResult<Vec<ProductResponse>>;

    /// Create a new catalog product (admin)
    async fn create(&self, product: NewProduct) -> AppResult<Product>;

    /// Apply a partial update to a product (admin)
    async fn update(&self, id: Uuid, changes: ProductUpdate) -> AppResult<Product>;

    /// Delete a product (admin)
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Database-backed implementation of [`ProductRepository`]
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    /// Create a new store over a connection pool
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn sort_column(sort: ProductSort) -> product::Column {
        match sort {
            ProductSort::Name => product::Column::Name,
            ProductSort::Price => product::Column::Price,
            ProductSort::CreatedAt => product::Column::CreatedAt,
        }
    }

    fn sort_direction(order: SortOrder) -> Order {
        match order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        }
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        let result = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Product::from))
    }

    async fn find_active_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        let result = ProductEntity::find_by_id(id)
            .filter(product::Column::Status.eq(ProductStatus::Active.to_string()))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Product::from))
    }

    async fn search(
        &self,
        filter: ProductFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<ProductResponse>, u64)> {
        let mut query = ProductEntity::find()
            .filter(product::Column::Status.eq(ProductStatus::Active.to_string()));

        if let Some(search) = &filter.search {
            query = query.filter(
                Condition::any()
                    .add(product::Column::Name.contains(search))
                    .add(product::Column::Description.contains(search)),
            );
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(product::Column::CategoryId.eq(category_id));
        }
        if let Some(min_price) = filter.min_price {
            query = query.filter(product::Column::Price.gte(min_price));
        }
        if let Some(max_price) = filter.max_price {
            query = query.filter(product::Column::Price.lte(max_price));
        }
        if filter.featured == Some(true) {
            query = query.filter(product::Column::Featured.eq(true));
        }

        let paginator = query
            .order_by(Self::sort_column(filter.sort), Self::sort_direction(filter.order))
            .find_also_related(CategoryEntity)
            .paginate(&self.db, pagination.limit());

        let total = paginator.num_items().await?;
        let page = paginator
            .fetch_page(pagination.page.saturating_sub(1))
            .await?;

        let products = page
            .into_iter()
            .map(|(model, category)| {
                ProductResponse::new(Product::from(model), category.map(|c| c.name))
            })
            .collect();

        Ok((products, total))
    }

    async fn featured(&self, limit: u64) -> AppResult<Vec<ProductResponse>> {
        let page = ProductEntity::find()
            .filter(product::Column::Featured.eq(true))
            .filter(product::Column::Status.eq(ProductStatus::Active.to_string()))
            .order_by_desc(product::Column::CreatedAt)
            .find_also_related(CategoryEntity)
            .paginate(&self.db, limit)
            .fetch_page(0)
            .await
            .map_err(AppError::from)?;

        Ok(page
            .into_iter()
            .map(|(model, category)| {
                ProductResponse::new(Product::from(model), category.map(|c| c.name))
            })
            .collect())
    }

    async fn create(&self, new: NewProduct) -> AppResult<Product> {
        let now = Utc::now();
        let active_model = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new.name),
            description: Set(new.description),
            price: Set(new.price),
            category_id: Set(new.category_id),
            stock_quantity: Set(new.stock_quantity),
            image: Set(new.image),
            featured: Set(new.featured),
            status: Set(new.status.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;

        Ok(Product::from(model))
    }

    async fn update(&self, id: Uuid, changes: ProductUpdate) -> AppResult<Product> {
        let model = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: product::ActiveModel = model.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        if let Some(category_id) = changes.category_id {
            active.category_id = Set(Some(category_id));
        }
        if let Some(stock_quantity) = changes.stock_quantity {
            active.stock_quantity = Set(stock_quantity);
        }
        if let Some(image) = changes.image {
            active.image = Set(Some(image));
        }
        if let Some(featured) = changes.featured {
            active.featured = Set(featured);
        }
        if let Some(status) = changes.status {
            active.status = Set(status.to_string());
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;

        Ok(Product::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = ProductEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
