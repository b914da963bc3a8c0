//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod cart;
pub mod category;
pub mod order;
pub mod password;
pub mod product;
pub mod user;

pub use cart::{CartLine, CartLineResponse, CartView};
pub use category::{Category, CategoryResponse};
pub use order::{
    Order, OrderDetail, OrderItem, OrderItemDetail, OrderStatus, OrderSummary, PaymentStatus,
    PlacedOrder,
};
pub use password::Password;
pub use product::{
    NewProduct, Product, ProductFilter, ProductResponse, ProductSort, ProductStatus,
    ProductUpdate, SortOrder,
};
pub use user::{User, UserResponse, UserRole};
