//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod cart_item;
pub mod category;
pub mod order;
pub mod order_item;
pub mod product;
pub mod user;

// Re-exports for public API convenience
#[allow(unused_imports)]
pub use cart_item::{Entity as CartItemEntity, Model as CartItemModel};
#[allow(unused_imports)]
pub use category::{Entity as CategoryEntity, Model as CategoryModel};
#[allow(unused_imports)]
pub use order::{Entity as OrderEntity, Model as OrderModel};
#[allow(unused_imports)]
pub use order_item::{Entity as OrderItemEntity, Model as OrderItemModel};
#[allow(unused_imports)]
pub use product::{Entity as ProductEntity, Model as ProductModel};
#[allow(unused_imports)]
pub use user::{Entity as UserEntity, Model as UserModel};
