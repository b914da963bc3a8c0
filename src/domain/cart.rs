//! Cart domain types.
//!
//! A cart line records one user's intent to purchase a quantity of a
//! product. Prices are never stored on the line; the current catalog
//! price is joined in whenever the cart is read.

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::product::ProductStatus;

/// One cart line joined with the current product data.
///
/// This is the view the order placement transaction validates against:
/// `unit_price`, `stock_quantity`, and `status` are the product's values
/// at the moment the line was read.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub unit_price: Decimal,
    pub stock_quantity: i32,
    pub status: ProductStatus,
    pub quantity: i32,
}

impl CartLine {
    /// Line subtotal at the current catalog price
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Cart line as returned to the client
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartLineResponse {
    /// Cart line identifier
    pub id: Uuid,
    pub product_id: Uuid,
    /// Product display name
    pub name: String,
    /// Current unit price
    #[schema(value_type = String, example = "100.00")]
    pub price: Decimal,
    /// Units currently available in the catalog
    pub stock_quantity: i32,
    /// Quantity in the cart
    pub quantity: i32,
    /// `price * quantity`
    #[schema(value_type = String, example = "200.00")]
    pub subtotal: Decimal,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
        let subtotal = line.subtotal();
        Self {
            id: line.id,
            product_id: line.product_id,
            name: line.product_name,
            price: line.unit_price,
            stock_quantity: line.stock_quantity,
            quantity: line.quantity,
            subtotal,
        }
    }
}

/// Full cart view: lines plus grand total
#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartLineResponse>,
    /// Sum of line subtotals
    #[schema(value_type = String, example = "350.00")]
    pub total: Decimal,
    /// Number of lines (not units)
    pub count: usize,
}

impl CartView {
    /// Build the client view from joined cart lines
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let total = lines.iter().map(CartLine::subtotal).sum();
        let items: Vec<CartLineResponse> = lines.into_iter().map(Into::into).collect();
        let count = items.len();
        Self {
            items,
            total,
            count,
        }
    }
}
