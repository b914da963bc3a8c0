//! Shared API types - pagination and response envelopes

mod pagination;
mod response;

pub use pagination::{Paginated, PaginationMeta, PaginationParams};
pub use response::{MessageResponse, NoContent};
