//! Shared types (pagination, responses).

mod pagination;
mod response;

pub use pagination::{Paginated, PaginationMeta, PaginationParams};
pub use response::MessageResponse;
