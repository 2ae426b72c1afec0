// Common types and utilities shared across the application

pub mod api_response;
pub mod pagination;

pub use api_response::{ApiErrorBody, ApiResponse};
pub use pagination::{PageRequest, PageSizeConfig, Paginated, Pagination};
