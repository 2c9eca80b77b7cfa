pub mod auth;
pub mod response;

pub use auth::{require_admin, AuthUser};
pub use response::{ApiResponse, Pagination};
