pub mod auth;
pub mod response;

pub use auth::{require_auth, require_roles};
pub use response::{ApiResponse, ApiResult};
