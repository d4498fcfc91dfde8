// handlers/protected/mod.rs - Handlers behind bearer authentication
//
// Every route here runs after `require_auth`, so handlers can take
// `Extension<AuthorizedUser>` holding the caller's freshly resolved profile.
// Role restrictions are applied per route in the router.

pub mod admin;
pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod courses;
pub mod departments;
pub mod enrollments;
pub mod messages;
pub mod notices;
pub(crate) mod utils;

pub use auth::*;
