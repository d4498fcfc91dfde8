// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition and account creation. No /api prefix, no auth middleware.

pub mod auth;

pub use auth::*;
