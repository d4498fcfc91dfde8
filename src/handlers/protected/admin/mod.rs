// handlers/protected/admin/mod.rs - Administrator-only handlers
//
// Mounted under /api/admin behind the admin role gate.

pub mod faculty;

pub use faculty::{approve as faculty_approve, list as faculty_list, reject as faculty_reject};
