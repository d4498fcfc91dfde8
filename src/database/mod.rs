pub mod manager;
pub mod models;
pub mod profile_store;
pub mod users;

pub use manager::{Database, DatabaseError};
pub use profile_store::{PgProfileStore, ProfileStore};
