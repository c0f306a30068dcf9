pub mod manager;
pub mod queries;

pub use manager::SqliteManager;
