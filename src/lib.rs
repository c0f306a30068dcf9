pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use db::SqliteManager;
pub use error::{AggregateError, DbError, TableError};
pub use models::{OrderKey, OrderTotal, Table, Value};
