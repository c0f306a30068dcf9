pub mod order;
pub mod table;

pub use order::{OrderKey, OrderTotal};
pub use table::{Table, Value};
