pub mod aggregator;

pub use aggregator::{order_totals, orders_in_range, orders_with_totals};
