pub mod order;
pub mod order_book;

pub use order::{OrderSnapshot, OrderStatus};
pub use order_book::{LifecycleError, MemoryOrderBook, OrderLifecycle, OrderNote};
