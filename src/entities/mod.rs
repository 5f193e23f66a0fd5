//! Records persisted through the data-access collaborator

pub mod macros;

pub mod customer;
pub mod order;
pub mod product;

pub use customer::{Customer, CustomerDetails};
pub use order::{Order, OrderItem, OrderStatus};
pub use product::Product;
