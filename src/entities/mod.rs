//! SeaORM entities for the restaurant schema.

pub mod customer;
pub mod employee;
pub mod menu_item;
pub mod order;
pub mod order_detail;
pub mod position;

pub use order::OrderStatus;
