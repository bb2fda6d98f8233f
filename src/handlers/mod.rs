pub mod auth;
pub mod common;
pub mod employees;
pub mod menu_items;
pub mod orders;
pub mod portal;
pub mod positions;

use crate::db::DbPool;
use crate::services::{
    customers::CustomerService, employees::EmployeeService, menu_items::MenuItemService,
    orders::OrderService, positions::PositionService,
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub positions: Arc<PositionService>,
    pub employees: Arc<EmployeeService>,
    pub menu_items: Arc<MenuItemService>,
    pub customers: Arc<CustomerService>,
    pub orders: Arc<OrderService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            positions: Arc::new(PositionService::new(db_pool.clone())),
            employees: Arc::new(EmployeeService::new(db_pool.clone())),
            menu_items: Arc::new(MenuItemService::new(db_pool.clone())),
            customers: Arc::new(CustomerService::new(db_pool.clone())),
            orders: Arc::new(OrderService::new(db_pool)),
        }
    }
}
