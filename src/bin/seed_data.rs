//! Seed data script - populates the database with demo staff and a menu
//!
//! Run with: cargo run --bin seed-data
//!
//! This creates:
//! - one employee per staff account (manager, chef, waiter)
//! - a small menu, one item inactive
//!
//! Rows that already exist (matched by email or item name) are left alone.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tracing::info;

use restaurant_erp::{
    config, db,
    services::{
        employees::{EmployeeInput, EmployeeService},
        menu_items::{MenuItemInput, MenuItemService},
        positions::PositionService,
    },
};

struct DemoEmployee {
    first_name: &'static str,
    last_name: &'static str,
    email: &'static str,
    position: &'static str,
    salary: Decimal,
}

const EMPLOYEES: [DemoEmployee; 3] = [
    DemoEmployee {
        first_name: "Maria",
        last_name: "Rossi",
        email: "manager@restaurant.com",
        position: "Manager",
        salary: dec!(4800.00),
    },
    DemoEmployee {
        first_name: "Luca",
        last_name: "Bianchi",
        email: "chef@restaurant.com",
        position: "Chef",
        salary: dec!(4200.00),
    },
    DemoEmployee {
        first_name: "Sam",
        last_name: "Taylor",
        email: "waiter@restaurant.com",
        position: "Waiter",
        salary: dec!(2600.00),
    },
];

const MENU: [(&str, &str, Decimal, bool); 6] = [
    ("Burger", "Beef patty, cheddar, pickles", dec!(9.50), true),
    ("Margherita", "Tomato, mozzarella, basil", dec!(11.00), true),
    ("Caesar Salad", "Romaine, parmesan, croutons", dec!(8.25), true),
    ("Fries", "Hand-cut, sea salt", dec!(3.75), true),
    ("Lemonade", "Freshly squeezed", dec!(2.25), true),
    ("Seasonal Soup", "Ask your server", dec!(6.00), false),
];

#[tokio::main]
async fn main() -> Result<()> {
    config::init_tracing("info", false);

    info!("=== Restaurant ERP Seed Data ===");

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://restaurant.db?mode=rwc".to_string());

    info!("Connecting to database: {}", database_url);
    let pool = db::establish_connection(&database_url).await?;
    db::run_migrations(&pool).await?;
    let pool = Arc::new(pool);

    let positions = PositionService::new(pool.clone()).list_positions().await?;
    let employees = EmployeeService::new(pool.clone());
    let hire_date = NaiveDate::from_ymd_opt(2024, 1, 15).context("invalid hire date")?;

    let mut created = 0;
    for demo in &EMPLOYEES {
        if employees.get_employee_by_email(demo.email).await?.is_some() {
            continue;
        }
        let position_id = positions
            .iter()
            .find(|p| p.position_name == demo.position)
            .map(|p| p.position_id)
            .with_context(|| format!("position {} is not seeded", demo.position))?;

        employees
            .create_employee(EmployeeInput {
                first_name: demo.first_name.to_string(),
                last_name: demo.last_name.to_string(),
                email: demo.email.to_string(),
                phone_number: None,
                hire_date,
                salary: demo.salary,
                position_id,
            })
            .await?;
        created += 1;
    }
    info!("  Created {} employees", created);

    let menu = MenuItemService::new(pool.clone());
    let existing = menu.list_menu_items().await?;
    let mut created = 0;
    for (name, description, price, is_active) in MENU {
        if existing.iter().any(|item| item.item_name == name) {
            continue;
        }
        menu.create_menu_item(MenuItemInput {
            item_name: name.to_string(),
            description: Some(description.to_string()),
            price,
            is_active,
        })
        .await?;
        created += 1;
    }
    info!("  Created {} menu items", created);

    info!("Seed complete");
    Ok(())
}
