use crate::{
    db::{DatabaseAccess, DbPool},
    entities::{customer, employee, menu_item, order, order_detail, OrderStatus},
    errors::ServiceError,
    services::{fits_money_column, AMOUNT_SCALE, MAX_AMOUNT},
};
use chrono::{DateTime, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// One requested line: which item, how many, and the unit price charged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LineItem {
    pub menu_item_id: i32,
    pub quantity: i32,
    #[schema(value_type = String, example = "9.50")]
    pub unit_price: Decimal,
}

/// Order total: sum of quantity x unit price.
///
/// Fails instead of overflowing, and when the total would not fit the
/// `total_amount` column.
pub fn order_total(items: &[LineItem]) -> Result<Decimal, ServiceError> {
    let total = items.iter().try_fold(Decimal::ZERO, |acc, item| {
        item.unit_price
            .checked_mul(Decimal::from(item.quantity))
            .and_then(|amount| acc.checked_add(amount))
    });

    match total {
        Some(total) if total <= MAX_AMOUNT => Ok(total),
        _ => Err(ServiceError::ValidationError(format!(
            "Order total exceeds the maximum of {}",
            MAX_AMOUNT
        ))),
    }
}

/// Rejects requests that can never become a valid order.
pub fn validate_line_items(items: &[LineItem]) -> Result<(), ServiceError> {
    if items.is_empty() {
        return Err(ServiceError::ValidationError(
            "An order needs at least one line item".to_string(),
        ));
    }

    for item in items {
        if item.quantity <= 0 {
            return Err(ServiceError::ValidationError(format!(
                "Quantity for menu item {} must be positive, got {}",
                item.menu_item_id, item.quantity
            )));
        }
        if item.unit_price <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(format!(
                "Unit price for menu item {} must be positive, got {}",
                item.menu_item_id, item.unit_price
            )));
        }
        if !fits_money_column(&item.unit_price) {
            return Err(ServiceError::ValidationError(format!(
                "Unit price for menu item {} must have at most {} decimal places and not exceed {}, got {}",
                item.menu_item_id, AMOUNT_SCALE, MAX_AMOUNT, item.unit_price
            )));
        }
    }

    Ok(())
}

/// An order together with its line items
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlacedOrder {
    #[serde(flatten)]
    pub order: order::Model,
    pub details: Vec<order_detail::Model>,
}

/// Row of the staff order board
#[derive(Debug, Clone, FromQueryResult, Serialize, Deserialize, ToSchema)]
pub struct OrderSummary {
    pub order_id: Uuid,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    #[schema(value_type = String)]
    pub total_amount: Decimal,
    pub customer_id: Option<Uuid>,
    pub customer_first_name: Option<String>,
    pub customer_last_name: Option<String>,
    pub employee_id: i32,
    pub employee_first_name: String,
    pub employee_last_name: String,
}

/// One line of a customer's order history, flattened with its order header
#[derive(Debug, Clone, FromQueryResult, Serialize, Deserialize, ToSchema)]
pub struct CustomerOrderLine {
    pub order_id: Uuid,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    #[schema(value_type = String)]
    pub total_amount: Decimal,
    pub menu_item_id: Option<i32>,
    /// Missing when the menu item has since been deleted
    pub item_name: Option<String>,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub price_at_time_of_order: Decimal,
}

/// Order placement and status workflow
#[derive(Clone)]
pub struct OrderService {
    db: DatabaseAccess,
}

impl OrderService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            db: DatabaseAccess::new(db_pool),
        }
    }

    /// Persists an order and all of its lines in one transaction.
    ///
    /// The employee, the customer (when given) and every menu item must exist;
    /// otherwise nothing is written.
    #[instrument(skip(self, items), fields(line_count = items.len()))]
    pub async fn place_order(
        &self,
        customer_id: Option<Uuid>,
        employee_id: i32,
        items: Vec<LineItem>,
    ) -> Result<PlacedOrder, ServiceError> {
        validate_line_items(&items)?;

        let order_id = Uuid::new_v4();
        let total = order_total(&items)?;

        let placed = self
            .db
            .transaction(|txn| {
                Box::pin(async move {
                    employee::Entity::find_by_id(employee_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Employee {} not found", employee_id))
                        })?;

                    if let Some(customer_id) = customer_id {
                        customer::Entity::find_by_id(customer_id)
                            .one(txn)
                            .await?
                            .ok_or_else(|| {
                                ServiceError::NotFound(format!(
                                    "Customer {} not found",
                                    customer_id
                                ))
                            })?;
                    }

                    let wanted: BTreeSet<i32> = items.iter().map(|i| i.menu_item_id).collect();
                    let found: BTreeSet<i32> = menu_item::Entity::find()
                        .filter(menu_item::Column::MenuItemId.is_in(wanted.iter().copied()))
                        .all(txn)
                        .await?
                        .into_iter()
                        .map(|m| m.menu_item_id)
                        .collect();
                    if let Some(missing) = wanted.difference(&found).next() {
                        return Err(ServiceError::NotFound(format!(
                            "Menu item {} not found",
                            missing
                        )));
                    }

                    let order = order::ActiveModel {
                        order_id: Set(order_id),
                        customer_id: Set(customer_id),
                        employee_id: Set(employee_id),
                        order_date: Set(Utc::now()),
                        status: Set(OrderStatus::Pending),
                        total_amount: Set(total),
                    }
                    .insert(txn)
                    .await?;

                    let mut details = Vec::with_capacity(items.len());
                    for item in items {
                        let detail = order_detail::ActiveModel {
                            order_detail_id: Set(Uuid::new_v4()),
                            order_id: Set(order_id),
                            menu_item_id: Set(Some(item.menu_item_id)),
                            quantity: Set(item.quantity),
                            price_at_time_of_order: Set(item.unit_price),
                        }
                        .insert(txn)
                        .await?;
                        details.push(detail);
                    }

                    Ok(PlacedOrder { order, details })
                })
            })
            .await
            .map_err(|e| {
                warn!(order_id = %order_id, error = %e, "Order placement failed");
                counter!("restaurant.orders.failed", 1);
                e
            })?;

        counter!("restaurant.orders.placed", 1);
        info!(
            order_id = %order_id,
            employee_id,
            total = %placed.order.total_amount,
            "Order placed"
        );
        Ok(placed)
    }

    /// Sets the status without checking the current one.
    #[instrument(skip(self), fields(order_id = %order_id, new_status = new_status.as_str()))]
    pub async fn set_order_status(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
    ) -> Result<order::Model, ServiceError> {
        let updated = self
            .db
            .execute("orders.set_status", |db| {
                Box::pin(async move {
                    let result = order::Entity::update_many()
                        .col_expr(order::Column::Status, Expr::value(new_status.as_str()))
                        .filter(order::Column::OrderId.eq(order_id))
                        .exec(db)
                        .await?;
                    if result.rows_affected == 0 {
                        return Ok(None);
                    }
                    order::Entity::find_by_id(order_id).one(db).await
                })
            })
            .await?
            .ok_or_else(|| {
                warn!(order_id = %order_id, "Order not found for status update");
                ServiceError::NotFound(format!("Order {} not found", order_id))
            })?;

        info!(order_id = %order_id, status = updated.status.as_str(), "Order status updated");
        Ok(updated)
    }

    /// One order with its lines
    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: Uuid) -> Result<Option<PlacedOrder>, ServiceError> {
        let found = self
            .db
            .execute("orders.get", |db| {
                Box::pin(
                    order::Entity::find_by_id(order_id)
                        .find_with_related(order_detail::Entity)
                        .all(db),
                )
            })
            .await?;

        Ok(found
            .into_iter()
            .next()
            .map(|(order, details)| PlacedOrder { order, details }))
    }

    /// Every order with customer and employee names, newest first
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<OrderSummary>, ServiceError> {
        self.db
            .execute("orders.list", |db| {
                Box::pin(
                    order::Entity::find()
                        .select_only()
                        .columns([
                            order::Column::OrderId,
                            order::Column::OrderDate,
                            order::Column::Status,
                            order::Column::TotalAmount,
                            order::Column::CustomerId,
                            order::Column::EmployeeId,
                        ])
                        .column_as(customer::Column::FirstName, "customer_first_name")
                        .column_as(customer::Column::LastName, "customer_last_name")
                        .column_as(employee::Column::FirstName, "employee_first_name")
                        .column_as(employee::Column::LastName, "employee_last_name")
                        .join(JoinType::LeftJoin, order::Relation::Customer.def())
                        .join(JoinType::InnerJoin, order::Relation::Employee.def())
                        .order_by_desc(order::Column::OrderDate)
                        .into_model::<OrderSummary>()
                        .all(db),
                )
            })
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to list orders");
                e
            })
    }

    /// A customer's order history, one row per line, newest order first
    #[instrument(skip(self))]
    pub async fn customer_orders(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<CustomerOrderLine>, ServiceError> {
        self.db
            .execute("orders.by_customer", |db| {
                Box::pin(
                    order::Entity::find()
                        .select_only()
                        .columns([
                            order::Column::OrderId,
                            order::Column::OrderDate,
                            order::Column::Status,
                            order::Column::TotalAmount,
                        ])
                        .columns([
                            order_detail::Column::MenuItemId,
                            order_detail::Column::Quantity,
                            order_detail::Column::PriceAtTimeOfOrder,
                        ])
                        .column_as(menu_item::Column::ItemName, "item_name")
                        .join(JoinType::InnerJoin, order::Relation::OrderDetails.def())
                        .join(JoinType::LeftJoin, order_detail::Relation::MenuItem.def())
                        .filter(order::Column::CustomerId.eq(customer_id))
                        .order_by_desc(order::Column::OrderDate)
                        .order_by_asc(order_detail::Column::OrderDetailId)
                        .into_model::<CustomerOrderLine>()
                        .all(db),
                )
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn line(menu_item_id: i32, quantity: i32, unit_price: Decimal) -> LineItem {
        LineItem {
            menu_item_id,
            quantity,
            unit_price,
        }
    }

    #[test]
    fn total_sums_quantity_times_price() {
        let items = vec![line(1, 2, dec!(9.50)), line(2, 1, dec!(2.25))];
        assert_eq!(order_total(&items).unwrap(), dec!(21.25));
    }

    #[test]
    fn empty_orders_are_rejected() {
        assert_matches!(
            validate_line_items(&[]),
            Err(ServiceError::ValidationError(_))
        );
    }

    #[test]
    fn non_positive_quantity_or_price_is_rejected() {
        assert_matches!(
            validate_line_items(&[line(1, 0, dec!(1))]),
            Err(ServiceError::ValidationError(_))
        );
        assert_matches!(
            validate_line_items(&[line(1, 1, dec!(0))]),
            Err(ServiceError::ValidationError(_))
        );
        assert!(validate_line_items(&[line(1, 3, dec!(0.5))]).is_ok());
    }

    #[test]
    fn prices_beyond_the_money_column_are_rejected() {
        assert_matches!(
            validate_line_items(&[line(1, 3, dec!(0.005))]),
            Err(ServiceError::ValidationError(_))
        );
        assert_matches!(
            validate_line_items(&[line(1, 2, Decimal::MAX)]),
            Err(ServiceError::ValidationError(_))
        );
        assert!(validate_line_items(&[line(1, 1, dec!(99999999.99))]).is_ok());
    }

    #[test]
    fn overflowing_totals_are_errors_not_panics() {
        assert_matches!(
            order_total(&[line(1, 2, Decimal::MAX)]),
            Err(ServiceError::ValidationError(_))
        );
        assert_matches!(
            order_total(&[line(1, 1, Decimal::MAX), line(2, 1, Decimal::MAX)]),
            Err(ServiceError::ValidationError(_))
        );
        assert_matches!(
            order_total(&[line(1, 2, dec!(99999999.99))]),
            Err(ServiceError::ValidationError(_))
        );
    }
}
