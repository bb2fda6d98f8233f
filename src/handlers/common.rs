use crate::entities::menu_item;
use crate::errors::ServiceError;
use crate::services::orders::LineItem;
use crate::ApiResponse;
use axum::{http::StatusCode, Json};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// Standard created response
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

/// Prices requested lines against a menu snapshot.
///
/// Lines with an explicit price keep it; the rest take the menu's current
/// price. Items absent from `menu` are reported as `unknown`.
pub fn price_lines(
    menu: &[menu_item::Model],
    requested: impl IntoIterator<Item = (i32, i32, Option<Decimal>)>,
    unknown: impl Fn(i32) -> ServiceError,
) -> Result<Vec<LineItem>, ServiceError> {
    let prices: HashMap<i32, Decimal> = menu
        .iter()
        .map(|item| (item.menu_item_id, item.price))
        .collect();

    requested
        .into_iter()
        .map(|(menu_item_id, quantity, explicit_price)| {
            let unit_price = match explicit_price {
                Some(price) => price,
                None => *prices.get(&menu_item_id).ok_or_else(|| unknown(menu_item_id))?,
            };
            Ok(LineItem {
                menu_item_id,
                quantity,
                unit_price,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn item(id: i32, price: Decimal) -> menu_item::Model {
        menu_item::Model {
            menu_item_id: id,
            item_name: format!("Item {id}"),
            description: None,
            price,
            is_active: true,
        }
    }

    #[test]
    fn missing_prices_come_from_the_menu() {
        let menu = vec![item(1, dec!(9.50)), item(2, dec!(2.25))];
        let lines = price_lines(
            &menu,
            vec![(1, 2, None), (2, 1, Some(dec!(2.00)))],
            |id| ServiceError::NotFound(id.to_string()),
        )
        .unwrap();

        assert_eq!(lines[0].unit_price, dec!(9.50));
        assert_eq!(lines[1].unit_price, dec!(2.00));
    }

    #[test]
    fn unknown_item_without_price_is_reported() {
        let menu = vec![item(1, dec!(9.50))];
        assert_matches!(
            price_lines(&menu, vec![(7, 1, None)], |id| {
                ServiceError::ValidationError(format!("Menu item {id} is not available"))
            }),
            Err(ServiceError::ValidationError(msg)) if msg.contains('7')
        );
    }
}
