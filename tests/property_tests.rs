use proptest::prelude::*;
use restaurant_erp::services::orders::{order_total, validate_line_items, LineItem};
use rust_decimal::Decimal;

fn line_strategy() -> impl Strategy<Value = LineItem> {
    (1i32..500, 1i32..50, 1i64..100_000).prop_map(|(menu_item_id, quantity, cents)| LineItem {
        menu_item_id,
        quantity,
        unit_price: Decimal::new(cents, 2),
    })
}

proptest! {
    #[test]
    fn total_is_sum_of_line_amounts(items in prop::collection::vec(line_strategy(), 1..20)) {
        let expected: Decimal = items
            .iter()
            .fold(Decimal::ZERO, |acc, item| acc + item.unit_price * Decimal::from(item.quantity));
        prop_assert_eq!(order_total(&items).unwrap(), expected);
        prop_assert!(validate_line_items(&items).is_ok());
    }

    #[test]
    fn total_does_not_depend_on_line_order(mut items in prop::collection::vec(line_strategy(), 1..20)) {
        let before = order_total(&items).unwrap();
        items.reverse();
        prop_assert_eq!(order_total(&items).unwrap(), before);
    }

    #[test]
    fn total_is_positive_and_keeps_cent_precision(items in prop::collection::vec(line_strategy(), 1..20)) {
        let total = order_total(&items).unwrap();
        prop_assert!(total > Decimal::ZERO);
        prop_assert!(total.scale() <= 2);
    }

    #[test]
    fn any_non_positive_quantity_is_rejected(
        mut items in prop::collection::vec(line_strategy(), 1..10),
        bad_quantity in -5i32..=0,
        index in any::<prop::sample::Index>(),
    ) {
        let i = index.index(items.len());
        items[i].quantity = bad_quantity;
        prop_assert!(validate_line_items(&items).is_err());
    }
}
