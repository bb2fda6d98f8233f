use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One line of an order. The unit price is a snapshot taken when the order
/// was placed and never follows later menu changes.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "order_details")]
#[schema(as = OrderDetail)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub order_detail_id: Uuid,
    pub order_id: Uuid,
    /// Null once the menu item has been deleted
    pub menu_item_id: Option<i32>,
    pub quantity: i32,
    #[schema(value_type = String, example = "9.50")]
    pub price_at_time_of_order: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::OrderId",
        on_delete = "Cascade"
    )]
    Order,
    #[sea_orm(
        belongs_to = "super::menu_item::Entity",
        from = "Column::MenuItemId",
        to = "super::menu_item::Column::MenuItemId",
        on_delete = "SetNull"
    )]
    MenuItem,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::menu_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MenuItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
