use crate::{
    db::{DatabaseAccess, DbPool},
    entities::menu_item,
    errors::ServiceError,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct MenuItemInput {
    #[validate(length(min = 1, max = 100, message = "Item name must be 1-100 characters"))]
    pub item_name: String,
    pub description: Option<String>,
    #[validate(custom = "super::positive_amount")]
    #[schema(value_type = String, example = "9.50")]
    pub price: Decimal,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Clone)]
pub struct MenuItemService {
    db: DatabaseAccess,
}

impl MenuItemService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            db: DatabaseAccess::new(db_pool),
        }
    }

    /// Whole menu, active or not, ordered by name
    #[instrument(skip(self))]
    pub async fn list_menu_items(&self) -> Result<Vec<menu_item::Model>, ServiceError> {
        self.db
            .execute("menu_items.list", |db| {
                Box::pin(
                    menu_item::Entity::find()
                        .order_by_asc(menu_item::Column::ItemName)
                        .all(db),
                )
            })
            .await
    }

    /// What customers may order right now
    #[instrument(skip(self))]
    pub async fn list_active_menu_items(&self) -> Result<Vec<menu_item::Model>, ServiceError> {
        self.db
            .execute("menu_items.list_active", |db| {
                Box::pin(
                    menu_item::Entity::find()
                        .filter(menu_item::Column::IsActive.eq(true))
                        .order_by_asc(menu_item::Column::ItemName)
                        .all(db),
                )
            })
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_menu_item(
        &self,
        menu_item_id: i32,
    ) -> Result<Option<menu_item::Model>, ServiceError> {
        self.db
            .execute("menu_items.get", |db| {
                Box::pin(menu_item::Entity::find_by_id(menu_item_id).one(db))
            })
            .await
    }

    #[instrument(skip(self, input), fields(item_name = %input.item_name))]
    pub async fn create_menu_item(
        &self,
        input: MenuItemInput,
    ) -> Result<menu_item::Model, ServiceError> {
        input.validate()?;

        let record = menu_item::ActiveModel {
            item_name: Set(input.item_name.trim().to_string()),
            description: Set(input.description),
            price: Set(input.price),
            is_active: Set(input.is_active),
            ..Default::default()
        };

        let created = self
            .db
            .execute("menu_items.create", |db| Box::pin(record.insert(db)))
            .await?;

        info!(menu_item_id = created.menu_item_id, "Menu item created");
        Ok(created)
    }

    /// Price changes here never touch existing order lines.
    #[instrument(skip(self, input), fields(menu_item_id = menu_item_id))]
    pub async fn update_menu_item(
        &self,
        menu_item_id: i32,
        input: MenuItemInput,
    ) -> Result<menu_item::Model, ServiceError> {
        input.validate()?;

        let updated = self
            .db
            .execute("menu_items.update", |db| {
                Box::pin(async move {
                    let Some(existing) = menu_item::Entity::find_by_id(menu_item_id).one(db).await?
                    else {
                        return Ok(None);
                    };

                    let mut record: menu_item::ActiveModel = existing.into();
                    record.item_name = Set(input.item_name.trim().to_string());
                    record.description = Set(input.description);
                    record.price = Set(input.price);
                    record.is_active = Set(input.is_active);
                    record.update(db).await.map(Some)
                })
            })
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Menu item {} not found", menu_item_id))
            })?;

        info!(menu_item_id, "Menu item updated");
        Ok(updated)
    }

    /// Removes the item; historical order lines keep their price and lose the link.
    #[instrument(skip(self))]
    pub async fn delete_menu_item(&self, menu_item_id: i32) -> Result<(), ServiceError> {
        let result = self
            .db
            .execute("menu_items.delete", |db| {
                Box::pin(menu_item::Entity::delete_by_id(menu_item_id).exec(db))
            })
            .await?;

        if result.rows_affected == 0 {
            warn!(menu_item_id, "Menu item not found for deletion");
            return Err(ServiceError::NotFound(format!(
                "Menu item {} not found",
                menu_item_id
            )));
        }

        info!(menu_item_id, "Menu item deleted");
        Ok(())
    }
}
