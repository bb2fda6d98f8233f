use crate::{
    db::{DatabaseAccess, DbPool},
    entities::position,
    errors::ServiceError,
};
use sea_orm::{EntityTrait, QueryOrder};
use std::sync::Arc;
use tracing::instrument;

/// Read-only access to the positions reference table
#[derive(Clone)]
pub struct PositionService {
    db: DatabaseAccess,
}

impl PositionService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            db: DatabaseAccess::new(db_pool),
        }
    }

    /// All positions ordered by name
    #[instrument(skip(self))]
    pub async fn list_positions(&self) -> Result<Vec<position::Model>, ServiceError> {
        self.db
            .execute("positions.list", |db| {
                Box::pin(
                    position::Entity::find()
                        .order_by_asc(position::Column::PositionName)
                        .all(db),
                )
            })
            .await
    }
}
