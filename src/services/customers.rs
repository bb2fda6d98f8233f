use crate::{
    db::{DatabaseAccess, DbPool},
    entities::customer,
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, DbErr, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

/// Optional details recorded when a customer is first seen
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CustomerProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

impl CustomerProfile {
    /// Profile for a self-service sign-up: first name is the email's local part.
    pub fn from_email(email: &str) -> Self {
        let local = email.trim().split('@').next().unwrap_or_default();
        Self {
            first_name: (!local.is_empty()).then(|| local.to_string()),
            ..Default::default()
        }
    }
}

/// Canonical form under which customer emails are stored and matched.
pub fn normalize_email(email: &str) -> Result<String, ServiceError> {
    let normalized = email.trim().to_lowercase();
    if normalized.is_empty() || !validator::validate_email(normalized.as_str()) {
        return Err(ServiceError::ValidationError(format!(
            "Invalid customer email: '{}'",
            email.trim()
        )));
    }
    Ok(normalized)
}

#[derive(Clone)]
pub struct CustomerService {
    db: DatabaseAccess,
}

impl CustomerService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            db: DatabaseAccess::new(db_pool),
        }
    }

    /// Returns the id of the customer with this email, creating the row if needed.
    ///
    /// The insert is skipped by the unique email index when the row already
    /// exists, so concurrent first-time calls converge on one customer. The
    /// profile only applies to the creating call.
    #[instrument(skip(self, profile))]
    pub async fn ensure_customer(
        &self,
        email: &str,
        profile: CustomerProfile,
    ) -> Result<Uuid, ServiceError> {
        let email = normalize_email(email)?;

        let candidate = customer::ActiveModel {
            customer_id: Set(Uuid::new_v4()),
            first_name: Set(profile.first_name),
            last_name: Set(profile.last_name),
            email: Set(email.clone()),
            phone_number: Set(profile.phone_number),
            created_at: Set(Utc::now()),
        };

        let existing = self
            .db
            .execute("customers.ensure", |db| {
                Box::pin(async move {
                    let inserted = customer::Entity::insert(candidate)
                        .on_conflict(
                            OnConflict::column(customer::Column::Email)
                                .do_nothing()
                                .to_owned(),
                        )
                        .exec_without_returning(db)
                        .await?;
                    debug!(inserted, "Customer insert-or-ignore finished");

                    customer::Entity::find()
                        .filter(customer::Column::Email.eq(email.as_str()))
                        .one(db)
                        .await?
                        .ok_or_else(|| {
                            DbErr::RecordNotFound(format!("customer {} vanished after insert", email))
                        })
                })
            })
            .await?;

        Ok(existing.customer_id)
    }

    #[instrument(skip(self))]
    pub async fn get_customer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<customer::Model>, ServiceError> {
        let email = normalize_email(email)?;
        self.db
            .execute("customers.by_email", |db| {
                Box::pin(
                    customer::Entity::find()
                        .filter(customer::Column::Email.eq(email))
                        .one(db),
                )
            })
            .await
    }
}
