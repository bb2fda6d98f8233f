use crate::{
    db::{DatabaseAccess, DbPool},
    entities::{employee, position},
    errors::ServiceError,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

/// Fields supplied when hiring or editing an employee
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct EmployeeInput {
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(max = 20))]
    pub phone_number: Option<String>,
    pub hire_date: NaiveDate,
    #[validate(custom = "super::non_negative_amount")]
    #[schema(value_type = String, example = "42000.00")]
    pub salary: Decimal,
    pub position_id: i32,
}

/// Employee row joined with its position name
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize, Deserialize, ToSchema)]
pub struct EmployeeWithPosition {
    pub employee_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub hire_date: NaiveDate,
    #[schema(value_type = String)]
    pub salary: Decimal,
    pub position_id: i32,
    pub position_name: String,
}

#[derive(Clone)]
pub struct EmployeeService {
    db: DatabaseAccess,
}

impl EmployeeService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            db: DatabaseAccess::new(db_pool),
        }
    }

    fn with_position() -> Select<employee::Entity> {
        employee::Entity::find()
            .select_only()
            .columns([
                employee::Column::EmployeeId,
                employee::Column::FirstName,
                employee::Column::LastName,
                employee::Column::Email,
                employee::Column::PhoneNumber,
                employee::Column::HireDate,
                employee::Column::Salary,
                employee::Column::PositionId,
            ])
            .column_as(position::Column::PositionName, "position_name")
            .join(JoinType::InnerJoin, employee::Relation::Position.def())
    }

    /// Staff list ordered by last name
    #[instrument(skip(self))]
    pub async fn list_employees(&self) -> Result<Vec<EmployeeWithPosition>, ServiceError> {
        self.db
            .execute("employees.list", |db| {
                Box::pin(
                    Self::with_position()
                        .order_by_asc(employee::Column::LastName)
                        .order_by_asc(employee::Column::FirstName)
                        .into_model::<EmployeeWithPosition>()
                        .all(db),
                )
            })
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_employee(
        &self,
        employee_id: i32,
    ) -> Result<Option<EmployeeWithPosition>, ServiceError> {
        self.db
            .execute("employees.get", |db| {
                Box::pin(
                    Self::with_position()
                        .filter(employee::Column::EmployeeId.eq(employee_id))
                        .into_model::<EmployeeWithPosition>()
                        .one(db),
                )
            })
            .await
    }

    /// Looks an employee up by login email
    #[instrument(skip(self))]
    pub async fn get_employee_by_email(
        &self,
        email: &str,
    ) -> Result<Option<employee::Model>, ServiceError> {
        let email = email.trim().to_string();
        self.db
            .execute("employees.by_email", |db| {
                Box::pin(
                    employee::Entity::find()
                        .filter(employee::Column::Email.eq(email))
                        .one(db),
                )
            })
            .await
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_employee(
        &self,
        input: EmployeeInput,
    ) -> Result<employee::Model, ServiceError> {
        input.validate()?;

        let record = employee::ActiveModel {
            first_name: Set(input.first_name.trim().to_string()),
            last_name: Set(input.last_name.trim().to_string()),
            email: Set(input.email.trim().to_string()),
            phone_number: Set(input.phone_number),
            hire_date: Set(input.hire_date),
            salary: Set(input.salary),
            position_id: Set(input.position_id),
            ..Default::default()
        };

        let created = self
            .db
            .execute("employees.create", |db| Box::pin(record.insert(db)))
            .await?;

        info!(employee_id = created.employee_id, "Employee created");
        Ok(created)
    }

    #[instrument(skip(self, input), fields(employee_id = employee_id))]
    pub async fn update_employee(
        &self,
        employee_id: i32,
        input: EmployeeInput,
    ) -> Result<employee::Model, ServiceError> {
        input.validate()?;

        let updated = self
            .db
            .execute("employees.update", |db| {
                Box::pin(async move {
                    let Some(existing) = employee::Entity::find_by_id(employee_id).one(db).await?
                    else {
                        return Ok(None);
                    };

                    let mut record: employee::ActiveModel = existing.into();
                    record.first_name = Set(input.first_name.trim().to_string());
                    record.last_name = Set(input.last_name.trim().to_string());
                    record.email = Set(input.email.trim().to_string());
                    record.phone_number = Set(input.phone_number);
                    record.hire_date = Set(input.hire_date);
                    record.salary = Set(input.salary);
                    record.position_id = Set(input.position_id);
                    record.update(db).await.map(Some)
                })
            })
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Employee {} not found", employee_id)))?;

        info!(employee_id, "Employee updated");
        Ok(updated)
    }
}
