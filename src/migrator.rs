use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_positions_table::Migration),
            Box::new(m20240301_000002_create_employees_table::Migration),
            Box::new(m20240301_000003_create_menu_items_table::Migration),
            Box::new(m20240301_000004_create_customers_table::Migration),
            Box::new(m20240301_000005_create_orders_table::Migration),
            Box::new(m20240301_000006_create_order_details_table::Migration),
        ]
    }
}

/// Positions every installation starts with.
pub const SEED_POSITIONS: [&str; 5] = ["Manager", "Chef", "Waiter", "Cashier", "Host"];

mod m20240301_000001_create_positions_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000001_create_positions_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Positions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Positions::PositionId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Positions::PositionName)
                                .string_len(50)
                                .not_null()
                                .unique_key(),
                        )
                        .to_owned(),
                )
                .await?;

            // Reference rows; re-running is harmless.
            let mut insert = Query::insert();
            insert
                .into_table(Positions::Table)
                .columns([Positions::PositionName]);
            for name in super::SEED_POSITIONS {
                insert
                    .values([name.into()])
                    .map_err(|e| DbErr::Custom(e.to_string()))?;
            }
            insert.on_conflict(
                OnConflict::column(Positions::PositionName)
                    .do_nothing()
                    .to_owned(),
            );

            manager.exec_stmt(insert).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Positions::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Positions {
        Table,
        PositionId,
        PositionName,
    }
}

mod m20240301_000002_create_employees_table {

    use super::m20240301_000001_create_positions_table::Positions;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000002_create_employees_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Employees::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Employees::EmployeeId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Employees::FirstName).string_len(50).not_null())
                        .col(ColumnDef::new(Employees::LastName).string_len(50).not_null())
                        .col(
                            ColumnDef::new(Employees::Email)
                                .string_len(100)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Employees::PhoneNumber).string_len(20).null())
                        .col(ColumnDef::new(Employees::HireDate).date().not_null())
                        .col(
                            ColumnDef::new(Employees::Salary)
                                .decimal_len(10, 2)
                                .not_null()
                                .check(Expr::col(Employees::Salary).gte(0)),
                        )
                        .col(ColumnDef::new(Employees::PositionId).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_employees_position_id")
                                .from(Employees::Table, Employees::PositionId)
                                .to(Positions::Table, Positions::PositionId)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_employees_last_name")
                        .table(Employees::Table)
                        .col(Employees::LastName)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Employees::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Employees {
        Table,
        EmployeeId,
        FirstName,
        LastName,
        Email,
        PhoneNumber,
        HireDate,
        Salary,
        PositionId,
    }
}

mod m20240301_000003_create_menu_items_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000003_create_menu_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(MenuItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MenuItems::MenuItemId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(MenuItems::ItemName).string_len(100).not_null())
                        .col(ColumnDef::new(MenuItems::Description).text().null())
                        .col(
                            ColumnDef::new(MenuItems::Price)
                                .decimal_len(10, 2)
                                .not_null()
                                .check(Expr::col(MenuItems::Price).gt(0)),
                        )
                        .col(
                            ColumnDef::new(MenuItems::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MenuItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum MenuItems {
        Table,
        MenuItemId,
        ItemName,
        Description,
        Price,
        IsActive,
    }
}

mod m20240301_000004_create_customers_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000004_create_customers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Customers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Customers::CustomerId)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Customers::FirstName).string_len(50).null())
                        .col(ColumnDef::new(Customers::LastName).string_len(50).null())
                        .col(ColumnDef::new(Customers::Email).string_len(100).not_null())
                        .col(ColumnDef::new(Customers::PhoneNumber).string_len(20).null())
                        .col(
                            ColumnDef::new(Customers::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // ensure_customer relies on this index for insert-or-ignore
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_customers_email")
                        .table(Customers::Table)
                        .col(Customers::Email)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Customers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Customers {
        Table,
        CustomerId,
        FirstName,
        LastName,
        Email,
        PhoneNumber,
        CreatedAt,
    }
}

mod m20240301_000005_create_orders_table {

    use super::m20240301_000002_create_employees_table::Employees;
    use super::m20240301_000004_create_customers_table::Customers;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000005_create_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Orders::OrderId).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Orders::CustomerId).uuid().null())
                        .col(ColumnDef::new(Orders::EmployeeId).integer().not_null())
                        .col(
                            ColumnDef::new(Orders::OrderDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Orders::Status)
                                .string_len(20)
                                .not_null()
                                .default("pending"),
                        )
                        .col(ColumnDef::new(Orders::TotalAmount).decimal_len(10, 2).not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_customer_id")
                                .from(Orders::Table, Orders::CustomerId)
                                .to(Customers::Table, Customers::CustomerId)
                                .on_delete(ForeignKeyAction::SetNull)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_employee_id")
                                .from(Orders::Table, Orders::EmployeeId)
                                .to(Employees::Table, Employees::EmployeeId)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_customer_id")
                        .table(Orders::Table)
                        .col(Orders::CustomerId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_order_date")
                        .table(Orders::Table)
                        .col(Orders::OrderDate)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Orders {
        Table,
        OrderId,
        CustomerId,
        EmployeeId,
        OrderDate,
        Status,
        TotalAmount,
    }
}

mod m20240301_000006_create_order_details_table {

    use super::m20240301_000003_create_menu_items_table::MenuItems;
    use super::m20240301_000005_create_orders_table::Orders;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000006_create_order_details_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(OrderDetails::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderDetails::OrderDetailId)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(OrderDetails::OrderId).uuid().not_null())
                        .col(ColumnDef::new(OrderDetails::MenuItemId).integer().null())
                        .col(
                            ColumnDef::new(OrderDetails::Quantity)
                                .integer()
                                .not_null()
                                .check(Expr::col(OrderDetails::Quantity).gt(0)),
                        )
                        .col(
                            ColumnDef::new(OrderDetails::PriceAtTimeOfOrder)
                                .decimal_len(10, 2)
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_details_order_id")
                                .from(OrderDetails::Table, OrderDetails::OrderId)
                                .to(Orders::Table, Orders::OrderId)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        // history outlives the menu
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_details_menu_item_id")
                                .from(OrderDetails::Table, OrderDetails::MenuItemId)
                                .to(MenuItems::Table, MenuItems::MenuItemId)
                                .on_delete(ForeignKeyAction::SetNull)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_details_order_id")
                        .table(OrderDetails::Table)
                        .col(OrderDetails::OrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderDetails::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum OrderDetails {
        Table,
        OrderDetailId,
        OrderId,
        MenuItemId,
        Quantity,
        PriceAtTimeOfOrder,
    }
}
