//! Initial schema.
//!
//! - `users`: chats that completed registration
//! - `operations`: incomes and expenses, amounts in base-currency minor units

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    ChatId,
    Name,
}

#[derive(Iden)]
enum Operations {
    Table,
    Id,
    ChatId,
    TypeOperation,
    Sum,
    Date,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::ChatId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Operations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Operations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Operations::ChatId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Operations::TypeOperation)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Operations::Sum).big_integer().not_null())
                    .col(ColumnDef::new(Operations::Date).date().not_null())
                    .check(Expr::col(Operations::Sum).gt(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-operations-chat_id")
                            .from(Operations::Table, Operations::ChatId)
                            .to(Users::Table, Users::ChatId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-operations-chat_id-date")
                    .table(Operations::Table)
                    .col(Operations::ChatId)
                    .col(Operations::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Operations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
