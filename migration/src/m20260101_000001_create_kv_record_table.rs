use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(KvRecord::Table)
                    .if_not_exists()
                    .col(string(KvRecord::Key).primary_key())
                    .col(json(KvRecord::Value))
                    .col(
                        timestamp(KvRecord::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(KvRecord::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum KvRecord {
    Table,
    Key,
    Value,
    UpdatedAt,
}
