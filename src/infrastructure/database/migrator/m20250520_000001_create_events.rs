//! Create events table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Events::SchoolNumber).string().not_null())
                    .col(ColumnDef::new(Events::Principal).string().not_null())
                    .col(ColumnDef::new(Events::Date).string().not_null())
                    .col(ColumnDef::new(Events::Time).string().not_null())
                    .col(ColumnDef::new(Events::Location).text().not_null())
                    .col(
                        ColumnDef::new(Events::Address)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Events::CeremonyType).string().not_null())
                    .col(ColumnDef::new(Events::Title).string().not_null())
                    .col(ColumnDef::new(Events::Year).string().not_null())
                    .col(
                        ColumnDef::new(Events::RawText)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Events::ExtractedAt).string().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Events {
    Table,
    Id,
    SchoolNumber,
    Principal,
    Date,
    Time,
    Location,
    Address,
    CeremonyType,
    Title,
    Year,
    RawText,
    ExtractedAt,
}
