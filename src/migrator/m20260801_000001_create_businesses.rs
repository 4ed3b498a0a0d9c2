use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Businesses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Businesses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Businesses::Name).string().not_null())
                    .col(ColumnDef::new(Businesses::PhoneNumber).string().not_null())
                    .col(ColumnDef::new(Businesses::Region).string().not_null())
                    .col(ColumnDef::new(Businesses::HoursStart).string())
                    .col(ColumnDef::new(Businesses::HoursEnd).string())
                    .col(ColumnDef::new(Businesses::OwnerName).string())
                    .col(ColumnDef::new(Businesses::OwnerPhone).string())
                    .col(
                        ColumnDef::new(Businesses::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Businesses::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Businesses {
    Table,
    Id,
    Name,
    PhoneNumber,
    Region,
    HoursStart,
    HoursEnd,
    OwnerName,
    OwnerPhone,
    CreatedAt,
}
