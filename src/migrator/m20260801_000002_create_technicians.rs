use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Technicians::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Technicians::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Technicians::BusinessId).uuid().not_null())
                    .col(ColumnDef::new(Technicians::Name).string().not_null())
                    .col(
                        ColumnDef::new(Technicians::PhoneNumber)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Technicians::Email).string())
                    .col(
                        ColumnDef::new(Technicians::IsOnCall)
                            .boolean()
                            .default(false)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Technicians::PriorityOrder)
                            .integer()
                            .default(1)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Technicians::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-technicians-business_id")
                            .from(Technicians::Table, Technicians::BusinessId)
                            .to(Businesses::Table, Businesses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Technicians::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Technicians {
    Table,
    Id,
    BusinessId,
    Name,
    PhoneNumber,
    Email,
    IsOnCall,
    PriorityOrder,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Businesses {
    Table,
    Id,
}
