use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Calls::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Calls::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Calls::BusinessId).uuid().not_null())
                    .col(ColumnDef::new(Calls::ProviderCallId).string())
                    .col(ColumnDef::new(Calls::CustomerName).string())
                    .col(ColumnDef::new(Calls::CustomerPhone).string())
                    .col(ColumnDef::new(Calls::CustomerAddress).string())
                    .col(ColumnDef::new(Calls::IssueDescription).text())
                    .col(ColumnDef::new(Calls::Transcript).text())
                    .col(ColumnDef::new(Calls::PriorityLevel).string())
                    .col(
                        ColumnDef::new(Calls::Status)
                            .string()
                            .default("received")
                            .not_null(),
                    )
                    .col(ColumnDef::new(Calls::AssignedTechId).uuid())
                    .col(ColumnDef::new(Calls::RecordingUrl).string())
                    .col(ColumnDef::new(Calls::DurationSeconds).integer())
                    .col(ColumnDef::new(Calls::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Calls::DispatchedAt).date_time())
                    .col(ColumnDef::new(Calls::AcceptedAt).date_time())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-calls-business_id")
                            .from(Calls::Table, Calls::BusinessId)
                            .to(Businesses::Table, Businesses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-calls-assigned_tech_id")
                            .from(Calls::Table, Calls::AssignedTechId)
                            .to(Technicians::Table, Technicians::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // call-ended lookups come in by provider id
        manager
            .create_index(
                Index::create()
                    .name("idx-calls-provider_call_id")
                    .table(Calls::Table)
                    .col(Calls::ProviderCallId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Calls::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Calls {
    Table,
    Id,
    BusinessId,
    ProviderCallId,
    CustomerName,
    CustomerPhone,
    CustomerAddress,
    IssueDescription,
    Transcript,
    PriorityLevel,
    Status,
    AssignedTechId,
    RecordingUrl,
    DurationSeconds,
    CreatedAt,
    DispatchedAt,
    AcceptedAt,
}

#[derive(DeriveIden)]
enum Businesses {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Technicians {
    Table,
    Id,
}
