use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DailyReports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DailyReports::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DailyReports::BusinessId).uuid().not_null())
                    .col(
                        ColumnDef::new(DailyReports::ReportDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DailyReports::TotalCalls)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DailyReports::EmergencyCalls)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DailyReports::StandardCalls)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DailyReports::MissedCalls)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DailyReports::AvgResponseTimeSeconds).integer())
                    .col(ColumnDef::new(DailyReports::ReportData).json().not_null())
                    .col(
                        ColumnDef::new(DailyReports::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-daily_reports-business_id")
                            .from(DailyReports::Table, DailyReports::BusinessId)
                            .to(Businesses::Table, Businesses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-daily_reports-business-date")
                    .table(DailyReports::Table)
                    .col(DailyReports::BusinessId)
                    .col(DailyReports::ReportDate)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DailyReports::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DailyReports {
    Table,
    Id,
    BusinessId,
    ReportDate,
    TotalCalls,
    EmergencyCalls,
    StandardCalls,
    MissedCalls,
    AvgResponseTimeSeconds,
    ReportData,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Businesses {
    Table,
    Id,
}
