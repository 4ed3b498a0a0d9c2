use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::CallId).uuid().not_null())
                    .col(
                        ColumnDef::new(Notifications::RecipientType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Notifications::RecipientPhone)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notifications::Message).text().not_null())
                    .col(
                        ColumnDef::new(Notifications::Status)
                            .string()
                            .default("sent")
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Notifications::SentAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notifications::TimeoutAt).date_time())
                    .col(ColumnDef::new(Notifications::RespondedAt).date_time())
                    .col(ColumnDef::new(Notifications::ResponseText).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notifications-call_id")
                            .from(Notifications::Table, Notifications::CallId)
                            .to(Calls::Table, Calls::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The escalation sweeper scans for due rows still in 'sent'.
        manager
            .create_index(
                Index::create()
                    .name("idx-notifications-status-timeout_at")
                    .table(Notifications::Table)
                    .col(Notifications::Status)
                    .col(Notifications::TimeoutAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    CallId,
    RecipientType,
    RecipientPhone,
    Message,
    Status,
    SentAt,
    TimeoutAt,
    RespondedAt,
    ResponseText,
}

#[derive(DeriveIden)]
enum Calls {
    Table,
    Id,
}
