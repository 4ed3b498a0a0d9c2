use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use sea_orm_migration::prelude::*;
use uuid::Uuid;

use crate::entities::business;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Inbound webhooks attach calls to a single configured business; seed it
/// so a fresh database can take calls immediately.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let demo_id = Uuid::from_u128(1);

        if business::Entity::find_by_id(demo_id).one(db).await?.is_some() {
            return Ok(());
        }

        business::ActiveModel {
            id: Set(demo_id),
            name: Set("Bob's HVAC".to_owned()),
            phone_number: Set("+15555550000".to_owned()),
            region: Set("south".to_owned()),
            hours_start: Set(Some("08:00".to_owned())),
            hours_end: Set(Some("17:00".to_owned())),
            owner_name: Set(None),
            owner_phone: Set(None),
            created_at: Set(Utc::now().naive_utc()),
        }
        .insert(db)
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        business::Entity::delete_by_id(Uuid::from_u128(1))
            .exec(db)
            .await?;
        Ok(())
    }
}
