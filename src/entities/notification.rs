use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub call_id: Uuid,
    /// 'technician' or 'owner'.
    pub recipient_type: String,
    pub recipient_phone: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    /// 'sent', 'delivered', 'responded' or 'timeout'. At most one
    /// technician notification per call may sit in 'sent'.
    pub status: String,
    pub sent_at: DateTime,
    /// Escalation deadline. Persisted so a restart does not lose pending
    /// windows; the sweeper reconciles due rows against current status.
    /// NULL for owner notifications, which are never re-escalated.
    pub timeout_at: Option<DateTime>,
    pub responded_at: Option<DateTime>,
    #[sea_orm(column_type = "Text", nullable)]
    pub response_text: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::call::Entity",
        from = "Column::CallId",
        to = "super::call::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Call,
}

impl Related<super::call::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Call.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStatus {
    Sent,
    Delivered,
    Responded,
    Timeout,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Sent => "sent",
            NotificationStatus::Delivered => "delivered",
            NotificationStatus::Responded => "responded",
            NotificationStatus::Timeout => "timeout",
        }
    }
}

impl std::fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientType {
    Technician,
    Owner,
}

impl RecipientType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipientType::Technician => "technician",
            RecipientType::Owner => "owner",
        }
    }
}

impl std::fmt::Display for RecipientType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
