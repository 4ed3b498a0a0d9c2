use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "calls")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub business_id: Uuid,
    /// Call id assigned by the telephony provider. A call-ended event with
    /// an unknown id creates the row retroactively.
    pub provider_call_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub issue_description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub transcript: Option<String>,
    /// 'standard' or 'emergency'; NULL until classification ran.
    pub priority_level: Option<String>,
    pub status: String,
    pub assigned_tech_id: Option<Uuid>,
    pub recording_url: Option<String>,
    pub duration_seconds: Option<i32>,
    pub created_at: DateTime,
    pub dispatched_at: Option<DateTime>,
    pub accepted_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::business::Entity",
        from = "Column::BusinessId",
        to = "super::business::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Business,
    #[sea_orm(
        belongs_to = "super::technician::Entity",
        from = "Column::AssignedTechId",
        to = "super::technician::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Technician,
    #[sea_orm(has_many = "super::notification::Entity")]
    Notification,
}

impl Related<super::business::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Business.def()
    }
}

impl Related<super::technician::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Technician.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notification.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Lifecycle states for a call. Transitions only move forward; `Dispatched`
/// branches into either `Accepted` or `Escalated`, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStatus {
    Received,
    InProgress,
    Analyzing,
    Dispatching,
    Dispatched,
    Accepted,
    Escalated,
    Completed,
    Missed,
}

impl CallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Received => "received",
            CallStatus::InProgress => "in_progress",
            CallStatus::Analyzing => "analyzing",
            CallStatus::Dispatching => "dispatching",
            CallStatus::Dispatched => "dispatched",
            CallStatus::Accepted => "accepted",
            CallStatus::Escalated => "escalated",
            CallStatus::Completed => "completed",
            CallStatus::Missed => "missed",
        }
    }
}

impl std::fmt::Display for CallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityLevel {
    Standard,
    Emergency,
}

impl PriorityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityLevel::Standard => "standard",
            PriorityLevel::Emergency => "emergency",
        }
    }
}

impl std::fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
