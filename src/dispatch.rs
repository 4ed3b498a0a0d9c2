//! Technician dispatch for classified calls.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::entities::call::{CallStatus, PriorityLevel};
use crate::entities::notification::{NotificationStatus, RecipientType};
use crate::entities::{call, notification, technician, Technician};
use crate::notifications::{NotificationTemplates, SmsNotifier};

/// Fixed caller-facing arrival estimate; stands in for real scheduling.
pub const DISPATCH_ETA: &str = "30-60 minutes";

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Dispatched {
        technician_name: String,
        technician_phone: String,
        eta: String,
    },
    /// Nobody is on call. The caller is expected to escalate straight to
    /// the owner; no notification row is created here.
    NoTechnicianAvailable,
}

/// The on-call roster for a business, in dispatch order.
pub async fn on_call_technicians(
    db: &DatabaseConnection,
    business_id: Uuid,
) -> Result<Vec<technician::Model>, DbErr> {
    Technician::find()
        .filter(technician::Column::BusinessId.eq(business_id))
        .filter(technician::Column::IsOnCall.eq(true))
        .order_by_asc(technician::Column::PriorityOrder)
        .order_by_asc(technician::Column::CreatedAt)
        .all(db)
        .await
}

/// Single-target policy: the head of the priority order gets the page and
/// nobody else. There is no automatic fallback to the next technician; an
/// unanswered page reaches the owner through the escalation window instead.
pub fn select_primary_technician(technicians: &[technician::Model]) -> Option<&technician::Model> {
    technicians.first()
}

/// Page a technician for a call and persist the dispatch state.
///
/// `technicians` must already be in dispatch order (see
/// [`on_call_technicians`]). The escalation deadline is stamped onto the
/// notification row so the sweeper can pick it up, restart or not.
pub async fn dispatch_call(
    db: &DatabaseConnection,
    notifier: &SmsNotifier,
    call_row: &call::Model,
    technicians: &[technician::Model],
    priority: PriorityLevel,
) -> Result<DispatchOutcome, DbErr> {
    let Some(tech) = select_primary_technician(technicians) else {
        info!("No on-call technician for call {}", call_row.id);
        return Ok(DispatchOutcome::NoTechnicianAvailable);
    };

    let now = Utc::now().naive_utc();

    let mut active: call::ActiveModel = call_row.clone().into();
    active.status = Set(CallStatus::Dispatched.to_string());
    active.assigned_tech_id = Set(Some(tech.id));
    active.dispatched_at = Set(Some(now));
    active.update(db).await?;

    let customer_name = call_row.customer_name.as_deref().unwrap_or("Unknown");
    let customer_phone = call_row.customer_phone.as_deref().unwrap_or("Not provided");
    let customer_address = call_row.customer_address.as_deref().unwrap_or("Not provided");
    let issue = call_row
        .issue_description
        .as_deref()
        .unwrap_or("HVAC issue");

    let message = match priority {
        PriorityLevel::Emergency => NotificationTemplates::emergency_alert_sms(
            customer_name,
            customer_phone,
            customer_address,
            issue,
        ),
        PriorityLevel::Standard => NotificationTemplates::standard_alert_sms(
            customer_name,
            customer_phone,
            customer_address,
            issue,
        ),
    };

    match notifier.send_sms(&tech.phone_number, &message).await {
        Ok(()) => {
            let row = notification::ActiveModel {
                id: Set(Uuid::new_v4()),
                call_id: Set(call_row.id),
                recipient_type: Set(RecipientType::Technician.to_string()),
                recipient_phone: Set(tech.phone_number.clone()),
                message: Set(message),
                status: Set(NotificationStatus::Sent.to_string()),
                sent_at: Set(now),
                timeout_at: Set(Some(now + crate::escalation::response_window())),
                ..Default::default()
            };
            row.insert(db).await?;
            crate::metrics::increment_dispatches(priority.as_str());
        }
        Err(e) => {
            // The page never went out; leave no pending row so the sweeper
            // has nothing to escalate against.
            error!("Dispatch SMS to {} failed: {}", tech.phone_number, e);
        }
    }

    info!(
        "Call {} dispatched to {} ({})",
        call_row.id, tech.name, tech.phone_number
    );

    Ok(DispatchOutcome::Dispatched {
        technician_name: tech.name.clone(),
        technician_phone: tech.phone_number.clone(),
        eta: DISPATCH_ETA.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tech(name: &str, priority_order: i32) -> technician::Model {
        technician::Model {
            id: Uuid::new_v4(),
            business_id: Uuid::from_u128(1),
            name: name.to_string(),
            phone_number: "+15555550100".to_string(),
            email: None,
            is_on_call: true,
            priority_order,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn selects_head_of_priority_order() {
        let roster = vec![tech("primary", 1), tech("backup", 2)];
        let chosen = select_primary_technician(&roster).unwrap();
        assert_eq!(chosen.name, "primary");
    }

    #[test]
    fn empty_roster_selects_nobody() {
        assert!(select_primary_technician(&[]).is_none());
    }
}
