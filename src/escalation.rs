//! Owner escalation for unanswered dispatch pages.
//!
//! Deadlines are persisted on notification rows (`timeout_at`) and a
//! recurring sweeper reconciles due rows against their current status, so
//! pending windows survive a process restart. Reading the status at fire
//! time is the cancellation mechanism: an accept that lands first leaves
//! nothing for the sweeper to claim.

use chrono::{Duration, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter,
};
use std::env;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::entities::call::CallStatus;
use crate::entities::notification::{NotificationStatus, RecipientType};
use crate::entities::{call, notification, Business, Call, Notification};
use crate::notifications::{NotificationTemplates, SmsNotifier};

/// How long a paged technician has to answer before the owner is pulled in.
pub fn response_window() -> Duration {
    let secs = env::var("TECH_RESPONSE_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(300);
    Duration::seconds(secs)
}

fn sweep_interval() -> std::time::Duration {
    let secs = env::var("ESCALATION_SWEEP_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(15);
    std::time::Duration::from_secs(secs)
}

/// Spawn the detached background task that turns expired pages into owner
/// escalations.
pub fn start_escalation_sweeper(db: DatabaseConnection, notifier: SmsNotifier) {
    tokio::spawn(async move {
        info!("Escalation sweeper started");
        loop {
            if let Err(e) = escalate_due(&db, &notifier).await {
                error!("Escalation sweep failed: {}", e);
            }
            tokio::time::sleep(sweep_interval()).await;
        }
    });
}

/// One reconciliation pass over due technician pages. Returns how many
/// escalations were performed.
pub async fn escalate_due(db: &DatabaseConnection, notifier: &SmsNotifier) -> Result<u64, DbErr> {
    let now = Utc::now().naive_utc();

    let due = Notification::find()
        .filter(notification::Column::Status.eq(NotificationStatus::Sent.as_str()))
        .filter(notification::Column::RecipientType.eq(RecipientType::Technician.as_str()))
        .filter(notification::Column::TimeoutAt.lte(now))
        .all(db)
        .await?;

    let mut escalated = 0;
    for row in due {
        // Claim the timeout with a single conditional update. Zero rows
        // affected means an accept (or a concurrent sweep) won the race,
        // which is what keeps escalations at most-once per call.
        let claimed = Notification::update_many()
            .col_expr(
                notification::Column::Status,
                Expr::value(NotificationStatus::Timeout.as_str()),
            )
            .filter(notification::Column::Id.eq(row.id))
            .filter(notification::Column::Status.eq(NotificationStatus::Sent.as_str()))
            .exec(db)
            .await?;

        if claimed.rows_affected == 0 {
            continue;
        }

        escalate_call(db, notifier, &row).await?;
        escalated += 1;
    }

    Ok(escalated)
}

async fn escalate_call(
    db: &DatabaseConnection,
    notifier: &SmsNotifier,
    timed_out: &notification::Model,
) -> Result<(), DbErr> {
    let Some(call_row) = Call::find_by_id(timed_out.call_id).one(db).await? else {
        warn!("Timed-out notification {} has no call row", timed_out.id);
        return Ok(());
    };

    info!(
        "Escalating call {} - no technician response within the window",
        call_row.id
    );

    // dispatched -> escalated is the terminal branch for an unanswered page.
    let mut active: call::ActiveModel = call_row.clone().into();
    active.status = Set(CallStatus::Escalated.to_string());
    active.update(db).await?;

    crate::metrics::increment_escalations();

    let business = Business::find_by_id(call_row.business_id).one(db).await?;
    let Some(owner_phone) = business.and_then(|b| b.owner_phone) else {
        warn!(
            "Business for call {} has no owner phone; escalation not delivered",
            call_row.id
        );
        return Ok(());
    };

    send_owner_escalation(
        db,
        notifier,
        &call_row,
        &owner_phone,
        "Technician did not respond within the response window",
    )
    .await
}

/// Coverage gap: nobody on call to page. Marks the call escalated and goes
/// straight to the owner.
pub async fn escalate_unstaffed_call(
    db: &DatabaseConnection,
    notifier: &SmsNotifier,
    call_row: &call::Model,
) -> Result<(), DbErr> {
    let mut active: call::ActiveModel = call_row.clone().into();
    active.status = Set(CallStatus::Escalated.to_string());
    active.update(db).await?;

    crate::metrics::increment_escalations();

    let business = Business::find_by_id(call_row.business_id).one(db).await?;
    let Some(owner_phone) = business.and_then(|b| b.owner_phone) else {
        warn!(
            "Business for call {} has no owner phone; escalation not delivered",
            call_row.id
        );
        return Ok(());
    };

    send_owner_escalation(
        db,
        notifier,
        call_row,
        &owner_phone,
        "No on-call technician available",
    )
    .await
}

/// Compose, send and persist the owner escalation for a call.
pub async fn send_owner_escalation(
    db: &DatabaseConnection,
    notifier: &SmsNotifier,
    call_row: &call::Model,
    owner_phone: &str,
    reason: &str,
) -> Result<(), DbErr> {
    let message = NotificationTemplates::owner_escalation_sms(
        call_row.customer_name.as_deref().unwrap_or("Unknown"),
        call_row.customer_phone.as_deref().unwrap_or("Not provided"),
        call_row.customer_address.as_deref().unwrap_or("Not provided"),
        call_row
            .issue_description
            .as_deref()
            .unwrap_or("HVAC issue"),
        reason,
    );

    if let Err(e) = notifier.send_sms(owner_phone, &message).await {
        error!("Owner escalation SMS failed: {}", e);
    }

    let row = notification::ActiveModel {
        id: Set(Uuid::new_v4()),
        call_id: Set(call_row.id),
        recipient_type: Set(RecipientType::Owner.to_string()),
        recipient_phone: Set(owner_phone.to_string()),
        message: Set(message),
        status: Set(NotificationStatus::Sent.to_string()),
        sent_at: Set(Utc::now().naive_utc()),
        // Owner notifications carry no deadline; they are never re-escalated.
        ..Default::default()
    };
    row.insert(db).await?;

    info!("Escalated call {} to owner at {}", call_row.id, owner_phone);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_window_defaults_to_five_minutes() {
        // TECH_RESPONSE_TIMEOUT_SECS is unset in the test environment.
        assert_eq!(response_window(), Duration::seconds(300));
    }

    #[test]
    fn sweep_interval_defaults_to_fifteen_seconds() {
        assert_eq!(sweep_interval(), std::time::Duration::from_secs(15));
    }
}
