//! Inbound SMS webhook: technician replies to dispatch pages.

use axum::{response::IntoResponse, Extension, Form, Json};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::entities::call::CallStatus;
use crate::entities::notification::{NotificationStatus, RecipientType};
use crate::entities::{call, notification, Call, Notification, Technician};
use crate::notifications::{NotificationTemplates, SmsNotifier};
use crate::response::{parse_technician_response, TechResponse};

/// Form-encoded webhook body from the SMS gateway.
#[derive(Debug, Deserialize)]
pub struct InboundSms {
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "Body")]
    pub body: String,
}

pub async fn handle_inbound_sms(
    Extension(db): Extension<DatabaseConnection>,
    Extension(notifier): Extension<SmsNotifier>,
    Form(form): Form<InboundSms>,
) -> impl IntoResponse {
    let verdict = parse_technician_response(&form.body);
    info!("📨 SMS from {}: parsed as {:?}", form.from, verdict);

    let result = match verdict {
        TechResponse::Accept => record_acceptance(&db, &notifier, &form.from, &form.body).await,
        TechResponse::Reject => record_rejection(&db, &form.from, &form.body).await,
        TechResponse::Unknown => {
            info!("Unrecognized technician reply from {}", form.from);
            Ok(())
        }
    };

    if let Err(e) = result {
        // The gateway retries on 5xx; reply handling is best-effort, so
        // absorb the failure and acknowledge.
        error!("Failed to reconcile SMS reply: {}", e);
    }

    Json(json!({"status": "received"}))
}

/// The latest outstanding page for this phone number, if any.
async fn pending_notification_for(
    db: &DatabaseConnection,
    phone: &str,
) -> Result<Option<notification::Model>, DbErr> {
    Notification::find()
        .filter(notification::Column::RecipientType.eq(RecipientType::Technician.as_str()))
        .filter(notification::Column::RecipientPhone.eq(phone))
        .filter(notification::Column::Status.eq(NotificationStatus::Sent.as_str()))
        .order_by_desc(notification::Column::SentAt)
        .one(db)
        .await
}

async fn record_acceptance(
    db: &DatabaseConnection,
    notifier: &SmsNotifier,
    phone: &str,
    body: &str,
) -> Result<(), DbErr> {
    let Some(pending) = pending_notification_for(db, phone).await? else {
        warn!("Accept from {} matches no pending dispatch", phone);
        return Ok(());
    };

    let now = Utc::now().naive_utc();

    // Claim the page before the escalation sweeper can time it out; losing
    // the race means the escalation already went out and the accept is
    // recorded nowhere but the log.
    let claimed = Notification::update_many()
        .col_expr(
            notification::Column::Status,
            Expr::value(NotificationStatus::Responded.as_str()),
        )
        .col_expr(notification::Column::RespondedAt, Expr::value(now))
        .col_expr(
            notification::Column::ResponseText,
            Expr::value(body.to_string()),
        )
        .filter(notification::Column::Id.eq(pending.id))
        .filter(notification::Column::Status.eq(NotificationStatus::Sent.as_str()))
        .exec(db)
        .await?;

    if claimed.rows_affected == 0 {
        warn!("Dispatch for {} already timed out before the accept", phone);
        return Ok(());
    }

    if let Some(call_row) = Call::find_by_id(pending.call_id).one(db).await? {
        let dispatched_at = call_row.dispatched_at;
        let customer_phone = call_row.customer_phone.clone();
        let assigned_tech_id = call_row.assigned_tech_id;
        let is_emergency = call_row.priority_level.as_deref() == Some("emergency");

        let mut active: call::ActiveModel = call_row.into();
        active.status = Set(CallStatus::Accepted.to_string());
        active.accepted_at = Set(Some(now));
        active.update(db).await?;

        if let Some(dispatched_at) = dispatched_at {
            crate::metrics::record_acknowledgment_time((now - dispatched_at).num_seconds() as f64);
        }

        info!("Call {} accepted by technician at {}", pending.call_id, phone);

        // Tell the customer help is on the way. Best-effort only.
        if let Some(customer_phone) = customer_phone {
            let tech_name = match assigned_tech_id {
                Some(id) => Technician::find_by_id(id)
                    .one(db)
                    .await?
                    .map(|t| t.name)
                    .unwrap_or_else(|| "Our technician".to_string()),
                None => "Our technician".to_string(),
            };
            let confirmation =
                NotificationTemplates::customer_confirmation_sms(&tech_name, is_emergency);
            if let Err(e) = notifier.send_sms(&customer_phone, &confirmation).await {
                error!("Customer confirmation SMS failed: {}", e);
            }
        }
    }

    Ok(())
}

/// A rejection records the reply but leaves the page in 'sent', so the
/// escalation window still runs and the owner hears about the gap.
async fn record_rejection(db: &DatabaseConnection, phone: &str, body: &str) -> Result<(), DbErr> {
    let Some(pending) = pending_notification_for(db, phone).await? else {
        warn!("Reject from {} matches no pending dispatch", phone);
        return Ok(());
    };

    let mut active: notification::ActiveModel = pending.into();
    active.response_text = Set(Some(body.to_string()));
    active.update(db).await?;

    info!("Technician at {} declined; escalation window keeps running", phone);
    Ok(())
}
