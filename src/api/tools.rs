//! Tool webhooks invoked by the conversational AI mid-call. These are
//! synchronous request/response: the assistant reads the `message` field
//! back to the caller, so every branch returns something speakable and a
//! backend failure never dead-ends the conversation.

use axum::{response::IntoResponse, Extension, Json};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::dispatch::{self, DispatchOutcome};
use crate::entities::call::{CallStatus, PriorityLevel};
use crate::entities::{call, Call};
use crate::escalation;
use crate::notifications::SmsNotifier;

#[derive(Debug, Deserialize)]
pub struct LookupCustomerRequest {
    #[serde(default)]
    pub phone_number: String,
}

/// Existing-customer check: any prior call row with a matching phone
/// counts, most recent wins.
pub async fn lookup_customer(
    Extension(db): Extension<DatabaseConnection>,
    Json(req): Json<LookupCustomerRequest>,
) -> impl IntoResponse {
    info!("Looking up customer: {}", req.phone_number);

    let previous = Call::find()
        .filter(call::Column::BusinessId.eq(super::default_business_id()))
        .filter(call::Column::CustomerPhone.eq(req.phone_number.clone()))
        .order_by_desc(call::Column::CreatedAt)
        .all(&db)
        .await;

    match previous {
        Ok(calls) if !calls.is_empty() => {
            let latest = &calls[0];
            Json(json!({
                "success": true,
                "is_existing_customer": true,
                "customer_name": latest.customer_name.clone().unwrap_or_else(|| "Unknown".to_string()),
                "customer_address": latest.customer_address.clone().unwrap_or_else(|| "Unknown".to_string()),
                "previous_calls_count": calls.len(),
                "message": "Welcome back! I have your information on file. How can we help you today?"
            }))
        }
        Ok(_) => Json(json!({
            "success": true,
            "is_existing_customer": false,
            "message": "I don't see you in our system yet. Can I get your name and address?"
        })),
        Err(e) => {
            error!("Customer lookup failed: {}", e);
            Json(json!({
                "success": false,
                "is_existing_customer": false,
                "message": "I'm having trouble looking up your information. Let me take your details."
            }))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DispatchEmergencyRequest {
    #[serde(default = "unknown")]
    pub customer_name: String,
    #[serde(default = "unknown")]
    pub address: String,
    #[serde(default = "default_issue")]
    pub issue: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

fn unknown() -> String {
    "Unknown".to_string()
}

fn default_issue() -> String {
    "Emergency situation".to_string()
}

/// The AI detected an emergency mid-call: create the call record, page the
/// on-call technician and open the escalation window. No technician on
/// call goes straight to the owner rather than silently succeeding.
pub async fn dispatch_emergency(
    Extension(db): Extension<DatabaseConnection>,
    Extension(notifier): Extension<SmsNotifier>,
    Json(req): Json<DispatchEmergencyRequest>,
) -> impl IntoResponse {
    info!(
        "Emergency dispatch: {} at {} - {}",
        req.customer_name, req.address, req.issue
    );

    let business_id = super::default_business_id();

    let row = call::ActiveModel {
        id: Set(Uuid::new_v4()),
        business_id: Set(business_id),
        customer_name: Set(Some(req.customer_name.clone())),
        customer_phone: Set(req.phone_number.clone()),
        customer_address: Set(Some(req.address.clone())),
        issue_description: Set(Some(req.issue.clone())),
        priority_level: Set(Some(PriorityLevel::Emergency.to_string())),
        status: Set(CallStatus::Dispatching.to_string()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };

    let call_row = match row.insert(&db).await {
        Ok(model) => model,
        Err(e) => {
            error!("Failed to create emergency call record: {}", e);
            return Json(json!({
                "success": false,
                "message": "I'm having trouble dispatching a technician. Let me transfer you to our emergency line."
            }));
        }
    };

    let technicians = match dispatch::on_call_technicians(&db, business_id).await {
        Ok(list) => list,
        Err(e) => {
            error!("Failed to load on-call roster: {}", e);
            Vec::new()
        }
    };

    match dispatch::dispatch_call(
        &db,
        &notifier,
        &call_row,
        &technicians,
        PriorityLevel::Emergency,
    )
    .await
    {
        Ok(DispatchOutcome::Dispatched {
            technician_name,
            eta,
            ..
        }) => Json(json!({
            "success": true,
            "message": format!(
                "I'm dispatching our emergency technician {} to your location right away. \
                 They should arrive within {}. Please stay safe.",
                technician_name, eta
            ),
            "technician_name": technician_name,
            "estimated_arrival": eta,
        })),
        Ok(DispatchOutcome::NoTechnicianAvailable) => {
            if let Err(e) = escalation::escalate_unstaffed_call(&db, &notifier, &call_row).await {
                error!("Owner escalation failed: {}", e);
            }
            Json(json!({
                "success": false,
                "message": "I'm very sorry, but I don't have any technicians available right now. \
                            Let me escalate this to our owner immediately."
            }))
        }
        Err(e) => {
            error!("Emergency dispatch failed: {}", e);
            Json(json!({
                "success": false,
                "message": "I'm having trouble dispatching a technician. Let me transfer you to our emergency line."
            }))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckCalendarRequest {
    #[serde(default = "default_service_type")]
    pub service_type: String,
}

fn default_service_type() -> String {
    "maintenance".to_string()
}

/// Fixed availability slots; there is no real scheduling engine behind this.
pub async fn check_calendar(Json(req): Json<CheckCalendarRequest>) -> impl IntoResponse {
    info!("Checking calendar for: {}", req.service_type);

    let available_slots = [
        "Tomorrow morning between 9 AM and 12 PM",
        "Tomorrow afternoon between 1 PM and 4 PM",
        "Day after tomorrow, any time between 8 AM and 5 PM",
    ];

    Json(json!({
        "success": true,
        "available_slots": available_slots,
        "message": format!(
            "For {}, I have availability: {}, {}, or {}. Which works best for you?",
            req.service_type, available_slots[0], available_slots[1], available_slots[2]
        )
    }))
}
