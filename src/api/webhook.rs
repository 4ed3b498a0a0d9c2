//! Webhooks from the telephony provider: call lifecycle events and
//! real-time transcript updates.

use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::classifier::EmergencyClassifier;
use crate::dispatch::{self, DispatchOutcome};
use crate::entities::call::{CallStatus, PriorityLevel};
use crate::entities::{call, Call};
use crate::escalation;
use crate::notifications::SmsNotifier;
use crate::region;

#[derive(Debug, Deserialize)]
pub struct VoiceWebhook {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub call: CallEnvelope,
    #[serde(default)]
    pub message: Option<EventMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallEnvelope {
    pub id: Option<String>,
    #[serde(default)]
    pub customer: CustomerInfo,
    pub transcript: Option<String>,
    #[serde(rename = "recordingUrl")]
    pub recording_url: Option<String>,
    pub duration: Option<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerInfo {
    pub number: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventMessage {
    pub transcript: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}

/// Provider status tokens mapped onto our call lifecycle. Unknown tokens
/// pass through unchanged.
pub fn map_provider_status(token: &str) -> &str {
    match token {
        "queued" | "ringing" => "received",
        "in-progress" | "forwarding" => "in_progress",
        "ended" => "completed",
        other => other,
    }
}

pub async fn handle_voice_event(
    Extension(db): Extension<DatabaseConnection>,
    Extension(notifier): Extension<SmsNotifier>,
    Extension(classifier): Extension<Arc<EmergencyClassifier>>,
    Json(payload): Json<VoiceWebhook>,
) -> impl IntoResponse {
    info!("📥 Received voice webhook: {}", payload.event_type);

    match payload.event_type.as_str() {
        "call-started" => handle_call_started(&db, &payload.call).await.into_response(),
        "transcript" => handle_transcript_update(&db, &payload).await.into_response(),
        "status-update" => handle_status_update(&db, &payload).await.into_response(),
        "function-call" => {
            // The tool webhooks carry the real work; this event is an ack.
            Json(json!({"result": {"success": true}})).into_response()
        }
        "call-ended" => {
            let envelope = payload.call.clone();
            // Finalization classifies and may dispatch; run it detached so
            // the provider gets its response immediately.
            tokio::spawn(async move {
                finalize_call(&db, &notifier, &classifier, envelope).await;
            });
            (StatusCode::OK, Json(json!({"status": "processing"}))).into_response()
        }
        _ => Json(json!({"status": "received"})).into_response(),
    }
}

async fn handle_call_started(db: &DatabaseConnection, envelope: &CallEnvelope) -> impl IntoResponse {
    let row = call::ActiveModel {
        id: Set(Uuid::new_v4()),
        business_id: Set(super::default_business_id()),
        provider_call_id: Set(envelope.id.clone()),
        customer_phone: Set(envelope.customer.number.clone()),
        transcript: Set(Some(String::new())),
        status: Set(CallStatus::InProgress.to_string()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };

    match row.insert(db).await {
        Ok(model) => {
            info!(
                "📞 Call started - ID: {} from {:?}",
                model.id, model.customer_phone
            );
            crate::metrics::increment_calls_received();
            Json(json!({"status": "call_created", "call_id": model.id})).into_response()
        }
        Err(e) => {
            error!("Failed to create call record: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create call").into_response()
        }
    }
}

async fn find_by_provider_id(
    db: &DatabaseConnection,
    provider_call_id: &Option<String>,
) -> Option<call::Model> {
    let provider_call_id = provider_call_id.as_deref()?;
    Call::find()
        .filter(call::Column::ProviderCallId.eq(provider_call_id))
        .one(db)
        .await
        .ok()
        .flatten()
}

async fn handle_transcript_update(
    db: &DatabaseConnection,
    payload: &VoiceWebhook,
) -> impl IntoResponse {
    let Some(message) = &payload.message else {
        return Json(json!({"status": "received"}));
    };
    let Some(text) = message.transcript.as_deref().filter(|t| !t.is_empty()) else {
        return Json(json!({"status": "received"}));
    };

    let speaker = if message.role.as_deref() == Some("user") {
        "Customer"
    } else {
        "AI"
    };
    let new_line = format!("{}: {}", speaker, text);

    if let Some(call_row) = find_by_provider_id(db, &payload.call.id).await {
        let updated = match call_row.transcript.as_deref() {
            Some("") | None => new_line,
            Some(existing) => format!("{}\n{}", existing, new_line),
        };

        let mut active: call::ActiveModel = call_row.into();
        active.transcript = Set(Some(updated));
        if let Err(e) = active.update(db).await {
            error!("Failed to append transcript line: {}", e);
        }
    } else {
        warn!("Transcript update for unknown call {:?}", payload.call.id);
    }

    Json(json!({"status": "received"}))
}

async fn handle_status_update(
    db: &DatabaseConnection,
    payload: &VoiceWebhook,
) -> impl IntoResponse {
    let token = payload
        .message
        .as_ref()
        .and_then(|m| m.status.clone())
        .or_else(|| payload.call.status.clone());

    let Some(token) = token else {
        return Json(json!({"status": "received"}));
    };

    let mapped = map_provider_status(&token);
    info!("🔄 Status update: {} -> {}", token, mapped);

    if let Some(call_row) = find_by_provider_id(db, &payload.call.id).await {
        let mut active: call::ActiveModel = call_row.into();
        active.status = Set(mapped.to_string());
        if let Err(e) = active.update(db).await {
            error!("Failed to update call status: {}", e);
        }
    }

    Json(json!({"status": "received"}))
}

/// Final bookkeeping once the phone conversation is over: store the final
/// transcript and recording, then classify the call and dispatch if the
/// conversation turned out to be an emergency nobody acted on mid-call.
async fn finalize_call(
    db: &DatabaseConnection,
    notifier: &SmsNotifier,
    classifier: &EmergencyClassifier,
    envelope: CallEnvelope,
) {
    let existing = find_by_provider_id(db, &envelope.id).await;

    let call_row = match existing {
        Some(row) => {
            let mut active: call::ActiveModel = row.into();
            if let Some(transcript) = envelope.transcript.as_deref().filter(|t| !t.is_empty()) {
                active.transcript = Set(Some(transcript.to_string()));
            }
            active.recording_url = Set(envelope.recording_url.clone());
            active.duration_seconds = Set(envelope.duration);
            active.status = Set(CallStatus::Analyzing.to_string());
            match active.update(db).await {
                Ok(model) => model,
                Err(e) => {
                    error!("Failed to finalize call: {}", e);
                    return;
                }
            }
        }
        None => {
            // Start event never arrived; create the record retroactively.
            warn!(
                "No existing call record for {:?}, creating one",
                envelope.id
            );
            let row = call::ActiveModel {
                id: Set(Uuid::new_v4()),
                business_id: Set(super::default_business_id()),
                provider_call_id: Set(envelope.id.clone()),
                customer_phone: Set(envelope.customer.number.clone()),
                transcript: Set(envelope.transcript.clone()),
                recording_url: Set(envelope.recording_url.clone()),
                duration_seconds: Set(envelope.duration),
                status: Set(CallStatus::Analyzing.to_string()),
                created_at: Set(Utc::now().naive_utc()),
                ..Default::default()
            };
            match row.insert(db).await {
                Ok(model) => model,
                Err(e) => {
                    error!("Failed to create call record on call-ended: {}", e);
                    return;
                }
            }
        }
    };

    // A call the AI already dispatched mid-conversation keeps its state.
    if call_row.assigned_tech_id.is_some() {
        return;
    }

    let transcript = call_row.transcript.clone().unwrap_or_default();
    let phone = call_row.customer_phone.clone().unwrap_or_default();
    let region = region::resolve(&phone);
    let classification = classifier.classify(&transcript, region).await;

    info!(
        "Call {} classified: emergency={} type={:?} confidence={:.2}",
        call_row.id,
        classification.is_emergency,
        classification.emergency_type,
        classification.confidence
    );

    let priority = if classification.is_emergency {
        PriorityLevel::Emergency
    } else {
        PriorityLevel::Standard
    };

    let call_row = {
        let mut active: call::ActiveModel = call_row.into();
        active.priority_level = Set(Some(priority.to_string()));
        if priority == PriorityLevel::Standard {
            active.status = Set(CallStatus::Completed.to_string());
        }
        match active.update(db).await {
            Ok(model) => model,
            Err(e) => {
                error!("Failed to record classification: {}", e);
                return;
            }
        }
    };

    if priority != PriorityLevel::Emergency {
        return;
    }

    let technicians = match dispatch::on_call_technicians(db, call_row.business_id).await {
        Ok(list) => list,
        Err(e) => {
            error!("Failed to load on-call roster: {}", e);
            return;
        }
    };

    match dispatch::dispatch_call(db, notifier, &call_row, &technicians, priority).await {
        Ok(DispatchOutcome::Dispatched {
            technician_name, ..
        }) => {
            info!("Post-call emergency dispatch to {}", technician_name);
        }
        Ok(DispatchOutcome::NoTechnicianAvailable) => {
            if let Err(e) = escalation::escalate_unstaffed_call(db, notifier, &call_row).await {
                error!("Owner escalation failed: {}", e);
            }
        }
        Err(e) => {
            error!("Post-call dispatch failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_statuses_map_through_fixed_table() {
        assert_eq!(map_provider_status("queued"), "received");
        assert_eq!(map_provider_status("ringing"), "received");
        assert_eq!(map_provider_status("in-progress"), "in_progress");
        assert_eq!(map_provider_status("forwarding"), "in_progress");
        assert_eq!(map_provider_status("ended"), "completed");
    }

    #[test]
    fn unknown_status_tokens_pass_through() {
        assert_eq!(map_provider_status("on-hold"), "on-hold");
    }

    #[test]
    fn webhook_envelope_deserializes_provider_payload() {
        let payload: VoiceWebhook = serde_json::from_str(
            r#"{
                "type": "call-ended",
                "call": {
                    "id": "prov-123",
                    "customer": {"number": "+12125550100"},
                    "transcript": "Customer: no heat",
                    "recordingUrl": "https://recordings.example/1.wav",
                    "duration": 95
                }
            }"#,
        )
        .unwrap();
        assert_eq!(payload.event_type, "call-ended");
        assert_eq!(payload.call.id.as_deref(), Some("prov-123"));
        assert_eq!(payload.call.duration, Some(95));
        assert_eq!(
            payload.call.recording_url.as_deref(),
            Some("https://recordings.example/1.wav")
        );
    }

    #[test]
    fn webhook_envelope_tolerates_minimal_payload() {
        let payload: VoiceWebhook = serde_json::from_str(r#"{"type": "transcript"}"#).unwrap();
        assert_eq!(payload.event_type, "transcript");
        assert!(payload.call.id.is_none());
        assert!(payload.message.is_none());
    }
}
