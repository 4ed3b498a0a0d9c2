use axum::{extract::Path, http::StatusCode, response::IntoResponse, Extension, Json};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use crate::dispatch;
use crate::entities::technician;

#[derive(Debug, Deserialize)]
pub struct TechnicianPayload {
    pub business_id: Uuid,
    pub name: String,
    pub phone_number: String,
    pub email: Option<String>,
    #[serde(default)]
    pub is_on_call: bool,
    #[serde(default = "default_priority")]
    pub priority_order: i32,
}

fn default_priority() -> i32 {
    1
}

pub async fn create_technician(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<TechnicianPayload>,
) -> impl IntoResponse {
    let row = technician::ActiveModel {
        id: Set(Uuid::new_v4()),
        business_id: Set(payload.business_id),
        name: Set(payload.name),
        phone_number: Set(payload.phone_number),
        email: Set(payload.email),
        is_on_call: Set(payload.is_on_call),
        priority_order: Set(payload.priority_order),
        created_at: Set(Utc::now().naive_utc()),
    };

    match row.insert(&db).await {
        Ok(model) => (StatusCode::CREATED, Json(model)).into_response(),
        Err(e) => {
            error!("Failed to create technician: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create technician").into_response()
        }
    }
}

/// The on-call roster for a business, in dispatch order.
pub async fn list_on_call_technicians(
    Extension(db): Extension<DatabaseConnection>,
    Path(business_id): Path<Uuid>,
) -> impl IntoResponse {
    match dispatch::on_call_technicians(&db, business_id).await {
        Ok(list) => (StatusCode::OK, Json(list)).into_response(),
        Err(e) => {
            error!("Failed to fetch technicians: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch technicians").into_response()
        }
    }
}
