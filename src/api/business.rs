use axum::{
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait};
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::entities::{business, Business};
use crate::region::{self, Region};

#[derive(Debug, Deserialize)]
pub struct BusinessPayload {
    pub name: String,
    pub phone_number: String,
    pub region: Option<String>,
    pub hours_start: Option<String>,
    pub hours_end: Option<String>,
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,
}

/// The stored region: taken from the payload when present, otherwise
/// inferred from the owner's area code, otherwise the southern default.
fn resolve_region(payload: &BusinessPayload) -> Region {
    match payload.region.as_deref() {
        Some(value) => Region::from_str_or_default(value),
        None => payload
            .owner_phone
            .as_deref()
            .map(region::resolve)
            .unwrap_or(Region::South),
    }
}

pub async fn create_business(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<BusinessPayload>,
) -> impl IntoResponse {
    let region = resolve_region(&payload);
    if payload.region.is_none() {
        info!(
            "Inferred region '{}' for business '{}'",
            region, payload.name
        );
    }

    let row = business::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        phone_number: Set(payload.phone_number),
        region: Set(region.to_string()),
        hours_start: Set(payload.hours_start),
        hours_end: Set(payload.hours_end),
        owner_name: Set(payload.owner_name),
        owner_phone: Set(payload.owner_phone),
        created_at: Set(Utc::now().naive_utc()),
    };

    match row.insert(&db).await {
        Ok(model) => (StatusCode::CREATED, Json(model)).into_response(),
        Err(e) => {
            error!("Failed to create business: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create business").into_response()
        }
    }
}

pub async fn get_business(
    Extension(db): Extension<DatabaseConnection>,
    Path(business_id): Path<Uuid>,
) -> impl IntoResponse {
    match Business::find_by_id(business_id).one(&db).await {
        Ok(Some(model)) => (StatusCode::OK, Json(model)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Business not found").into_response(),
        Err(e) => {
            error!("Failed to fetch business: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response()
        }
    }
}

pub async fn update_business(
    Extension(db): Extension<DatabaseConnection>,
    Path(business_id): Path<Uuid>,
    Json(payload): Json<BusinessPayload>,
) -> impl IntoResponse {
    let existing = match Business::find_by_id(business_id).one(&db).await {
        Ok(Some(model)) => model,
        Ok(None) => return (StatusCode::NOT_FOUND, "Business not found").into_response(),
        Err(e) => {
            error!("Failed to fetch business: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response();
        }
    };

    let region = resolve_region(&payload);

    let mut active: business::ActiveModel = existing.into();
    active.name = Set(payload.name);
    active.phone_number = Set(payload.phone_number);
    active.region = Set(region.to_string());
    active.hours_start = Set(payload.hours_start);
    active.hours_end = Set(payload.hours_end);
    active.owner_name = Set(payload.owner_name);
    active.owner_phone = Set(payload.owner_phone);

    match active.update(&db).await {
        Ok(model) => (StatusCode::OK, Json(model)).into_response(),
        Err(e) => {
            error!("Failed to update business: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to update business").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(region: Option<&str>, owner_phone: Option<&str>) -> BusinessPayload {
        BusinessPayload {
            name: "Bob's HVAC".to_string(),
            phone_number: "+15555550100".to_string(),
            region: region.map(str::to_string),
            hours_start: None,
            hours_end: None,
            owner_name: None,
            owner_phone: owner_phone.map(str::to_string),
        }
    }

    #[test]
    fn explicit_region_wins() {
        assert_eq!(resolve_region(&payload(Some("north"), Some("3055551234"))), Region::North);
    }

    #[test]
    fn region_inferred_from_owner_phone() {
        assert_eq!(resolve_region(&payload(None, Some("2125551234"))), Region::North);
        assert_eq!(resolve_region(&payload(None, Some("3055551234"))), Region::South);
    }

    #[test]
    fn defaults_south_without_region_or_phone() {
        assert_eq!(resolve_region(&payload(None, None)), Region::South);
    }
}
