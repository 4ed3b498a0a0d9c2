use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use crate::entities::{call, Call};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<u64>,
}

pub async fn list_business_calls(
    Extension(db): Extension<DatabaseConnection>,
    Path(business_id): Path<Uuid>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(50);

    let result = Call::find()
        .filter(call::Column::BusinessId.eq(business_id))
        .order_by_desc(call::Column::CreatedAt)
        .limit(limit)
        .all(&db)
        .await;

    match result {
        Ok(calls) => (StatusCode::OK, Json(calls)).into_response(),
        Err(e) => {
            error!("Failed to fetch calls: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch calls").into_response()
        }
    }
}

pub async fn get_call(
    Extension(db): Extension<DatabaseConnection>,
    Path(call_id): Path<Uuid>,
) -> impl IntoResponse {
    match Call::find_by_id(call_id).one(&db).await {
        Ok(Some(model)) => (StatusCode::OK, Json(model)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Call not found").into_response(),
        Err(e) => {
            error!("Failed to fetch call: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response()
        }
    }
}

pub async fn get_latest_call(
    Extension(db): Extension<DatabaseConnection>,
    Path(business_id): Path<Uuid>,
) -> impl IntoResponse {
    let result = Call::find()
        .filter(call::Column::BusinessId.eq(business_id))
        .order_by_desc(call::Column::CreatedAt)
        .one(&db)
        .await;

    match result {
        Ok(Some(model)) => (StatusCode::OK, Json(model)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "No calls found").into_response(),
        Err(e) => {
            error!("Failed to fetch latest call: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response()
        }
    }
}
