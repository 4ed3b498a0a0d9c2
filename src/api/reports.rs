use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use crate::entities::{daily_report, Business, DailyReport};
use crate::reports;

#[derive(Debug, Deserialize)]
pub struct GenerateParams {
    pub date: Option<NaiveDate>,
}

pub async fn generate_report(
    Extension(db): Extension<DatabaseConnection>,
    Path(business_id): Path<Uuid>,
    Query(params): Query<GenerateParams>,
) -> impl IntoResponse {
    match Business::find_by_id(business_id).one(&db).await {
        Ok(Some(_)) => {}
        Ok(None) => return (StatusCode::NOT_FOUND, "Business not found").into_response(),
        Err(e) => {
            error!("Failed to fetch business: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response();
        }
    }

    let date = params.date.unwrap_or_else(|| Utc::now().date_naive());

    match reports::generate_daily_report(&db, business_id, date).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => {
            error!("Failed to generate report: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate report").into_response()
        }
    }
}

pub async fn get_report(
    Extension(db): Extension<DatabaseConnection>,
    Path((business_id, report_date)): Path<(Uuid, NaiveDate)>,
) -> impl IntoResponse {
    let result = DailyReport::find()
        .filter(daily_report::Column::BusinessId.eq(business_id))
        .filter(daily_report::Column::ReportDate.eq(report_date))
        .one(&db)
        .await;

    match result {
        Ok(Some(model)) => (StatusCode::OK, Json(model)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Report not found").into_response(),
        Err(e) => {
            error!("Failed to fetch report: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response()
        }
    }
}
