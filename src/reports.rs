//! Daily call-summary reports.

use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::entities::call::CallStatus;
use crate::entities::{call, daily_report, Call, DailyReport};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total_calls: usize,
    pub emergency_calls: usize,
    pub standard_calls: usize,
    pub missed_calls: usize,
    pub avg_response_time_seconds: Option<i32>,
}

/// Headline numbers for one day of calls. Response time is measured from
/// dispatch to acceptance; calls that never completed that pair are left
/// out of the average.
pub fn summarize(calls: &[call::Model]) -> ReportSummary {
    let emergency_calls = calls
        .iter()
        .filter(|c| c.priority_level.as_deref() == Some("emergency"))
        .count();
    let standard_calls = calls
        .iter()
        .filter(|c| c.priority_level.as_deref() == Some("standard"))
        .count();
    let missed_calls = calls
        .iter()
        .filter(|c| c.status == CallStatus::Missed.as_str())
        .count();

    let response_times: Vec<i64> = calls
        .iter()
        .filter_map(|c| match (c.dispatched_at, c.accepted_at) {
            (Some(dispatched), Some(accepted)) => Some((accepted - dispatched).num_seconds()),
            _ => None,
        })
        .collect();

    let avg_response_time_seconds = if response_times.is_empty() {
        None
    } else {
        Some((response_times.iter().sum::<i64>() / response_times.len() as i64) as i32)
    };

    ReportSummary {
        total_calls: calls.len(),
        emergency_calls,
        standard_calls,
        missed_calls,
        avg_response_time_seconds,
    }
}

fn emergency_detail(c: &call::Model) -> Value {
    json!({
        "time": c.created_at,
        "customer_name": c.customer_name,
        "customer_phone": c.customer_phone,
        "issue": c.issue_description,
        "status": c.status,
        "assigned_tech": c.assigned_tech_id,
    })
}

fn standard_detail(c: &call::Model) -> Value {
    json!({
        "time": c.created_at,
        "customer_name": c.customer_name,
        "customer_phone": c.customer_phone,
        "issue": c.issue_description,
        "status": c.status,
    })
}

fn missed_detail(c: &call::Model) -> Value {
    json!({
        "time": c.created_at,
        "customer_phone": c.customer_phone,
        "reason": "No answer or system error",
    })
}

/// Build the report for one business and day, persist it (replacing any
/// earlier report for the same day) and return the report payload.
pub async fn generate_daily_report(
    db: &DatabaseConnection,
    business_id: Uuid,
    date: NaiveDate,
) -> Result<Value, DbErr> {
    let day_start = date.and_time(NaiveTime::MIN);
    let day_end = day_start + chrono::Duration::days(1);

    let calls = Call::find()
        .filter(call::Column::BusinessId.eq(business_id))
        .filter(call::Column::CreatedAt.gte(day_start))
        .filter(call::Column::CreatedAt.lt(day_end))
        .order_by_asc(call::Column::CreatedAt)
        .all(db)
        .await?;

    let summary = summarize(&calls);

    let report_data = json!({
        "date": date,
        "summary": summary,
        "emergency_details": calls
            .iter()
            .filter(|c| c.priority_level.as_deref() == Some("emergency"))
            .map(emergency_detail)
            .collect::<Vec<_>>(),
        "standard_details": calls
            .iter()
            .filter(|c| c.priority_level.as_deref() == Some("standard"))
            .map(standard_detail)
            .collect::<Vec<_>>(),
        "missed_details": calls
            .iter()
            .filter(|c| c.status == CallStatus::Missed.as_str())
            .map(missed_detail)
            .collect::<Vec<_>>(),
    });

    let existing = DailyReport::find()
        .filter(daily_report::Column::BusinessId.eq(business_id))
        .filter(daily_report::Column::ReportDate.eq(date))
        .one(db)
        .await?;

    match existing {
        Some(report) => {
            let mut active: daily_report::ActiveModel = report.into();
            active.total_calls = Set(summary.total_calls as i32);
            active.emergency_calls = Set(summary.emergency_calls as i32);
            active.standard_calls = Set(summary.standard_calls as i32);
            active.missed_calls = Set(summary.missed_calls as i32);
            active.avg_response_time_seconds = Set(summary.avg_response_time_seconds);
            active.report_data = Set(report_data.clone());
            active.update(db).await?;
        }
        None => {
            let active = daily_report::ActiveModel {
                id: Set(Uuid::new_v4()),
                business_id: Set(business_id),
                report_date: Set(date),
                total_calls: Set(summary.total_calls as i32),
                emergency_calls: Set(summary.emergency_calls as i32),
                standard_calls: Set(summary.standard_calls as i32),
                missed_calls: Set(summary.missed_calls as i32),
                avg_response_time_seconds: Set(summary.avg_response_time_seconds),
                report_data: Set(report_data.clone()),
                created_at: Set(Utc::now().naive_utc()),
            };
            active.insert(db).await?;
        }
    }

    Ok(report_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn base_call() -> call::Model {
        call::Model {
            id: Uuid::new_v4(),
            business_id: Uuid::from_u128(1),
            provider_call_id: None,
            customer_name: Some("Jane Doe".to_string()),
            customer_phone: Some("+12125550100".to_string()),
            customer_address: None,
            issue_description: None,
            transcript: None,
            priority_level: None,
            status: "completed".to_string(),
            assigned_tech_id: None,
            recording_url: None,
            duration_seconds: None,
            created_at: ts("2026-08-03 10:00:00"),
            dispatched_at: None,
            accepted_at: None,
        }
    }

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn counts_calls_by_priority_and_missed_status() {
        let mut emergency = base_call();
        emergency.priority_level = Some("emergency".to_string());

        let mut standard = base_call();
        standard.priority_level = Some("standard".to_string());

        let mut missed = base_call();
        missed.status = "missed".to_string();

        let summary = summarize(&[emergency, standard, missed, base_call()]);
        assert_eq!(summary.total_calls, 4);
        assert_eq!(summary.emergency_calls, 1);
        assert_eq!(summary.standard_calls, 1);
        assert_eq!(summary.missed_calls, 1);
    }

    #[test]
    fn averages_dispatch_to_accept_latency() {
        let mut fast = base_call();
        fast.dispatched_at = Some(ts("2026-08-03 10:00:00"));
        fast.accepted_at = Some(ts("2026-08-03 10:01:00"));

        let mut slow = base_call();
        slow.dispatched_at = Some(ts("2026-08-03 11:00:00"));
        slow.accepted_at = Some(ts("2026-08-03 11:03:00"));

        // Never accepted; excluded from the average.
        let mut pending = base_call();
        pending.dispatched_at = Some(ts("2026-08-03 12:00:00"));

        let summary = summarize(&[fast, slow, pending]);
        assert_eq!(summary.avg_response_time_seconds, Some(120));
    }

    #[test]
    fn no_accepted_dispatches_means_no_average() {
        let summary = summarize(&[base_call()]);
        assert_eq!(summary.avg_response_time_seconds, None);
    }
}
