pub mod business;
pub mod calls;
pub mod reports;
pub mod sms;
pub mod technician;
pub mod tools;
pub mod webhook;

use uuid::Uuid;

/// Demo deployments attach inbound calls to a single configured business.
pub fn default_business_id() -> Uuid {
    std::env::var("DEMO_BUSINESS_ID")
        .ok()
        .and_then(|v| Uuid::parse_str(&v).ok())
        .unwrap_or_else(|| Uuid::from_u128(1))
}
