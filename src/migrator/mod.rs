use sea_orm_migration::prelude::*;

mod m20260801_000001_create_businesses;
mod m20260801_000002_create_technicians;
mod m20260801_000003_create_calls;
mod m20260801_000004_create_notifications;
mod m20260801_000005_create_daily_reports;
mod m20260801_000006_seed_demo_business;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_create_businesses::Migration),
            Box::new(m20260801_000002_create_technicians::Migration),
            Box::new(m20260801_000003_create_calls::Migration),
            Box::new(m20260801_000004_create_notifications::Migration),
            Box::new(m20260801_000005_create_daily_reports::Migration),
            Box::new(m20260801_000006_seed_demo_business::Migration),
        ]
    }
}
