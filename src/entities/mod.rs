pub mod business;
pub mod call;
pub mod daily_report;
pub mod notification;
pub mod technician;

pub use business::Entity as Business;
pub use call::Entity as Call;
pub use daily_report::Entity as DailyReport;
pub use notification::Entity as Notification;
pub use technician::Entity as Technician;
