pub mod templates;
pub mod twilio;

pub use templates::NotificationTemplates;
pub use twilio::SmsNotifier;
