use std::env;
use tracing::{error, info, warn};

/// SMS gateway wrapper. Falls back to mock mode (log only) when Twilio
/// credentials are absent, so the rest of the pipeline keeps working in
/// local runs and tests.
#[derive(Clone)]
pub struct SmsNotifier {
    twilio_client: Option<twilio::Client>,
    sms_from: String,
}

impl SmsNotifier {
    pub fn new() -> Self {
        let account_sid = env::var("TWILIO_ACCOUNT_SID").ok();
        let auth_token = env::var("TWILIO_AUTH_TOKEN").ok();
        let sms_from = env::var("TWILIO_SMS_FROM_NUMBER").unwrap_or_default();

        let twilio_client = if let (Some(sid), Some(token)) = (account_sid, auth_token) {
            Some(twilio::Client::new(&sid, &token))
        } else {
            None
        };

        if twilio_client.is_none() {
            warn!("⚠️ Twilio credentials not found. SMS notifications will be mocked.");
        }

        Self {
            twilio_client,
            sms_from,
        }
    }

    /// Send one SMS. Failures are reported as Err but carry no panic path;
    /// callers decide whether a failed send aborts their flow.
    pub async fn send_sms(&self, to_number: &str, body: &str) -> Result<(), String> {
        if let Some(client) = &self.twilio_client {
            if self.sms_from.is_empty() {
                return Err("TWILIO_SMS_FROM_NUMBER not set".to_string());
            }

            match client
                .send_message(twilio::OutboundMessage::new(&self.sms_from, to_number, body))
                .await
            {
                Ok(_) => {
                    info!("✅ SMS sent successfully to {}", to_number);
                    crate::metrics::increment_notifications_sent("sms");
                    Ok(())
                }
                Err(e) => {
                    error!("❌ Failed to send SMS: {}", e);
                    crate::metrics::increment_notifications_failed("sms");
                    Err(format!("Twilio Error: {}", e))
                }
            }
        } else {
            // Mock mode
            info!("(Mock) 📱 Would send SMS to: {}", to_number);
            info!("(Mock) Body: {}", body);
            crate::metrics::increment_notifications_sent("sms");
            Ok(())
        }
    }
}

impl Default for SmsNotifier {
    fn default() -> Self {
        Self::new()
    }
}
