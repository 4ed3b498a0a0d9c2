pub struct NotificationTemplates;

impl NotificationTemplates {
    /// Page sent to the on-call technician for an emergency dispatch.
    pub fn emergency_alert_sms(
        customer_name: &str,
        customer_phone: &str,
        customer_address: &str,
        issue: &str,
    ) -> String {
        format!(
            "🚨 EMERGENCY CALL - {}\n\n\
             Issue: {}\n\
             Phone: {}\n\
             Address: {}\n\n\
             Reply ACCEPT to take this call or REJECT if unavailable.",
            customer_name, issue, customer_phone, customer_address
        )
    }

    /// Page sent to the on-call technician for a standard service request.
    pub fn standard_alert_sms(
        customer_name: &str,
        customer_phone: &str,
        customer_address: &str,
        issue: &str,
    ) -> String {
        format!(
            "📋 SERVICE REQUEST - {}\n\n\
             Issue: {}\n\
             Phone: {}\n\
             Address: {}\n\n\
             Reply ACCEPT to schedule this call.",
            customer_name, issue, customer_phone, customer_address
        )
    }

    /// Escalation sent to the business owner when a page goes unanswered
    /// or no technician was available to page.
    pub fn owner_escalation_sms(
        customer_name: &str,
        customer_phone: &str,
        customer_address: &str,
        issue: &str,
        reason: &str,
    ) -> String {
        format!(
            "⚠️ ESCALATED EMERGENCY - {}\n\n\
             Reason: {}\n\n\
             Issue: {}\n\
             Phone: {}\n\
             Address: {}\n\n\
             IMMEDIATE ATTENTION REQUIRED",
            customer_name, reason, issue, customer_phone, customer_address
        )
    }

    /// Confirmation sent back to the customer once a dispatch is underway.
    pub fn customer_confirmation_sms(technician_name: &str, is_emergency: bool) -> String {
        if is_emergency {
            format!(
                "Your emergency service request has been received. {} will contact you \
                 within the next few minutes.\n\nStay safe and thank you for your patience.",
                technician_name
            )
        } else {
            "Your service request has been received. We'll contact you first thing in the \
             morning to schedule your appointment.\n\nThank you for choosing us!"
                .to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emergency_page_carries_customer_details_and_reply_instructions() {
        let msg = NotificationTemplates::emergency_alert_sms(
            "Jane Doe",
            "+12125550100",
            "12 Elm St",
            "gas smell in basement",
        );
        assert!(msg.contains("EMERGENCY"));
        assert!(msg.contains("Jane Doe"));
        assert!(msg.contains("+12125550100"));
        assert!(msg.contains("12 Elm St"));
        assert!(msg.contains("gas smell in basement"));
        assert!(msg.contains("ACCEPT"));
    }

    #[test]
    fn standard_page_uses_different_framing() {
        let msg = NotificationTemplates::standard_alert_sms(
            "Jane Doe",
            "+12125550100",
            "12 Elm St",
            "annual maintenance",
        );
        assert!(msg.contains("SERVICE REQUEST"));
        assert!(!msg.contains("EMERGENCY"));
    }

    #[test]
    fn escalation_carries_reason() {
        let msg = NotificationTemplates::owner_escalation_sms(
            "Jane Doe",
            "+12125550100",
            "12 Elm St",
            "no heat",
            "Technician did not respond within 5 minutes",
        );
        assert!(msg.contains("ESCALATED"));
        assert!(msg.contains("Technician did not respond within 5 minutes"));
    }

    #[test]
    fn customer_confirmation_distinguishes_priority() {
        let emergency = NotificationTemplates::customer_confirmation_sms("Mike", true);
        assert!(emergency.contains("Mike"));
        assert!(emergency.contains("emergency"));

        let standard = NotificationTemplates::customer_confirmation_sms("Mike", false);
        assert!(standard.contains("morning"));
    }
}
