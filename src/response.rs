//! Parsing of inbound technician SMS replies.

/// Technician verdict on a dispatch page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TechResponse {
    Accept,
    Reject,
    Unknown,
}

/// Interpret a raw SMS body as accept/reject/unknown.
///
/// Accept wins when both signals are present. "no" is a plain substring
/// test, so "no problem" reads as a rejection; the dispatcher's follow-up
/// SMS tells technicians to reply with a single word.
pub fn parse_technician_response(body: &str) -> TechResponse {
    let lower = body.to_lowercase();
    let lower = lower.trim();

    if lower.contains("accept") || lower.contains("yes") {
        TechResponse::Accept
    } else if lower.contains("reject") || lower.contains("no") || lower.contains("decline") {
        TechResponse::Reject
    } else {
        TechResponse::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_variants() {
        assert_eq!(parse_technician_response("ACCEPT please"), TechResponse::Accept);
        assert_eq!(parse_technician_response("  yes  "), TechResponse::Accept);
        assert_eq!(parse_technician_response("Yes, on my way"), TechResponse::Accept);
    }

    #[test]
    fn reject_variants() {
        assert_eq!(parse_technician_response("reject"), TechResponse::Reject);
        assert_eq!(parse_technician_response("no thanks"), TechResponse::Reject);
        assert_eq!(parse_technician_response("I must DECLINE"), TechResponse::Reject);
    }

    #[test]
    fn accept_beats_reject_when_both_present() {
        // "yes" is checked before "no".
        assert_eq!(parse_technician_response("yes, no problem"), TechResponse::Accept);
    }

    #[test]
    fn naive_no_substring_matches() {
        // Documented heuristic: "no rush" still parses as a rejection.
        assert_eq!(parse_technician_response("no rush"), TechResponse::Reject);
    }

    #[test]
    fn anything_else_is_unknown() {
        assert_eq!(parse_technician_response("call me back"), TechResponse::Unknown);
        assert_eq!(parse_technician_response(""), TechResponse::Unknown);
    }
}
