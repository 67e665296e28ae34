//! Status lookup tables from new API values to legacy ones

/// New event status to the legacy label; unmapped values pass verbatim
pub fn event_status(raw: &str) -> String {
    let mapped = match raw.trim().to_ascii_lowercase().as_str() {
        "active" => "Ongoing",
        "draft" | "upcoming" => "Upcoming",
        "completed" => "Completed",
        "cancelled" => "Cancelled",
        "archived" => "Closed",
        _ => return raw.to_string(),
    };

    mapped.to_string()
}

/// New post status to the legacy moderation state
pub fn post_status(raw: &str) -> String {
    let mapped = match raw.trim().to_ascii_lowercase().as_str() {
        "published" => "approved",
        "pending" => "pending",
        "rejected" => "rejected",
        "draft" => "draft",
        _ => return raw.to_string(),
    };

    mapped.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_table() {
        assert_eq!(event_status("active"), "Ongoing");
        assert_eq!(event_status("draft"), "Upcoming");
        assert_eq!(event_status("upcoming"), "Upcoming");
        assert_eq!(event_status("completed"), "Completed");
        assert_eq!(event_status("cancelled"), "Cancelled");
        assert_eq!(event_status("archived"), "Closed");
        assert_eq!(event_status("ACTIVE"), "Ongoing");
    }

    #[test]
    fn test_unmapped_passes_verbatim() {
        assert_eq!(event_status("Ongoing"), "Ongoing");
        assert_eq!(event_status("postponed"), "postponed");
        assert_eq!(event_status(""), "");
        assert_eq!(post_status("flagged"), "flagged");
    }

    #[test]
    fn test_post_table() {
        assert_eq!(post_status("published"), "approved");
        assert_eq!(post_status("pending"), "pending");
        assert_eq!(post_status("rejected"), "rejected");
        assert_eq!(post_status("draft"), "draft");
    }
}
