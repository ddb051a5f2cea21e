use chrono::{DateTime, NaiveDate};

/// Formats an RFC 3339 timestamp or a bare `YYYY-MM-DD` date for display,
/// e.g. `"2024-03-05T10:00:00Z"` → `"March 5, 2024"`.
///
/// Returns `None` when the input is neither.
pub fn format_date(input: &str) -> Option<String> {
    let input = input.trim();
    let date = DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(input, "%Y-%m-%d"))
        .ok()?;
    Some(date.format("%B %-d, %Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc3339_timestamp() {
        assert_eq!(
            format_date("2024-03-05T10:00:00Z").as_deref(),
            Some("March 5, 2024")
        );
    }

    #[test]
    fn test_offset_keeps_local_date() {
        assert_eq!(
            format_date("2023-12-31T23:30:00-05:00").as_deref(),
            Some("December 31, 2023")
        );
    }

    #[test]
    fn test_plain_date() {
        assert_eq!(format_date("2022-07-14").as_deref(), Some("July 14, 2022"));
    }

    #[test]
    fn test_garbage_is_none() {
        assert_eq!(format_date("yesterday"), None);
        assert_eq!(format_date(""), None);
    }
}
