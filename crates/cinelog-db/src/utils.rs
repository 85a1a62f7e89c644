//! Shared utility functions

use chrono::{DateTime, Utc};

/// Default page size for list queries
pub const DEFAULT_PAGE_LIMIT: i64 = 100;
/// Largest page a caller may request
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Parse a datetime string (RFC3339 format) or return current time
///
/// Rows written by this crate always carry RFC3339 timestamps; the fallback
/// only matters for rows edited by hand.
pub fn parse_datetime_or_now(s: &str) -> DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Clamp caller-supplied pagination values into the accepted range
///
/// Negative offsets become zero and the limit is kept within
/// `1..=MAX_PAGE_LIMIT`.
pub fn clamp_page(offset: i64, limit: i64) -> (i64, i64) {
    (offset.max(0), limit.clamp(1, MAX_PAGE_LIMIT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, DEFAULT_PAGE_LIMIT), (0, 100));
        assert_eq!(clamp_page(-5, 10), (0, 10));
        assert_eq!(clamp_page(20, 0), (20, 1));
        assert_eq!(clamp_page(20, 50_000), (20, MAX_PAGE_LIMIT));
    }

    #[test]
    fn test_parse_datetime_or_now() {
        let valid_time = "2024-01-01T12:00:00Z";
        let parsed = parse_datetime_or_now(valid_time);
        assert_eq!(parsed.to_rfc3339(), "2024-01-01T12:00:00+00:00");

        // Invalid time should return current time (just check it doesn't panic)
        let now_before = Utc::now();
        let parsed = parse_datetime_or_now("invalid");
        let now_after = Utc::now();
        assert!(parsed >= now_before && parsed <= now_after);
    }
}
