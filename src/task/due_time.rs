//! Conversion between client wall-clock times and stored UTC instants.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

/// Asia/Kolkata (+05:30). The zone observes no daylight saving, so a fixed
/// offset renders it exactly.
pub const DEFAULT_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Display format for list responses, e.g. `2024-03-10 09:30:00 +05:30`.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

pub fn default_offset() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Parses a client-supplied due time.
///
/// Timestamps carrying their own offset (RFC 3339) keep it. Anything else is a
/// wall-clock reading in `offset`. A bare date means midnight.
pub fn parse_due_at(raw: &str, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn format_in_offset(ts: DateTime<Utc>, offset: FixedOffset) -> String {
    ts.with_timezone(&offset).format(DISPLAY_FORMAT).to_string()
}

/// Parses `+05:30`, `-0800`, `Z` or `UTC`.
pub fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_wall_clock_uses_reference_offset() {
        let parsed = parse_due_at("2024-03-10T09:30", default_offset()).unwrap();
        assert_eq!(parsed, utc("2024-03-10T04:00:00Z"));

        let parsed = parse_due_at("2024-03-10 09:30:15", default_offset()).unwrap();
        assert_eq!(parsed, utc("2024-03-10T04:00:15Z"));
    }

    #[test]
    fn test_explicit_offset_is_kept() {
        let parsed = parse_due_at("2024-03-10T09:30:00.000Z", default_offset()).unwrap();
        assert_eq!(parsed, utc("2024-03-10T09:30:00Z"));

        let parsed = parse_due_at("2024-03-10T09:30:00-05:00", default_offset()).unwrap();
        assert_eq!(parsed, utc("2024-03-10T14:30:00Z"));
    }

    #[test]
    fn test_date_only_is_midnight() {
        let parsed = parse_due_at("2024-03-10", default_offset()).unwrap();
        assert_eq!(parsed, utc("2024-03-09T18:30:00Z"));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_due_at("", default_offset()).is_none());
        assert!(parse_due_at("tomorrow", default_offset()).is_none());
        assert!(parse_due_at("2024-13-40T25:00", default_offset()).is_none());
    }

    #[test]
    fn test_format_in_offset() {
        let ts = utc("2024-03-10T04:00:00Z");
        assert_eq!(format_in_offset(ts, default_offset()), "2024-03-10 09:30:00 +05:30");
    }

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(parse_utc_offset("+05:30"), Some(default_offset()));
        assert_eq!(parse_utc_offset("+0530"), Some(default_offset()));
        assert_eq!(parse_utc_offset("-08:00").unwrap().local_minus_utc(), -8 * 3600);
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset(" utc ").unwrap().local_minus_utc(), 0);
        assert!(parse_utc_offset("05:30").is_none());
        assert!(parse_utc_offset("Asia/Kolkata").is_none());
    }
}
