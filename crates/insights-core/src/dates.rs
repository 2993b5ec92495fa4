use chrono::{DateTime, NaiveDate, NaiveDateTime};

// ── DateParser ────────────────────────────────────────────────────────────────

/// Parses campaign dates from the formats commonly found in exported CSVs.
pub struct DateParser;

impl DateParser {
    /// Date-only patterns, tried in order.
    const DATE_FORMATS: &'static [&'static str] = &[
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%d/%m/%Y",
        "%d-%m-%Y",
    ];

    /// Date-time patterns, tried in order; only the date part is kept.
    const DATETIME_FORMATS: &'static [&'static str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%d/%m/%Y %H:%M:%S",
    ];

    /// Attempt to parse `s` into a calendar date.
    ///
    /// Handles:
    /// * ISO dates (`2024-03-01`, `2024/03/01`) and day-first dates
    ///   (`01/03/2024`, `01-03-2024`);
    /// * naive date-times, whose time component is discarded;
    /// * RFC 3339 timestamps (`2024-03-01T10:00:00Z`), whose date is taken
    ///   in the timestamp's own offset.
    ///
    /// Returns `None` for empty or unrecognised input.
    pub fn parse(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        for fmt in Self::DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return Some(date);
            }
        }

        for fmt in Self::DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive.date());
            }
        }

        DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(DateParser::parse("2024-03-01"), Some(ymd(2024, 3, 1)));
        assert_eq!(DateParser::parse("2024/03/01"), Some(ymd(2024, 3, 1)));
    }

    #[test]
    fn test_parse_day_first() {
        assert_eq!(DateParser::parse("15/01/2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(DateParser::parse("15-01-2024"), Some(ymd(2024, 1, 15)));
    }

    #[test]
    fn test_parse_datetime_keeps_date() {
        assert_eq!(
            DateParser::parse("2024-03-01 23:59:59"),
            Some(ymd(2024, 3, 1))
        );
        assert_eq!(
            DateParser::parse("2024-03-01T08:30:00.250"),
            Some(ymd(2024, 3, 1))
        );
    }

    #[test]
    fn test_parse_rfc3339() {
        assert_eq!(
            DateParser::parse("2024-03-01T10:00:00Z"),
            Some(ymd(2024, 3, 1))
        );
        assert_eq!(
            DateParser::parse("2024-03-01T23:00:00-05:00"),
            Some(ymd(2024, 3, 1))
        );
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(DateParser::parse("  2024-03-01 "), Some(ymd(2024, 3, 1)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(DateParser::parse(""), None);
        assert_eq!(DateParser::parse("yesterday"), None);
        assert_eq!(DateParser::parse("2024-13-45"), None);
    }
}
