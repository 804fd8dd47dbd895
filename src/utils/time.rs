use crate::error::{invalid_fields_error, AgentResult};
use chrono::{DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// Naive date-time layouts accepted from the language model, interpreted in the configured zone
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Resolve a timestamp string to an offset-aware date-time
///
/// Accepts RFC 3339, naive date-times (taken as local time in `tz`) and bare
/// dates (local midnight).
pub fn resolve_timestamp(text: &str, tz: &Tz) -> AgentResult<DateTime<FixedOffset>> {
    let text = text.trim();
    if text.is_empty() {
        return Err(invalid_fields_error("empty timestamp"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt);
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return localize(&naive, tz);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| invalid_fields_error("Failed to create datetime"))?;
        return localize(&midnight, tz);
    }

    Err(invalid_fields_error(&format!(
        "could not resolve '{}' to a timestamp",
        text
    )))
}

/// Attach a zone to a naive local time
pub fn localize(naive: &NaiveDateTime, tz: &Tz) -> AgentResult<DateTime<FixedOffset>> {
    match tz.from_local_datetime(naive) {
        LocalResult::Single(dt) => Ok(dt.fixed_offset()),
        // Repeated hour at a DST change, take the first occurrence
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.fixed_offset()),
        LocalResult::None => Err(invalid_fields_error(&format!(
            "{} does not exist in {}",
            naive, tz
        ))),
    }
}

/// Human-readable start time for event listings
pub fn format_event_time(dt: &DateTime<FixedOffset>, tz: &Tz) -> String {
    dt.with_timezone(tz).format("%a %d %b %Y %H:%M").to_string()
}
