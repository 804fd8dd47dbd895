use crate::components::intent::Command;
use crate::error::{invalid_fields_error, AgentResult};
use crate::utils::time::resolve_timestamp;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use chrono_tz::Tz;
use serde_json::Value;

/// Title given to events created without one
pub const UNTITLED_EVENT: &str = "Untitled Event";

/// Event as shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub id: String,
    pub title: String,
    pub url: String,
    pub start_date: DateTime<FixedOffset>,
    pub end_date: DateTime<FixedOffset>,
}

/// Validated fields for an event about to be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl NewEvent {
    /// Resolve a create command into concrete event fields
    pub fn from_command(command: &Command, tz: &Tz, default_minutes: i64) -> AgentResult<Self> {
        let title = command
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED_EVENT)
            .to_string();

        let start = command
            .start_date
            .as_deref()
            .ok_or_else(|| invalid_fields_error("no start time was given"))?;
        let start = resolve_timestamp(start, tz)?;

        let end = match command.end_date.as_deref() {
            Some(end) => resolve_timestamp(end, tz)?,
            None => start + Duration::minutes(default_minutes),
        };

        if end <= start {
            return Err(invalid_fields_error("the event ends before it starts"));
        }

        Ok(Self {
            title,
            description: command.description.clone(),
            start,
            end,
        })
    }
}

/// Half-open `[start, end)` window for listing events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeRange {
    /// Resolve a fetch command; start defaults to `now`, end to one day after start
    pub fn from_command(command: &Command, now: DateTime<Utc>, tz: &Tz) -> AgentResult<Self> {
        let start = match command.start_date.as_deref() {
            Some(start) => resolve_timestamp(start, tz)?,
            None => now.with_timezone(tz).fixed_offset(),
        };

        let end = match command.end_date.as_deref() {
            Some(end) => resolve_timestamp(end, tz)?,
            None => start + Duration::days(1),
        };

        if end <= start {
            return Err(invalid_fields_error("the search range ends before it starts"));
        }

        Ok(Self { start, end })
    }

    pub fn contains(&self, instant: &DateTime<FixedOffset>) -> bool {
        *instant >= self.start && *instant < self.end
    }
}

/// Event as returned by the Google Calendar API
#[derive(Debug, Clone, Default)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: Option<String>,
    pub html_link: Option<String>,
    pub start_date_time: Option<String>,
    pub start_date: Option<String>,
    pub end_date_time: Option<String>,
    pub end_date: Option<String>,
}

impl CalendarEvent {
    /// Pick the fields we use out of an API event resource
    pub fn from_json(event: &Value) -> Self {
        let text = |v: Option<&Value>| v.and_then(|s| s.as_str()).map(|s| s.to_string());
        let nested = |outer: &str, inner: &str| {
            event
                .get(outer)
                .and_then(|o| o.as_object())
                .and_then(|o| o.get(inner))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        };

        CalendarEvent {
            id: text(event.get("id")).unwrap_or_default(),
            summary: text(event.get("summary")),
            html_link: text(event.get("htmlLink")),
            start_date_time: nested("start", "dateTime"),
            start_date: nested("start", "date"),
            end_date_time: nested("end", "dateTime"),
            end_date: nested("end", "date"),
        }
    }

    /// Convert to a record; all-day events start and end at local midnight
    pub fn into_record(self, tz: &Tz) -> AgentResult<EventRecord> {
        let start = self
            .start_date_time
            .as_deref()
            .or(self.start_date.as_deref())
            .ok_or_else(|| invalid_fields_error("event has no start"))?;
        let start = resolve_timestamp(start, tz)?;

        let end = match self.end_date_time.as_deref().or(self.end_date.as_deref()) {
            Some(end) => resolve_timestamp(end, tz)?,
            None => start,
        };

        Ok(EventRecord {
            id: self.id,
            title: self.summary.unwrap_or_else(|| "Untitled".to_string()),
            url: self.html_link.unwrap_or_default(),
            start_date: start,
            end_date: end,
        })
    }
}
