use super::models::{EventRecord, NewEvent, TimeRange};
use super::CalendarProvider;
use crate::error::AgentResult;
use async_trait::async_trait;
use tracing::info;

/// Link returned for every event created in mock mode
pub const MOCK_EVENT_URL: &str = "https://calendar.google.com/mock/event";
pub const MOCK_EVENT_ID: &str = "mock-event";

/// Canned calendar used when no Google token is configured
#[derive(Debug, Clone, Default)]
pub struct MockCalendar;

impl MockCalendar {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CalendarProvider for MockCalendar {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_event(&self, event: &NewEvent) -> AgentResult<EventRecord> {
        info!(
            "[mock] Creating event '{}' from {} to {}",
            event.title, event.start, event.end
        );
        Ok(EventRecord {
            id: MOCK_EVENT_ID.to_string(),
            title: event.title.clone(),
            url: MOCK_EVENT_URL.to_string(),
            start_date: event.start,
            end_date: event.end,
        })
    }

    async fn list_events(&self, range: &TimeRange) -> AgentResult<Vec<EventRecord>> {
        info!("[mock] Retrieving events between {} and {}", range.start, range.end);
        // Fixture events span the queried window, so they always fall inside it
        let fixture = [("mock-1", "Mock Meeting with Team"), ("mock-2", "Demo Call")];
        Ok(fixture
            .iter()
            .map(|(id, title)| EventRecord {
                id: id.to_string(),
                title: title.to_string(),
                url: MOCK_EVENT_URL.to_string(),
                start_date: range.start,
                end_date: range.end,
            })
            .collect())
    }
}
