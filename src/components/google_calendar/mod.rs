mod client;
mod mock;
pub mod models;

pub use client::{events_url, GoogleCalendarClient};
pub use mock::{MockCalendar, MOCK_EVENT_ID, MOCK_EVENT_URL};
pub use models::{CalendarEvent, EventRecord, NewEvent, TimeRange};

use crate::config::{Config, Mode};
use crate::error::AgentResult;
use async_trait::async_trait;
use tracing::info;

/// Calendar operations the agent needs
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Short name for logging
    fn name(&self) -> &'static str;

    /// Create one event
    async fn create_event(&self, event: &NewEvent) -> AgentResult<EventRecord>;

    /// Events whose start lies within the range, ordered by start time
    async fn list_events(&self, range: &TimeRange) -> AgentResult<Vec<EventRecord>>;
}

/// Pick the live or mock calendar based on configured credentials
pub fn provider_for(config: &Config) -> AgentResult<Box<dyn CalendarProvider>> {
    let provider: Box<dyn CalendarProvider> = match config.calendar_mode() {
        Mode::Live => Box::new(GoogleCalendarClient::new(config)?),
        Mode::Mock => Box::new(MockCalendar::new()),
    };
    info!("Using {} calendar provider", provider.name());
    Ok(provider)
}
