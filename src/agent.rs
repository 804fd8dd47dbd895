use crate::components::google_calendar::{EventRecord, NewEvent, TimeRange};
use crate::components::intent::{validate_utterance, Intent};
use crate::components::{extractor_for, provider_for, CalendarProvider, IntentExtractor};
use crate::config::Config;
use crate::error::AgentResult;
use crate::utils::time::format_event_time;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::info;

pub const NO_EVENTS_MESSAGE: &str = "No events found in that range.";

/// Runs one request through extraction and the matching calendar call
pub struct Agent {
    extractor: Box<dyn IntentExtractor>,
    calendar: Box<dyn CalendarProvider>,
    timezone: Tz,
    default_event_minutes: i64,
}

impl Agent {
    /// Assemble an agent from explicit components
    pub fn new(
        extractor: Box<dyn IntentExtractor>,
        calendar: Box<dyn CalendarProvider>,
        config: &Config,
    ) -> Self {
        Self {
            extractor,
            calendar,
            timezone: config.timezone,
            default_event_minutes: config.default_event_minutes,
        }
    }

    /// Choose live or mock components from the configuration
    pub fn from_config(config: &Config) -> AgentResult<Self> {
        Ok(Self::new(extractor_for(config)?, provider_for(config)?, config))
    }

    /// Handle one request and return the reply text
    pub async fn handle(&self, utterance: &str) -> AgentResult<String> {
        self.handle_at(utterance, Utc::now()).await
    }

    /// Same as [`Agent::handle`] with an explicit "now" for defaulted ranges
    pub async fn handle_at(&self, utterance: &str, now: DateTime<Utc>) -> AgentResult<String> {
        let utterance = validate_utterance(utterance)?;
        info!("Received message: {}", utterance);

        let command = self.extractor.extract(utterance).await?;
        info!("Resolved intent: {}", command.intent);

        match command.intent {
            Intent::Create => {
                let event =
                    NewEvent::from_command(&command, &self.timezone, self.default_event_minutes)?;
                let record = self.calendar.create_event(&event).await?;
                Ok(format_created(&event.title, &record))
            }
            Intent::Fetch => {
                let range = TimeRange::from_command(&command, now, &self.timezone)?;
                let events = self.calendar.list_events(&range).await?;
                info!("Found {} events", events.len());
                Ok(format_event_list(&events, &self.timezone))
            }
        }
    }
}

/// Confirmation line for a created event; falls back to the event id without a link
pub fn format_created(title: &str, record: &EventRecord) -> String {
    if record.url.is_empty() {
        return format!("✅ Event '{}' created successfully! (id: {})", title, record.id);
    }
    format!("✅ Event '{}' created successfully! {}", title, record.url)
}

/// One line per event, or a notice when there are none
pub fn format_event_list(events: &[EventRecord], tz: &Tz) -> String {
    if events.is_empty() {
        return NO_EVENTS_MESSAGE.to_string();
    }

    let mut reply = "📅 Here are your events:".to_string();
    for event in events {
        reply.push_str(&format!(
            "\n- {} ({})",
            event.title,
            format_event_time(&event.start_date, tz)
        ));
    }
    reply
}
