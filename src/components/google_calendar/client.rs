use super::models::{CalendarEvent, EventRecord, NewEvent, TimeRange};
use super::CalendarProvider;
use crate::config::Config;
use crate::error::{config_error, provider_error, AgentResult, Error};
use async_trait::async_trait;
use chrono::SecondsFormat;
use chrono_tz::Tz;
use reqwest::{Client, Response};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Talks to the Google Calendar v3 REST API with a bearer token
pub struct GoogleCalendarClient {
    client: Client,
    token: String,
    events_url: Url,
    timezone: Tz,
}

impl GoogleCalendarClient {
    /// Create a live client; fails when no token is configured
    pub fn new(config: &Config) -> AgentResult<Self> {
        let token = config
            .google_api_token
            .clone()
            .ok_or_else(|| config_error("GOOGLE_API_TOKEN is not set"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| provider_error(None, &format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            token,
            events_url: events_url(&config.calendar_base_url, &config.calendar_id)?,
            timezone: config.timezone,
        })
    }
}

/// `{base}/calendars/{calendar_id}/events` with the id percent-encoded
pub fn events_url(base: &str, calendar_id: &str) -> AgentResult<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| config_error(&format!("Failed to parse URL: {}", e)))?;

    url.path_segments_mut()
        .map_err(|_| config_error(&format!("Not a base URL: {}", base)))?
        .pop_if_empty()
        .push("calendars")
        .push(calendar_id)
        .push("events");

    Ok(url)
}

/// Turn a non-success response into a provider error carrying status and a one-line reason
async fn check_status(response: Response, action: &str) -> AgentResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response".to_string());
    debug!("Error response body: {}", error_body);

    Err(provider_error(
        Some(status.as_u16()),
        &format!("Failed to {}: {}", action, error_reason(&error_body)),
    ))
}

/// `error.message` from a Google error document, else the body on one line
pub fn error_reason(body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(|m| m.to_string())
        })
        .unwrap_or_else(|| body.to_string());

    message.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn transport_error(action: &str, e: reqwest::Error) -> Error {
    provider_error(
        e.status().map(|s| s.as_u16()),
        &format!("Failed to {}: {}", action, e),
    )
}

#[async_trait]
impl CalendarProvider for GoogleCalendarClient {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn create_event(&self, event: &NewEvent) -> AgentResult<EventRecord> {
        info!("Creating event '{}' from {} to {}", event.title, event.start, event.end);

        let payload = json!({
            "summary": event.title,
            "description": event.description.clone().unwrap_or_default(),
            "start": {
                "dateTime": event.start.to_rfc3339_opts(SecondsFormat::Secs, false),
                "timeZone": self.timezone.name(),
            },
            "end": {
                "dateTime": event.end.to_rfc3339_opts(SecondsFormat::Secs, false),
                "timeZone": self.timezone.name(),
            },
        });

        let response = self
            .client
            .post(self.events_url.clone())
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| transport_error("create event", e))?;
        let response = check_status(response, "create event").await?;

        let created: Value = response
            .json()
            .await
            .map_err(|e| transport_error("parse created event", e))?;
        debug!("Created event response: {}", created);

        let created = CalendarEvent::from_json(&created);
        if created.html_link.is_none() {
            warn!("Created event {} has no htmlLink", created.id);
        }
        Ok(EventRecord {
            id: created.id,
            title: created.summary.unwrap_or_else(|| event.title.clone()),
            url: created.html_link.unwrap_or_default(),
            start_date: event.start,
            end_date: event.end,
        })
    }

    async fn list_events(&self, range: &TimeRange) -> AgentResult<Vec<EventRecord>> {
        info!("Retrieving events between {} and {}", range.start, range.end);

        let mut url = self.events_url.clone();
        url.query_pairs_mut()
            .append_pair("timeMin", &range.start.to_rfc3339_opts(SecondsFormat::Secs, false))
            .append_pair("timeMax", &range.end.to_rfc3339_opts(SecondsFormat::Secs, false))
            .append_pair("singleEvents", "true")
            .append_pair("orderBy", "startTime");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| transport_error("fetch events", e))?;
        let response = check_status(response, "fetch events").await?;

        let response_data: Value = response
            .json()
            .await
            .map_err(|e| transport_error("parse events response", e))?;

        let items = response_data
            .get("items")
            .and_then(|i| i.as_array())
            .map(|items| items.as_slice())
            .unwrap_or(&[]);

        let mut records = Vec::with_capacity(items.len());
        for item in items {
            let event = CalendarEvent::from_json(item);
            let id = event.id.clone();
            match event.into_record(&self.timezone) {
                // The API returns anything overlapping the window, keep only what starts in it
                Ok(record) if range.contains(&record.start_date) => records.push(record),
                Ok(record) => debug!("Skipping event {} starting outside the range", record.id),
                Err(e) => warn!("Skipping event {}: {}", id, e),
            }
        }

        Ok(records)
    }
}
