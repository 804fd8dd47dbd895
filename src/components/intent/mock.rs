use super::models::{Command, Intent};
use super::IntentExtractor;
use crate::error::{invalid_fields_error, AgentResult};
use crate::utils::time::localize;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use tracing::info;

/// Title used when nothing usable is left after stripping the utterance
pub const FALLBACK_TITLE: &str = "Team Meeting";
pub const MOCK_DESCRIPTION: &str = "Discuss ongoing projects";

const LEADING_WORDS: &[&str] = &[
    "create", "add", "schedule", "book", "set", "plan", "make", "put", "up", "a", "an", "new",
    "please",
];

const TIME_WORDS: &[&str] = &[
    "tomorrow", "today", "tonight", "at", "on", "next", "this", "from", "monday", "tuesday",
    "wednesday", "thursday", "friday", "saturday", "sunday",
];

/// Keyword stand-in for the language model, used when no API key is configured
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    timezone: Tz,
    reference: Option<DateTime<Utc>>,
}

impl KeywordExtractor {
    pub fn new(timezone: Tz) -> Self {
        Self {
            timezone,
            reference: None,
        }
    }

    /// Pin "now" so generated dates are reproducible
    pub fn with_reference_time(mut self, now: DateTime<Utc>) -> Self {
        self.reference = Some(now);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.reference.unwrap_or_else(Utc::now)
    }

    fn create_command(&self, utterance: &str) -> AgentResult<Command> {
        let tomorrow = self.now().with_timezone(&self.timezone).date_naive() + Duration::days(1);
        let start = tomorrow
            .and_hms_opt(10, 0, 0)
            .ok_or_else(|| invalid_fields_error("Failed to create datetime"))?;
        let start = localize(&start, &self.timezone)?;
        let end = start + Duration::hours(1);

        Ok(Command {
            intent: Intent::Create,
            title: Some(derive_title(utterance)),
            description: Some(MOCK_DESCRIPTION.to_string()),
            start_date: Some(start.to_rfc3339()),
            end_date: Some(end.to_rfc3339()),
        })
    }

    fn fetch_command(&self, utterance: &str) -> Command {
        let start = self.now().with_timezone(&self.timezone).fixed_offset();
        let days = if utterance.to_lowercase().contains("week") { 7 } else { 1 };
        let end = start + Duration::days(days);

        Command {
            start_date: Some(start.to_rfc3339()),
            end_date: Some(end.to_rfc3339()),
            ..Command::new(Intent::Fetch)
        }
    }
}

#[async_trait]
impl IntentExtractor for KeywordExtractor {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn extract(&self, utterance: &str) -> AgentResult<Command> {
        info!("[mock] Interpreting message by keyword");
        match classify(utterance) {
            Intent::Fetch => Ok(self.fetch_command(utterance)),
            Intent::Create => self.create_command(utterance),
        }
    }
}

/// "show" or "list" anywhere in the text means fetch, anything else means create
pub fn classify(utterance: &str) -> Intent {
    let lower = utterance.to_lowercase();
    if lower.contains("show") || lower.contains("list") {
        Intent::Fetch
    } else {
        Intent::Create
    }
}

/// Strip the leading verb and the trailing time phrase from a create request
pub fn derive_title(utterance: &str) -> String {
    let clean = |word: &str| {
        word.trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase()
    };

    let words: Vec<&str> = utterance
        .split_whitespace()
        .skip_while(|w| LEADING_WORDS.contains(&clean(*w).as_str()))
        .take_while(|w| {
            let word = clean(*w);
            !TIME_WORDS.contains(&word.as_str())
                && !word.starts_with(|c: char| c.is_ascii_digit())
        })
        .collect();

    let title = words
        .join(" ")
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_string();

    let mut chars = title.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => FALLBACK_TITLE.to_string(),
    }
}
