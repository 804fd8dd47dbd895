use crate::error::{config_error, env_error, AgentResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Time zone used when none is configured
pub const DEFAULT_TIMEZONE: &str = "Europe/Paris";
/// Default chat completion model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CALENDAR_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";
pub const DEFAULT_CALENDAR_ID: &str = "primary";
/// Optional settings file, overridable with AGENT_CONFIG_FILE
pub const DEFAULT_CONFIG_FILE: &str = "config/agent.toml";

/// Whether a dependency talks to the real API or returns canned data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Live,
    Mock,
}

/// Tunables read from the optional TOML settings file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub model: String,
    pub temperature: f32,
    pub default_event_minutes: i64,
    pub request_timeout_secs: u64,
    pub timezone: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.2,
            default_event_minutes: 60,
            request_timeout_secs: 30,
            timezone: None,
        }
    }
}

impl Settings {
    /// Read settings from a TOML file, falling back to defaults when it does not exist
    pub fn from_file(path: impl AsRef<Path>) -> AgentResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        debug!("Reading settings from {}", path.display());
        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }
}

/// Process-wide configuration, loaded once and passed into each component
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenAI API key; absent means the language model runs in mock mode
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub temperature: f32,
    /// Google OAuth bearer token; absent means the calendar runs in mock mode
    pub google_api_token: Option<String>,
    pub calendar_id: String,
    pub calendar_base_url: String,
    /// Zone used to interpret naive timestamps and to label created events
    pub timezone: Tz,
    /// Event length used when no end time was given
    pub default_event_minutes: i64,
    pub request_timeout_secs: u64,
    /// Force mock mode for both dependencies regardless of credentials
    pub force_mock: bool,
}

impl Config {
    /// Load configuration from `.env`, the process environment and the settings file
    pub fn load() -> AgentResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let settings_path = match env::var("AGENT_CONFIG_FILE") {
            Ok(path) => path,
            Err(env::VarError::NotPresent) => DEFAULT_CONFIG_FILE.to_string(),
            Err(env::VarError::NotUnicode(_)) => return Err(env_error("AGENT_CONFIG_FILE")),
        };
        let settings = Settings::from_file(&settings_path)?;

        Self::from_lookup(settings, |key| env::var(key).ok())
    }

    /// Build configuration from settings plus a key lookup (environment beats settings)
    pub fn from_lookup<F>(settings: Settings, lookup: F) -> AgentResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let timezone_name = non_blank("TIMEZONE")
            .or(settings.timezone.clone())
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let timezone = parse_timezone(&timezone_name)?;

        if settings.default_event_minutes <= 0 {
            return Err(config_error("default_event_minutes must be positive"));
        }

        Ok(Config {
            openai_api_key: non_blank("OPENAI_API_KEY"),
            openai_model: non_blank("OPENAI_MODEL").unwrap_or(settings.model),
            openai_base_url: non_blank("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            temperature: settings.temperature,
            google_api_token: non_blank("GOOGLE_API_TOKEN"),
            calendar_id: non_blank("CALENDAR_ID").unwrap_or_else(|| DEFAULT_CALENDAR_ID.to_string()),
            calendar_base_url: non_blank("GOOGLE_CALENDAR_BASE_URL")
                .unwrap_or_else(|| DEFAULT_CALENDAR_BASE_URL.to_string()),
            timezone,
            default_event_minutes: settings.default_event_minutes,
            request_timeout_secs: settings.request_timeout_secs,
            force_mock: false,
        })
    }

    /// Configuration with no credentials at all, so both dependencies are mocked
    pub fn mock() -> Self {
        let settings = Settings::default();
        Config {
            openai_api_key: None,
            openai_model: settings.model,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            temperature: settings.temperature,
            google_api_token: None,
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            calendar_base_url: DEFAULT_CALENDAR_BASE_URL.to_string(),
            timezone: chrono_tz::Europe::Paris,
            default_event_minutes: settings.default_event_minutes,
            request_timeout_secs: settings.request_timeout_secs,
            force_mock: false,
        }
    }

    /// Override the configured time zone by name
    pub fn with_timezone(mut self, name: &str) -> AgentResult<Self> {
        self.timezone = parse_timezone(name)?;
        Ok(self)
    }

    /// Mode for the language model dependency
    pub fn language_model_mode(&self) -> Mode {
        if self.force_mock || self.openai_api_key.is_none() {
            Mode::Mock
        } else {
            Mode::Live
        }
    }

    /// Mode for the calendar dependency
    pub fn calendar_mode(&self) -> Mode {
        if self.force_mock || self.google_api_token.is_none() {
            Mode::Mock
        } else {
            Mode::Live
        }
    }
}

/// Parse an IANA time zone name such as `Europe/Helsinki`
pub fn parse_timezone(name: &str) -> AgentResult<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| config_error(&format!("Unknown time zone: {}", name)))
}
