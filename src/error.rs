use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the agent
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("{0}")]
    #[diagnostic(
        code(calendar_agent::usage),
        help("pass the request as free text, e.g. calendar-agent \"Show me my meetings for next week\"")
    )]
    Usage(String),

    #[error("Could not understand the language model reply: {0}")]
    #[diagnostic(code(calendar_agent::malformed_model_output))]
    MalformedModelOutput(String),

    #[error("Unrecognized intent '{0}': expected 'create' or 'get'")]
    #[diagnostic(code(calendar_agent::unrecognized_intent))]
    UnrecognizedIntent(String),

    #[error("Invalid event fields: {0}")]
    #[diagnostic(code(calendar_agent::invalid_event_fields))]
    InvalidEventFields(String),

    #[error("Google Calendar API error{}: {message}", .status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    #[diagnostic(code(calendar_agent::provider))]
    Provider {
        status: Option<u16>,
        message: String,
    },

    #[error("Language model API error: {0}")]
    #[diagnostic(code(calendar_agent::language_model))]
    LanguageModel(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(calendar_agent::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(calendar_agent::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(calendar_agent::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(calendar_agent::serialization))]
    Serialization(String),
}

impl Error {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Usage(_) => 2,
            _ => 1,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AgentResult<T> = Result<T, Error>;

/// Helper to create usage errors
pub fn usage_error(message: &str) -> Error {
    Error::Usage(message.to_string())
}

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Invalid environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create malformed model output errors
pub fn malformed_output_error(message: &str) -> Error {
    Error::MalformedModelOutput(message.to_string())
}

/// Helper to create invalid event field errors
pub fn invalid_fields_error(message: &str) -> Error {
    Error::InvalidEventFields(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn provider_error(status: Option<u16>, message: &str) -> Error {
    Error::Provider {
        status,
        message: message.to_string(),
    }
}

/// Helper to create language model errors
pub fn language_model_error(message: &str) -> Error {
    Error::LanguageModel(message.to_string())
}
