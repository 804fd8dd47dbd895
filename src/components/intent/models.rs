use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// What the user wants done with their calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Create,
    Fetch,
}

impl FromStr for Intent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "create" | "add" => Ok(Intent::Create),
            "get" | "fetch" | "list" | "retrieve" => Ok(Intent::Fetch),
            other => Err(Error::UnrecognizedIntent(other.to_string())),
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Create => write!(f, "create"),
            Intent::Fetch => write!(f, "fetch"),
        }
    }
}

/// Structured request extracted from one utterance
///
/// Dates stay as the text the extractor produced and are resolved to
/// timestamps when the calendar call is prepared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub intent: Intent,
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl Command {
    /// A command with only the intent set
    pub fn new(intent: Intent) -> Self {
        Self {
            intent,
            title: None,
            description: None,
            start_date: None,
            end_date: None,
        }
    }
}
