use super::models::{Command, Intent};
use crate::error::{malformed_output_error, AgentResult};
use serde::Deserialize;
use serde_json::from_str;
use tracing::{debug, error};

/// Shape the model is asked to return; both field spellings are accepted,
/// and a reply may carry both
#[derive(Debug, Deserialize)]
struct RawCommand {
    intent: Option<String>,
    action: Option<String>,
    title: Option<String>,
    event_title: Option<String>,
    description: Option<String>,
    event_description: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
}

/// Parse the model reply into a command
pub fn parse_command(response: &str) -> AgentResult<Command> {
    let raw = parse_raw(response)?;

    let intent = non_empty(raw.intent)
        .or(non_empty(raw.action))
        .ok_or_else(|| malformed_output_error("reply has no 'intent' field"))?
        .parse::<Intent>()?;

    Ok(Command {
        intent,
        title: non_empty(raw.title).or(non_empty(raw.event_title)),
        description: non_empty(raw.description).or(non_empty(raw.event_description)),
        start_date: non_empty(raw.start_date),
        end_date: non_empty(raw.end_date),
    })
}

fn parse_raw(response: &str) -> AgentResult<RawCommand> {
    // Clean JSON first
    if let Ok(raw) = from_str::<RawCommand>(response.trim()) {
        return Ok(raw);
    }

    // Otherwise look for an object wrapped in prose or code fences
    let Some(json_str) = extract_json_object(response) else {
        error!("Could not extract valid JSON from response: {}", response);
        return Err(malformed_output_error("reply did not contain a JSON object"));
    };

    from_str::<RawCommand>(json_str).map_err(|e| {
        error!("Failed to parse JSON from response: {}", e);
        debug!("JSON string: {}", json_str);
        malformed_output_error(&format!("invalid command object: {}", e))
    })
}

/// Slice from the first `{` to the last `}`, if any
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if start < end {
        Some(&text[start..=end])
    } else {
        None
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_parse_clean_json() {
        let command = parse_command(
            r#"{"intent":"create","title":"Dentist","description":"","start_date":"2025-03-01T09:00:00","end_date":null}"#,
        )
        .unwrap();
        assert_eq!(command.intent, Intent::Create);
        assert_eq!(command.title.as_deref(), Some("Dentist"));
        assert_eq!(command.description, None);
        assert_eq!(command.start_date.as_deref(), Some("2025-03-01T09:00:00"));
        assert_eq!(command.end_date, None);
    }

    #[test]
    fn test_parse_legacy_field_names() {
        let command = parse_command(
            r#"{"action":"get","start_date":"2025-03-01","end_date":"2025-03-08"}"#,
        )
        .unwrap();
        assert_eq!(command.intent, Intent::Fetch);
        assert_eq!(command.end_date.as_deref(), Some("2025-03-08"));

        let command =
            parse_command(r#"{"action":"create","event_title":"Standup","event_description":"Daily"}"#)
                .unwrap();
        assert_eq!(command.title.as_deref(), Some("Standup"));
        assert_eq!(command.description.as_deref(), Some("Daily"));
    }

    #[test]
    fn test_parse_both_field_spellings() {
        let command = parse_command(
            r#"{"intent":"create","action":"create","title":"X","event_title":"Y","start_date":"2025-03-01T09:00:00"}"#,
        )
        .unwrap();
        assert_eq!(command.intent, Intent::Create);
        assert_eq!(command.title.as_deref(), Some("X"));

        let command = parse_command(r#"{"intent":"","action":"list","title":"","event_title":"Y"}"#)
            .unwrap();
        assert_eq!(command.intent, Intent::Fetch);
        assert_eq!(command.title.as_deref(), Some("Y"));
    }

    #[test]
    fn test_parse_reports_field_errors() {
        match parse_command(r#"Here: {"intent": "create", "title": 42}"#) {
            Err(Error::MalformedModelOutput(message)) => {
                assert!(message.starts_with("invalid command object:"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_fenced_json() {
        let reply = "Sure! Here it is:\n```json\n{\"intent\": \"get\", \"start_date\": \"2025-03-01\"}\n```";
        let command = parse_command(reply).unwrap();
        assert_eq!(command.intent, Intent::Fetch);
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(
            parse_command("I cannot help with that."),
            Err(Error::MalformedModelOutput(_))
        ));
        assert!(matches!(
            parse_command(r#"{"title":"No intent here"}"#),
            Err(Error::MalformedModelOutput(_))
        ));
        assert!(matches!(
            parse_command(r#"{"intent":"delete"}"#),
            Err(Error::UnrecognizedIntent(_))
        ));
    }

    #[test]
    fn test_extract_json_object() {
        assert_eq!(extract_json_object("x {\"a\":1} y"), Some("{\"a\":1}"));
        assert_eq!(extract_json_object("} nothing {"), None);
        assert_eq!(extract_json_object("plain text"), None);
    }
}
