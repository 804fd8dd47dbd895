use calendar_agent::cli;
use calendar_agent::components::google_calendar::{
    CalendarProvider, MockCalendar, NewEvent, TimeRange, MOCK_EVENT_URL,
};
use calendar_agent::components::intent::{Command, Intent, IntentExtractor, KeywordExtractor};
use calendar_agent::config::Config;
use calendar_agent::error::{config_error, AgentResult};
use chrono::{TimeZone, Utc};

/// Run the CLI with the given words and collect (exit code, stdout, stderr)
async fn run_cli(words: &[&str]) -> (u8, String, String) {
    let mut args = vec!["calendar-agent"];
    args.extend_from_slice(words);

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = cli::run(args, || Ok(Config::mock()), &mut stdout, &mut stderr).await;

    (
        code,
        String::from_utf8(stdout).unwrap(),
        String::from_utf8(stderr).unwrap(),
    )
}

/// Creating an event in mock mode prints the placeholder link
#[tokio::test]
async fn test_create_meeting_in_mock_mode() {
    let (code, stdout, stderr) = run_cli(&["Create meeting with John tomorrow at 3 PM"]).await;

    assert_eq!(code, 0);
    assert_eq!(
        stdout,
        "✅ Event 'Meeting with John' created successfully! https://calendar.google.com/mock/event\n"
    );
    assert!(stderr.is_empty());
}

/// Unquoted words are joined into a single request
#[tokio::test]
async fn test_unquoted_words_are_one_request() {
    let (code, stdout, _) = run_cli(&["Create", "meeting", "with", "John", "tomorrow"]).await;

    assert_eq!(code, 0);
    assert!(stdout.contains("'Meeting with John'"));
}

/// Listing events in mock mode prints the fixture
#[tokio::test]
async fn test_show_meetings_in_mock_mode() {
    let (code, stdout, stderr) = run_cli(&["Show me my meetings for next week"]).await;

    assert_eq!(code, 0);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "📅 Here are your events:");
    assert!(lines[1].starts_with("- Mock Meeting with Team ("));
    assert!(lines[2].starts_with("- Demo Call ("));
    assert!(stderr.is_empty());
}

/// Missing request text is a usage error, not a panic
#[tokio::test]
async fn test_missing_argument_is_usage_error() {
    let (code, stdout, stderr) = run_cli(&[]).await;

    assert_eq!(code, 2);
    assert!(stdout.is_empty());
    assert_eq!(stderr.lines().count(), 1);
    assert!(stderr.starts_with("❌ Missing request text."));
    assert!(stderr.contains("Usage: calendar-agent"));
}

/// Unknown flags are reported on one line with the usage
#[tokio::test]
async fn test_unknown_flag_is_usage_error() {
    let (code, stdout, stderr) = run_cli(&["--frobnicate", "Show my week"]).await;

    assert_eq!(code, 2);
    assert!(stdout.is_empty());
    assert_eq!(stderr.lines().count(), 1);
    assert!(stderr.contains("Usage: calendar-agent"));
}

/// A bad --timezone value is a usage error
#[tokio::test]
async fn test_bad_timezone_flag() {
    let (code, _, stderr) = run_cli(&["--timezone", "Nowhere/Atlantis", "Show my week"]).await;

    assert_eq!(code, 2);
    assert!(stderr.contains("Unknown time zone"));
}

/// Usage problems are reported before any configuration is loaded
#[tokio::test]
async fn test_usage_checked_before_config() {
    let broken = || -> AgentResult<Config> { Err(config_error("Unknown time zone: Mars/Olympus")) };

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = cli::run(["calendar-agent"], broken, &mut stdout, &mut stderr).await;
    assert_eq!(code, 2);
    assert!(String::from_utf8(stderr).unwrap().contains("Usage: calendar-agent"));

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = cli::run(["calendar-agent", "--help"], broken, &mut stdout, &mut stderr).await;
    assert_eq!(code, 0);
    assert!(stderr.is_empty());

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = cli::run(["calendar-agent", "Show my week"], broken, &mut stdout, &mut stderr).await;
    let stderr = String::from_utf8(stderr).unwrap();
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert_eq!(stderr.trim_end(), "❌ Configuration error: Unknown time zone: Mars/Olympus");
}

/// --help goes to stdout with a zero exit code
#[tokio::test]
async fn test_help_flag() {
    let (code, stdout, _) = run_cli(&["--help"]).await;

    assert_eq!(code, 0);
    assert!(stdout.contains("--mock"));
    assert!(stdout.contains("--timezone"));
}

/// Keyword classification: "show"/"list" fetch, everything else creates
#[tokio::test]
async fn test_mock_intent_classification() {
    let extractor = KeywordExtractor::new(chrono_tz::UTC);

    for utterance in [
        "Show me my events tomorrow",
        "can you list what I have",
        "SHOWCASE prep",
        "Playlist review",
    ] {
        let command = extractor.extract(utterance).await.unwrap();
        assert_eq!(command.intent, Intent::Fetch, "{}", utterance);
    }

    for utterance in [
        "Add a meeting with Sarah next Monday 2pm",
        "Lunch with the team",
        "What do I have on Friday?",
    ] {
        let command = extractor.extract(utterance).await.unwrap();
        assert_eq!(command.intent, Intent::Create, "{}", utterance);
    }
}

/// The mock calendar returns the same record for the same request
#[tokio::test]
async fn test_mock_create_is_deterministic() {
    let calendar = MockCalendar::new();
    let command = Command {
        title: Some("Quarterly review".to_string()),
        start_date: Some("2025-04-01T14:00:00".to_string()),
        ..Command::new(Intent::Create)
    };
    let event = NewEvent::from_command(&command, &chrono_tz::Europe::Paris, 60).unwrap();

    let first = calendar.create_event(&event).await.unwrap();
    let second = calendar.create_event(&event).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.title, "Quarterly review");
    assert_eq!(first.url, MOCK_EVENT_URL);
}

/// The mock fixture always falls inside whatever range was asked for
#[tokio::test]
async fn test_mock_list_stays_within_range() {
    let calendar = MockCalendar::new();
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();

    for (start, end) in [
        ("2025-06-01", "2025-06-02"),
        ("2030-12-31T23:00:00", "2031-01-01T01:00:00"),
        ("1999-01-01T00:00:00Z", "1999-01-01T00:00:01Z"),
    ] {
        let command = Command {
            start_date: Some(start.to_string()),
            end_date: Some(end.to_string()),
            ..Command::new(Intent::Fetch)
        };
        let range = TimeRange::from_command(&command, now, &chrono_tz::UTC).unwrap();
        let events = calendar.list_events(&range).await.unwrap();

        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| range.contains(&e.start_date)));
    }
}
