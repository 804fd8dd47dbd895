use crate::agent::Agent;
use crate::config::Config;
use crate::error::{usage_error, AgentResult, Error};
use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::io::Write;
use tracing::error;

pub const USAGE: &str = "Usage: calendar-agent [--mock] [--timezone <TZ>] <UTTERANCE>...";

/// Create or look up Google Calendar events from a plain-language request
#[derive(Parser, Debug)]
#[command(name = "calendar-agent", version)]
pub struct Cli {
    /// Use canned responses for both the language model and the calendar
    #[arg(long)]
    pub mock: bool,

    /// IANA time zone for interpreting and creating events (e.g. 'Europe/London')
    #[arg(long, value_name = "TZ")]
    pub timezone: Option<String>,

    /// The request, e.g. "Create meeting with John tomorrow at 3 PM"
    #[arg(value_name = "UTTERANCE", trailing_var_arg = true)]
    pub utterance: Vec<String>,
}

impl Cli {
    /// All positional words joined into one request
    pub fn utterance(&self) -> AgentResult<String> {
        let text = self.utterance.join(" ");
        if text.trim().is_empty() {
            return Err(usage_error(&format!("Missing request text. {}", USAGE)));
        }
        Ok(text.trim().to_string())
    }
}

/// Parse arguments, run one request and write the outcome; returns the exit code
///
/// Configuration is only loaded once the arguments are known to be usable, so
/// `--help` and usage errors work even with a broken environment.
pub async fn run<I, T, L, O, E>(args: I, load_config: L, stdout: &mut O, stderr: &mut E) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    L: FnOnce() -> AgentResult<Config>,
    O: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = write!(stdout, "{}", e);
            return 0;
        }
        Err(e) => {
            let rendered = e.to_string();
            let message = rendered
                .lines()
                .next()
                .unwrap_or_default()
                .trim_start_matches("error: ");
            return report(stderr, &usage_error(&format!("{}. {}", message, USAGE)));
        }
    };

    match execute(cli, load_config).await {
        Ok(reply) => {
            if let Err(e) = writeln!(stdout, "{}", reply) {
                return report(stderr, &Error::Io(e));
            }
            0
        }
        Err(e) => report(stderr, &e),
    }
}

async fn execute<L>(cli: Cli, load_config: L) -> AgentResult<String>
where
    L: FnOnce() -> AgentResult<Config>,
{
    let utterance = cli.utterance()?;
    let mut config = load_config()?;

    if let Some(timezone) = &cli.timezone {
        config = config
            .with_timezone(timezone)
            .map_err(|e| usage_error(&e.to_string()))?;
    }
    config.force_mock |= cli.mock;

    let agent = Agent::from_config(&config)?;
    agent.handle(&utterance).await
}

/// Print a single-line failure message and pick the exit code
fn report<E: Write>(stderr: &mut E, err: &Error) -> u8 {
    error!("Request failed: {:?}", err);
    let message = err.to_string();
    let _ = writeln!(stderr, "❌ {}", message.split_whitespace().collect::<Vec<_>>().join(" "));
    err.exit_code()
}
