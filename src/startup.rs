use crate::config::Config;
use crate::error::{config_error, AgentResult};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
///
/// Logs go to stderr so stdout only carries the reply.
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,calendar_agent=info")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| config_error(&format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> AgentResult<Config> {
    match Config::load() {
        Ok(config) => {
            info!(
                "Language model: {:?}, calendar: {:?}, time zone: {}",
                config.language_model_mode(),
                config.calendar_mode(),
                config.timezone
            );
            Ok(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e)
        }
    }
}
