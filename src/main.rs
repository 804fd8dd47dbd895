use calendar_agent::{cli, startup};
use std::io;
use std::process::ExitCode;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<ExitCode> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting calendar agent");

    // Handle the request; configuration is loaded once the arguments parse
    let code = cli::run(
        std::env::args_os(),
        startup::load_config,
        &mut io::stdout(),
        &mut io::stderr(),
    )
    .await;
    Ok(ExitCode::from(code))
}
