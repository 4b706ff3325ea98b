use clap::Parser;

use nutralis::cli::{self, Cli};
use nutralis::config::AppConfig;
use nutralis::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "nutralis=info,sqlx=warn".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    // Logs go to stderr so command output stays pipeable.
    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;
    cli.apply(&mut config);

    let state = AppState::init(config).await?;
    tracing::debug!(command = ?cli.command, "running");

    let mut stdout = std::io::stdout().lock();
    cli::run(cli.command, &state, &mut stdout).await
}
