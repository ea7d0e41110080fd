//! `widgetdash` -- a dashboard of widgets backed by arbitrary JSON APIs.
//!
//! # Environment variables
//!
//! | Variable                        | Required | Default              | Description                  |
//! |---------------------------------|----------|----------------------|------------------------------|
//! | `WIDGETDASH_DATA_DIR`           | no       | `$HOME/.widgetdash`  | Where widgets and settings live |
//! | `WIDGETDASH_COMMUNITY_URL`      | no       | public manifest      | Community manifest URL       |
//! | `WIDGETDASH_FETCH_TIMEOUT_SECS` | no       | --                   | Per-fetch timeout            |
//! | `WIDGETDASH_FETCH_CONCURRENCY`  | no       | --                   | Max concurrent fetches       |
//! | `RUST_LOG`                      | no       | `widgetdash=info`    | Log filter (logs go to stderr) |

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use widgetdash::cli::{Command, USAGE};
use widgetdash::commands;
use widgetdash::config::AppConfig;
use widgetdash::error::AppResult;
use widgetdash::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "widgetdash=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(std::env::args().skip(1)).await {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    }
}

async fn run(args: impl Iterator<Item = String>) -> AppResult<String> {
    let command = Command::parse(args)?;
    if command == Command::Help {
        return Ok(USAGE.to_string());
    }

    let config = AppConfig::from_env()?;
    tracing::debug!(data_dir = %config.data_dir.display(), ?command, "Starting widgetdash");

    let state = AppState::new(config).await?;
    commands::run(&state, command).await
}
