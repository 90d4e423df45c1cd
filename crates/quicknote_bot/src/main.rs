//! QuickNote Telegram bot entry point.
//!
//! Startup order: environment config, logging, database, then long polling.
//! Any startup failure prints one `error:` line and exits with status 1.

mod command;
mod config;
mod telegram;

use config::BotConfig;
use log::info;
use quicknote_core::db::open_db;
use quicknote_core::{init_logging, DialogController, SqliteNoteRepository};
use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    // A missing .env file is normal in production.
    dotenv::dotenv().ok();

    let config = BotConfig::from_env()?;
    init_logging(&config.log_level, &config.log_dir)?;
    info!(
        "event=bot_start module=bot status=start version={} db_path={}",
        quicknote_core::core_version(),
        config.db_path.display()
    );

    let repo = SqliteNoteRepository::try_new(open_db(&config.db_path)?)?;
    let controller = Arc::new(DialogController::new(repo));
    telegram::run(config.bot_token, controller).await;

    info!("event=bot_stop module=bot status=ok");
    Ok(())
}
