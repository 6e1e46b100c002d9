#![forbid(unsafe_code)]
#![allow(unknown_lints)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::perf,
    clippy::nursery,
    clippy::complexity,
    clippy::correctness,
    clippy::clone_on_ref_ptr,
    clippy::exit,
    clippy::expect_used,
    clippy::let_underscore_must_use,
    clippy::map_err_ignore,
    clippy::semicolon_if_nothing_returned,
    clippy::str_to_string,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_in_result,
    clippy::unwrap_used
)]
#![allow(
    clippy::missing_errors_doc,
    clippy::non_ascii_literal,
    clippy::cargo_common_metadata,
    clippy::multiple_crate_versions
)]

use std::{process::ExitCode, sync::Arc};

use tokio::sync::watch;
use tracing::{info, instrument, warn};

use apis::{completion_api::CompletionApi, image_api::ImageApi, pokemon_api::PokeApi};
use bot::{DiscordBot, Generator};
use utility::{config::Config, logger::Logger};

fn main() -> anyhow::Result<ExitCode> {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    Logger::initialize(config.bot.is_development)?;
    info!(development = config.bot.is_development, "Environment variables validated successfully.");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { async_main(config).await })?;

    Ok(ExitCode::SUCCESS)
}

#[instrument(skip(config))]
async fn async_main(config: Arc<Config>) -> anyhow::Result<()> {
    if config.eden_ai.api_key.is_none() {
        warn!("EDEN_API_KEY is not set, EdenAI will reject every generation.");
    }

    let http = apis::http_client()?;

    let generator = Generator::new(
        Arc::new(PokeApi::new(http.clone())),
        Arc::new(CompletionApi::new(http.clone(), &config.eden_ai)),
        Arc::new(ImageApi::new(http, &config.eden_ai)),
    );

    let (exit_sender, exit_receiver) = watch::channel(false);

    let mut task = DiscordBot::start(Arc::clone(&config), generator, exit_receiver).await?;

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!(signal_type = "Terminate", "Terminate signal received!");

            if exit_sender.send(true).is_err() {
                warn!("Discord bot already stopped.");
            }

            task.await?;
        }
        result = &mut task => {
            result?;
        }
    }

    info!(task = "Main thread", "Shutting down.");
    Ok(())
}
