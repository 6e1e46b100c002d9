#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::unwrap_used, clippy::expect_used)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

mod commands;
mod discord_bot;
pub mod generation;

use std::sync::Arc;

use utility::config::Config;

pub use discord_bot::DiscordBot;
pub use generation::Generator;

/// State shared with every command invocation.
pub struct Data {
    pub config: Arc<Config>,
    pub generator: Generator,
}
