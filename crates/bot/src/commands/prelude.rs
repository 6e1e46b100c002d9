pub use anyhow::{anyhow, Context as _};
pub use serenity::builder::{CreateEmbed, CreateEmbedFooter};

pub use utility::here;

pub use crate::Data;

pub type Error = anyhow::Error;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type Command = poise::Command<Data, Error>;
