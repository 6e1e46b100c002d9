use std::sync::Arc;

use anyhow::Context;
use serenity::{
    all::{ApplicationId, GatewayIntents},
    Client,
};
use tokio::{select, sync::watch, task::JoinHandle};
use tracing::{error, info, instrument};

use utility::{config::Config, here};

use crate::{commands, generation::Generator, Data};

type Error = anyhow::Error;

pub struct DiscordBot;

impl DiscordBot {
    #[instrument(skip(config, generator, exit_receiver))]
    pub async fn start(
        config: Arc<Config>,
        generator: Generator,
        exit_receiver: watch::Receiver<bool>,
    ) -> anyhow::Result<JoinHandle<()>> {
        let setup_config = Arc::clone(&config);

        let framework = poise::Framework::builder()
            .options(poise::FrameworkOptions {
                commands: commands::get_commands(),
                on_error: |error| Box::pin(on_error(error)),
                ..Default::default()
            })
            .setup(move |ctx, ready, framework| {
                Box::pin(async move {
                    info!(user = %ready.user.name, "Connected to Discord.");

                    poise::builtins::register_globally(ctx, &framework.options().commands)
                        .await
                        .context(here!())?;

                    info!(
                        count = framework.options().commands.len(),
                        "Commands registered."
                    );

                    Ok(Data {
                        config: setup_config,
                        generator,
                    })
                })
            })
            .build();

        let client = Client::builder(&config.discord.token, GatewayIntents::non_privileged())
            .application_id(ApplicationId::new(config.discord.client_id))
            .framework(framework)
            .await
            .context(here!())?;

        let task = tokio::spawn(async move {
            match Self::run(client, exit_receiver).await {
                Ok(()) => (),
                Err(e) => {
                    error!("{:?}", e);
                }
            }

            info!(task = "Discord bot", "Shutting down.");
        });

        Ok(task)
    }

    #[instrument(skip(client, exit_receiver))]
    async fn run(
        mut client: Client,
        mut exit_receiver: watch::Receiver<bool>,
    ) -> anyhow::Result<()> {
        let shard_manager = Arc::clone(&client.shard_manager);

        select! {
            e = client.start() => {
                e.context(here!())
            }
            e = exit_receiver.changed() => {
                shard_manager.shutdown_all().await;
                e.context(here!())
            }
        }
    }
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!(?error, "Failed to set up the bot.");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(command = %ctx.command().name, ?error, "Command failed.");
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!(?e, "Error while handling error.");
            }
        }
    }
}
