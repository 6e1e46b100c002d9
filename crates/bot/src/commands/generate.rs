use async_trait::async_trait;
use poise::{CreateReply, ReplyHandle};

use super::prelude::*;
use crate::generation::{FinalReply, Responder};

/// Generation images with EdenAI
#[poise::command(slash_command)]
pub(crate) async fn generate(ctx: Context<'_>) -> anyhow::Result<()> {
    let mut responder = InteractionResponder {
        ctx,
        placeholder: None,
    };

    ctx.data()
        .generator
        .respond(&mut responder)
        .await
        .context(here!())
}

/// Answers a slash command by sending one message and editing it afterwards.
struct InteractionResponder<'a> {
    ctx: Context<'a>,
    placeholder: Option<ReplyHandle<'a>>,
}

#[async_trait]
impl<'a> Responder for InteractionResponder<'a> {
    async fn acknowledge(&mut self, content: &str) -> anyhow::Result<()> {
        let handle = self.ctx.say(content).await.context(here!())?;
        self.placeholder = Some(handle);

        Ok(())
    }

    async fn finish(&mut self, reply: FinalReply) -> anyhow::Result<()> {
        let handle = self
            .placeholder
            .as_ref()
            .ok_or_else(|| anyhow!("No placeholder message to edit."))?;

        handle
            .edit(self.ctx, to_create_reply(reply))
            .await
            .context(here!())
    }
}

fn to_create_reply(reply: FinalReply) -> CreateReply {
    match reply {
        FinalReply::Card(card) => {
            let mut embed = CreateEmbed::new()
                .title(card.title)
                .image(card.image)
                .footer(CreateEmbedFooter::new(card.footer));

            if let Some(thumbnail) = card.thumbnail {
                embed = embed.thumbnail(thumbnail);
            }

            CreateReply::default().content("").embed(embed)
        }
        FinalReply::Failure(message) => CreateReply::default().content(message),
    }
}
