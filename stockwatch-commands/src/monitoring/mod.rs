pub mod checkstock;
pub mod monitor;
pub mod setchannel;
pub mod setthreshold;
pub mod stockconfig;

use poise::serenity_prelude as serenity;

use crate::handler::{CommandArgs, CommandReply, handle_command};
use stockwatch_core::{Context, Error};
use stockwatch_utils::permissions::{Actor, resolve_actor};

pub fn guild_only_message() -> &'static str {
    "This command only works in servers."
}

pub async fn send_reply(ctx: Context<'_>, reply: CommandReply) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .content(reply.content)
            .ephemeral(reply.ephemeral),
    )
    .await?;
    Ok(())
}

/// Resolve the author of `ctx` as an [`Actor`] within `guild_id`.
pub async fn invoking_actor(ctx: Context<'_>, guild_id: serenity::GuildId) -> Result<Actor, Error> {
    resolve_actor(ctx.http(), guild_id, ctx.author().id).await
}

/// Route a configuration command through the shared handler and send its reply.
pub(crate) async fn run_config_command(
    ctx: Context<'_>,
    command_name: &str,
    args: CommandArgs,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let actor = invoking_actor(ctx, guild_id).await?;
    let reply = handle_command(&ctx.data().db, guild_id.get(), &actor, command_name, &args).await;
    send_reply(ctx, reply).await
}
