use poise::serenity_prelude as serenity;
use serde_json::json;

use crate::CommandMeta;
use crate::handler::CommandArgs;
use crate::monitoring::run_config_command;
use stockwatch_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "setchannel",
    desc: "Set the alert channel.",
    category: "monitoring",
    usage: "!setchannel <#channel>",
};

#[poise::command(prefix_command, slash_command, category = "Monitoring")]
pub async fn setchannel(
    ctx: Context<'_>,
    #[description = "The channel for sending alerts"] channel: serenity::GuildChannel,
) -> Result<(), Error> {
    let mut args = CommandArgs::new();
    args.insert("channel".to_owned(), json!(channel.id.get()));
    args.insert("channel_guild_id".to_owned(), json!(channel.guild_id.get()));
    run_config_command(ctx, META.name, args).await
}
