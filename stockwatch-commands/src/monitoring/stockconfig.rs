use crate::CommandMeta;
use crate::handler::{CommandReply, NOT_AUTHORIZED_MESSAGE};
use crate::monitoring::{guild_only_message, invoking_actor, send_reply};
use stockwatch_core::{Context, Error};
use stockwatch_database::{GuildStockConfig, TenantStore};
use stockwatch_utils::embed::build_embed;

pub const META: CommandMeta = CommandMeta {
    name: "stockconfig",
    desc: "Show this server's stock monitoring settings.",
    category: "monitoring",
    usage: "!stockconfig",
};

#[poise::command(prefix_command, slash_command, category = "Monitoring")]
pub async fn stockconfig(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let actor = invoking_actor(ctx, guild_id).await?;
    if !actor.can_configure() {
        send_reply(ctx, CommandReply::ephemeral(NOT_AUTHORIZED_MESSAGE)).await?;
        return Ok(());
    }

    let config = ctx
        .data()
        .db
        .get(guild_id.get())
        .await?
        .unwrap_or_else(|| GuildStockConfig::new(guild_id.get()));

    let footer = if config.monitoring_target().is_some() {
        "Monitoring active"
    } else {
        "Monitoring inactive until a country and channel are set"
    };

    ctx.send(
        poise::CreateReply::default()
            .ephemeral(true)
            .embed(build_embed("Stock Monitoring", config_description(&config), Some(footer))),
    )
    .await?;

    Ok(())
}

fn config_description(config: &GuildStockConfig) -> String {
    let country = config.country.as_deref().unwrap_or("Not set");
    let channel = config
        .channel_id
        .map(|id| format!("<#{id}>"))
        .unwrap_or_else(|| "Not set".to_owned());
    let threshold = match config.threshold {
        Some(threshold) => threshold.to_string(),
        None => format!("{} (default)", config.effective_threshold()),
    };

    format!(
        "**Country :** {}\n**Alert Channel :** {}\n**Threshold :** {}\n**Last Observed Stock :** {}",
        country,
        channel,
        threshold,
        config.effective_last_observed_stock()
    )
}

#[cfg(test)]
mod tests {
    use stockwatch_database::GuildStockConfig;

    use super::config_description;

    #[test]
    fn unset_values_are_labelled() {
        let description = config_description(&GuildStockConfig::new(1));
        assert_eq!(
            description,
            "**Country :** Not set\n**Alert Channel :** Not set\n**Threshold :** 50 (default)\n**Last Observed Stock :** 0"
        );
    }

    #[test]
    fn configured_values_are_shown() {
        let config = GuildStockConfig {
            channel_id: Some(77),
            country: Some("43".to_owned()),
            last_observed_stock: Some(12),
            threshold: Some(5),
            ..GuildStockConfig::new(1)
        };
        assert_eq!(
            config_description(&config),
            "**Country :** 43\n**Alert Channel :** <#77>\n**Threshold :** 5\n**Last Observed Stock :** 12"
        );
    }
}
