use tracing::warn;

use crate::CommandMeta;
use crate::handler::{CommandReply, NOT_AUTHORIZED_MESSAGE};
use crate::monitoring::{guild_only_message, invoking_actor, send_reply};
use stockwatch_core::{Context, Error};
use stockwatch_monitor::{MonitorError, TenantOutcome};

pub const META: CommandMeta = CommandMeta {
    name: "checkstock",
    desc: "Check stock for this server's country now and alert if it rose enough.",
    category: "monitoring",
    usage: "!checkstock",
};

#[poise::command(prefix_command, slash_command, category = "Monitoring")]
pub async fn checkstock(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let actor = invoking_actor(ctx, guild_id).await?;
    if !actor.can_configure() {
        send_reply(ctx, CommandReply::ephemeral(NOT_AUTHORIZED_MESSAGE)).await?;
        return Ok(());
    }

    ctx.defer_ephemeral().await?;

    let result = ctx.data().monitor.run_for_tenant(guild_id.get()).await;
    if let Err(err) = &result
        && !matches!(err, MonitorError::ConfigurationMissing { .. })
    {
        warn!(guild_id = guild_id.get(), %err, "manual stock check failed");
    }

    send_reply(ctx, CommandReply::ephemeral(check_message(&result))).await
}

fn check_message(result: &Result<TenantOutcome, MonitorError>) -> String {
    match result {
        Ok(TenantOutcome::Checked {
            stock,
            notified: true,
        }) => format!("Current stock: **{stock}**. An alert was sent."),
        Ok(TenantOutcome::Checked {
            stock,
            notified: false,
        }) => format!("Current stock: **{stock}**. No alert needed."),
        Ok(TenantOutcome::Skipped) | Err(MonitorError::ConfigurationMissing { .. }) => {
            "Monitoring is not set up yet. Use `/monitor` and `/setchannel` first.".to_owned()
        }
        Err(MonitorError::SourceUnavailable(_)) => {
            "Could not reach the stock provider. Try again later.".to_owned()
        }
        Err(MonitorError::SinkUnavailable(_)) => {
            "Stock rose past the threshold but the alert could not be posted. Check the bot's access to the alert channel.".to_owned()
        }
        Err(MonitorError::StoreUnavailable(_)) => {
            "Something went wrong while saving the configuration.".to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use stockwatch_monitor::{MonitorError, TenantOutcome};

    use super::check_message;

    #[test]
    fn messages_cover_outcomes() {
        assert_eq!(
            check_message(&Ok(TenantOutcome::Checked {
                stock: 80,
                notified: true,
            })),
            "Current stock: **80**. An alert was sent."
        );
        assert_eq!(
            check_message(&Ok(TenantOutcome::Checked {
                stock: 3,
                notified: false,
            })),
            "Current stock: **3**. No alert needed."
        );
        assert!(
            check_message(&Err(MonitorError::ConfigurationMissing { guild_id: 1 }))
                .contains("/monitor")
        );
        assert!(
            check_message(&Err(MonitorError::SourceUnavailable(anyhow::anyhow!("down"))))
                .contains("stock provider")
        );
    }
}
