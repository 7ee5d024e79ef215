use serde_json::json;

use crate::CommandMeta;
use crate::handler::CommandArgs;
use crate::monitoring::run_config_command;
use stockwatch_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "setthreshold",
    desc: "Set the minimum stock increase needed before an alert is sent.",
    category: "monitoring",
    usage: "!setthreshold <count>",
};

// Signed so negative input reaches validation instead of failing argument parsing.
#[poise::command(prefix_command, slash_command, category = "Monitoring")]
pub async fn setthreshold(
    ctx: Context<'_>,
    #[description = "Minimum stock increase required for alert"] threshold: i64,
) -> Result<(), Error> {
    let mut args = CommandArgs::new();
    args.insert("threshold".to_owned(), json!(threshold));
    run_config_command(ctx, META.name, args).await
}
