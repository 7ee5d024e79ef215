use serde_json::json;

use crate::CommandMeta;
use crate::handler::CommandArgs;
use crate::monitoring::run_config_command;
use stockwatch_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "monitor",
    desc: "Set the country to monitor.",
    category: "monitoring",
    usage: "!monitor <country_id>",
};

#[poise::command(prefix_command, slash_command, category = "Monitoring")]
pub async fn monitor(
    ctx: Context<'_>,
    #[description = "SMS-Activate country id to monitor, e.g. 43"]
    #[rest]
    country: String,
) -> Result<(), Error> {
    let mut args = CommandArgs::new();
    args.insert("country".to_owned(), json!(country));
    run_config_command(ctx, META.name, args).await
}
