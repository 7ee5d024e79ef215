use crate::utility::embeds::{
    grouped_help_description, no_commands_message, unknown_category_message,
};
use crate::{COMMANDS, CommandMeta};
use stockwatch_core::{Context, Error};
use stockwatch_utils::embed::build_embed;

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Lists out all available commands.",
    category: "utility",
    usage: "!help [category]",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Category"] category: Option<String>,
) -> Result<(), Error> {
    let category = category
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(str::to_ascii_lowercase);

    let mut categories: Vec<&str> = COMMANDS.iter().map(|c| c.category).collect();
    categories.sort_unstable();
    categories.dedup();

    if let Some(wanted_category) = category.as_deref()
        && !categories.contains(&wanted_category)
    {
        ctx.say(unknown_category_message(wanted_category, &categories))
            .await?;
        return Ok(());
    }

    let commands = sorted_commands(category.as_deref());
    if commands.is_empty() {
        ctx.say(no_commands_message(category.as_deref())).await?;
        return Ok(());
    }

    let embed = build_embed(
        "Available Commands",
        grouped_help_description(&commands),
        Some("Monitoring commands require the server owner or Administrator."),
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

fn sorted_commands(category: Option<&str>) -> Vec<&'static CommandMeta> {
    let mut filtered: Vec<&'static CommandMeta> = COMMANDS
        .iter()
        .filter(|cmd| match category {
            Some(wanted) => cmd.category == wanted,
            None => true,
        })
        .collect();

    filtered.sort_unstable_by(|left, right| {
        left.category
            .cmp(right.category)
            .then_with(|| left.name.cmp(right.name))
    });

    filtered
}
