//! Transport-independent handling of the configuration commands.
//!
//! The poise commands resolve the invoking [`Actor`] and pack their options
//! into [`CommandArgs`]; everything after that (authorization, argument
//! validation, the store write and the reply text) happens here.

use std::str::FromStr;

use serde_json::{Map, Value};
use stockwatch_database::{ConfigField, TenantStore};
use stockwatch_utils::parse::{parse_channel_id, parse_non_negative};
use stockwatch_utils::permissions::Actor;
use thiserror::Error;
use tracing::{error, info};

/// Option values keyed by option name, shaped like an interaction payload.
pub type CommandArgs = Map<String, Value>;

pub const NOT_AUTHORIZED_MESSAGE: &str = "You are not authorized to use this command.";
pub const STORE_FAILURE_MESSAGE: &str = "Something went wrong while saving the configuration.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigCommand {
    Monitor,
    SetChannel,
    SetThreshold,
}

impl ConfigCommand {
    pub fn name(self) -> &'static str {
        match self {
            Self::Monitor => "monitor",
            Self::SetChannel => "setchannel",
            Self::SetThreshold => "setthreshold",
        }
    }
}

impl FromStr for ConfigCommand {
    type Err = CommandError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "monitor" => Ok(Self::Monitor),
            "setchannel" => Ok(Self::SetChannel),
            "setthreshold" => Ok(Self::SetThreshold),
            other => Err(CommandError::UnknownCommand(other.to_owned())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandReply {
    pub content: String,
    pub ephemeral: bool,
}

impl CommandReply {
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("not authorized")]
    NotAuthorized,

    #[error("{0}")]
    Validation(String),

    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("failed to save configuration: {0:#}")]
    Store(#[source] anyhow::Error),
}

impl CommandError {
    pub fn to_reply(&self) -> CommandReply {
        let content = match self {
            Self::NotAuthorized => NOT_AUTHORIZED_MESSAGE.to_owned(),
            Self::Validation(message) => message.clone(),
            Self::UnknownCommand(name) => format!("Unknown command: `{name}`."),
            Self::Store(_) => STORE_FAILURE_MESSAGE.to_owned(),
        };
        CommandReply::ephemeral(content)
    }
}

/// Authorize, validate and apply one configuration command for `guild_id`.
///
/// Failures are rendered as replies; the only side effect is a single-field
/// write to `store` on success.
pub async fn handle_command<S: TenantStore>(
    store: &S,
    guild_id: u64,
    actor: &Actor,
    command_name: &str,
    args: &CommandArgs,
) -> CommandReply {
    match execute(store, guild_id, actor, command_name, args).await {
        Ok(reply) => reply,
        Err(err) => {
            if let CommandError::Store(source) = &err {
                error!(?source, guild_id, command = command_name, "configuration write failed");
            }
            err.to_reply()
        }
    }
}

async fn execute<S: TenantStore>(
    store: &S,
    guild_id: u64,
    actor: &Actor,
    command_name: &str,
    args: &CommandArgs,
) -> Result<CommandReply, CommandError> {
    if !actor.can_configure() {
        return Err(CommandError::NotAuthorized);
    }

    let command = command_name.parse::<ConfigCommand>()?;
    let (field, content) = match command {
        ConfigCommand::Monitor => {
            let country = country_arg(args)?;
            let content = format!("Now monitoring stock for **{country}**.");
            (ConfigField::Country(country), content)
        }
        ConfigCommand::SetChannel => {
            let channel_id = channel_arg(args, guild_id)?;
            let content = format!("Alerts will be sent to <#{channel_id}>.");
            (ConfigField::ChannelId(channel_id), content)
        }
        ConfigCommand::SetThreshold => {
            let threshold = threshold_arg(args)?;
            let content = format!("Alert threshold set to **{threshold}**.");
            (ConfigField::Threshold(threshold), content)
        }
    };

    store
        .put_field(guild_id, field)
        .await
        .map_err(CommandError::Store)?;
    info!(guild_id, user_id = actor.user_id, command = command.name(), "configuration updated");

    Ok(CommandReply::ephemeral(content))
}

fn required<'a>(args: &'a CommandArgs, name: &str) -> Result<&'a Value, CommandError> {
    args.get(name)
        .filter(|value| !value.is_null())
        .ok_or_else(|| CommandError::Validation(format!("Missing required option `{name}`.")))
}

/// SMS-Activate takes numeric country ids, so names are rejected up front
/// rather than failing on every pass.
fn country_arg(args: &CommandArgs) -> Result<String, CommandError> {
    let country = match required(args, "country")? {
        Value::Number(number) => number.as_u64(),
        Value::String(raw) if raw.trim().is_empty() => {
            return Err(CommandError::Validation(
                "Provide a country to monitor.".to_owned(),
            ));
        }
        Value::String(raw) => parse_non_negative(raw),
        _ => None,
    };

    country.map(|id| id.to_string()).ok_or_else(|| {
        CommandError::Validation(
            "Country must be an SMS-Activate numeric country id (e.g. `43` for Germany)."
                .to_owned(),
        )
    })
}

/// `channel_guild_id` is filled in by transports that resolve the channel;
/// raw ids and mentions are taken as given.
fn channel_arg(args: &CommandArgs, guild_id: u64) -> Result<u64, CommandError> {
    let channel_id = match required(args, "channel")? {
        Value::Number(number) => number.as_u64().filter(|id| *id != 0),
        Value::String(raw) => parse_channel_id(raw),
        _ => None,
    };

    let channel_id = channel_id.ok_or_else(|| {
        CommandError::Validation("Provide a valid channel mention or id.".to_owned())
    })?;

    match args.get("channel_guild_id").and_then(Value::as_u64) {
        Some(owner) if owner != guild_id => Err(CommandError::Validation(
            "That channel is not in this server.".to_owned(),
        )),
        _ => Ok(channel_id),
    }
}

fn threshold_arg(args: &CommandArgs) -> Result<u64, CommandError> {
    let threshold = match required(args, "threshold")? {
        Value::Number(number) => number.as_u64(),
        Value::String(raw) => parse_non_negative(raw),
        _ => None,
    };

    threshold.ok_or_else(|| {
        CommandError::Validation("Threshold must be a whole number of 0 or more.".to_owned())
    })
}
