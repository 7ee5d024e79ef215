mod config;
mod scheduler;

use poise::serenity_prelude as serenity;
use tracing::{debug, error, info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;

use config::BotConfig;
use stockwatch_core::{Data, Error};
use stockwatch_database::{CacheService, Database};
use stockwatch_monitor::{DiscordNotifier, MonitorService, SmsActivateClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        let target = metadata.target();

        if *metadata.level() > tracing::Level::INFO {
            return false;
        }

        !(target.starts_with("serenity::gateway::bridge::shard_manager")
            || target.starts_with("serenity::gateway::bridge::shard_runner"))
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    dotenvy::dotenv().ok();
    let config = BotConfig::from_env()?;

    let db = Database::connect(&config.database_url).await?;
    info!("PostgreSQL connection established.");

    let cache = build_cache(&config).await;
    let db = db.with_cache(cache);

    if config.auto_run_migrations {
        db.run_migrations().await?;
        info!("Database migrations applied.");
    } else {
        info!("Auto migrations disabled (set AUTO_RUN_MIGRATIONS=true to run at startup).");
    }

    let source = SmsActivateClient::from_env()?;
    info!(service = source.service(), "SMS-Activate client configured.");

    let notifier = DiscordNotifier::from_token(&config.token);
    let monitor = MonitorService::new(source, db.clone(), notifier);

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let guild_id = config.guild_id;
    let monitor_enabled = config.monitor_enabled;
    let monitor_interval = config.monitor_interval;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: stockwatch_commands::commands(),
            on_error: |error| Box::pin(on_error(error)),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(stockwatch_utils::COMMAND_PREFIX.to_string()),
                mention_as_prefix: false,
                ..Default::default()
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            let db = db.clone();
            let monitor = monitor.clone();
            Box::pin(async move {
                info!("Stockwatch is ready.");

                match guild_id {
                    Some(guild_id) => {
                        poise::builtins::register_in_guild(
                            ctx,
                            &framework.options().commands,
                            serenity::GuildId::new(guild_id),
                        )
                        .await?;
                        info!(guild_id, "Commands registered in guild.");
                    }
                    None => {
                        poise::builtins::register_globally(ctx, &framework.options().commands)
                            .await?;
                        info!("Commands registered globally.");
                    }
                }

                if monitor_enabled {
                    scheduler::spawn_monitor_loop(monitor.clone(), monitor_interval);
                } else {
                    info!("Scheduled monitoring disabled (set MONITOR_ENABLED=true to enable).");
                }

                Ok(Data { db, monitor })
            })
        })
        .build();

    info!("Stockwatch is connecting...");

    let mut client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .await?;

    client.start().await?;
    Ok(())
}

async fn build_cache(config: &BotConfig) -> CacheService {
    let prefix = config.redis_key_prefix.clone();

    if !config.redis_enabled {
        info!("Redis cache disabled (set REDIS_ENABLED=true to enable).");
        return CacheService::disabled(prefix);
    }

    let Some(redis_url) = config.redis_url.as_deref() else {
        warn!(key_prefix = %prefix, "REDIS_ENABLED=true but REDIS_URL is missing; continuing with DB-only mode.");
        return CacheService::disabled(prefix);
    };

    let cache = match CacheService::redis(redis_url, prefix.clone()) {
        Ok(cache) => cache,
        Err(err) => {
            warn!(?err, key_prefix = %prefix, "Failed to initialize Redis cache; continuing with DB-only mode.");
            return CacheService::disabled(prefix);
        }
    };

    match cache.ping().await {
        Ok(()) => info!(key_prefix = %prefix, "Redis cache enabled."),
        Err(err) => warn!(
            ?err,
            "Redis cache ping failed; cache operations will continue with fallback behavior."
        ),
    }

    cache
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(?error, command = %ctx.command().qualified_name, "command error");

            let embed = stockwatch_utils::embed::build_embed(
                "Command Error",
                "Something went wrong while running this command.",
                None,
            );

            let _ = ctx
                .send(poise::CreateReply::default().ephemeral(true).embed(embed))
                .await;
        }
        poise::FrameworkError::ArgumentParse { ctx, input, .. } => {
            let name = ctx.command().qualified_name.as_str();
            let usage = stockwatch_commands::COMMANDS
                .iter()
                .find(|meta| meta.name == name)
                .map_or_else(|| format!("!{name}"), |meta| meta.usage.to_owned());

            let description = if let Some(input) = input {
                format!("Invalid argument: `{}`\nUsage: `{}`", input, usage)
            } else {
                format!("Missing required argument.\nUsage: `{}`", usage)
            };

            let _ = ctx.say(description).await;
        }
        poise::FrameworkError::UnknownCommand { .. } => {
            debug!("unknown command invocation");
        }
        other => {
            error!(?other, "framework error");
        }
    }
}
