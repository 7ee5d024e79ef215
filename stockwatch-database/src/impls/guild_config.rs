use anyhow::Context as _;
use sqlx::FromRow;

use crate::cache::{CONFIG_CACHE_TTL, guild_config_key, invalidate_guild_config};
use crate::database::Database;
use crate::model::guild_config::{ConfigField, GuildStockConfig};

#[derive(Debug, FromRow)]
struct GuildStockConfigRow {
    guild_id: i64,
    channel_id: Option<i64>,
    country: Option<String>,
    last_observed_stock: Option<i64>,
    threshold: Option<i64>,
}

impl TryFrom<GuildStockConfigRow> for GuildStockConfig {
    type Error = anyhow::Error;

    fn try_from(row: GuildStockConfigRow) -> anyhow::Result<Self> {
        Ok(Self {
            guild_id: u64::try_from(row.guild_id).context("guild_id out of u64 range")?,
            channel_id: row
                .channel_id
                .map(u64::try_from)
                .transpose()
                .context("channel_id out of u64 range")?,
            country: row.country,
            last_observed_stock: row
                .last_observed_stock
                .map(u64::try_from)
                .transpose()
                .context("last_observed_stock out of u64 range")?,
            threshold: row
                .threshold
                .map(u64::try_from)
                .transpose()
                .context("threshold out of u64 range")?,
        })
    }
}

pub async fn get_guild_config(
    db: &Database,
    guild_id: u64,
) -> anyhow::Result<Option<GuildStockConfig>> {
    let cache_key = guild_config_key(db.cache(), guild_id);
    db.cache()
        .get_or_load_json(&cache_key, CONFIG_CACHE_TTL, || async {
            let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

            let row = sqlx::query_as::<_, GuildStockConfigRow>(
                "SELECT guild_id, channel_id, country, last_observed_stock, threshold \
                 FROM guild_stock_config WHERE guild_id = $1",
            )
            .bind(guild_id_i64)
            .fetch_optional(db.pool())
            .await?;

            row.map(GuildStockConfig::try_from).transpose()
        })
        .await
}

/// Every stored guild record, read straight from PostgreSQL.
pub async fn list_guild_configs(db: &Database) -> anyhow::Result<Vec<GuildStockConfig>> {
    let rows = sqlx::query_as::<_, GuildStockConfigRow>(
        "SELECT guild_id, channel_id, country, last_observed_stock, threshold \
         FROM guild_stock_config ORDER BY guild_id",
    )
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(GuildStockConfig::try_from).collect()
}

/// Upsert one column for a guild, creating the row on first write.
pub async fn set_guild_config_field(
    db: &Database,
    guild_id: u64,
    field: ConfigField,
) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    let query = match field {
        ConfigField::Country(country) => sqlx::query(
            "INSERT INTO guild_stock_config (guild_id, country)
             VALUES ($1, $2)
             ON CONFLICT (guild_id) DO UPDATE SET country = EXCLUDED.country, updated_at = NOW()",
        )
        .bind(guild_id_i64)
        .bind(country),
        ConfigField::ChannelId(channel_id) => sqlx::query(
            "INSERT INTO guild_stock_config (guild_id, channel_id)
             VALUES ($1, $2)
             ON CONFLICT (guild_id) DO UPDATE SET channel_id = EXCLUDED.channel_id, updated_at = NOW()",
        )
        .bind(guild_id_i64)
        .bind(i64::try_from(channel_id).context("channel_id out of i64 range")?),
        ConfigField::Threshold(threshold) => sqlx::query(
            "INSERT INTO guild_stock_config (guild_id, threshold)
             VALUES ($1, $2)
             ON CONFLICT (guild_id) DO UPDATE SET threshold = EXCLUDED.threshold, updated_at = NOW()",
        )
        .bind(guild_id_i64)
        .bind(i64::try_from(threshold).context("threshold out of i64 range")?),
        ConfigField::LastObservedStock(stock) => sqlx::query(
            "INSERT INTO guild_stock_config (guild_id, last_observed_stock)
             VALUES ($1, $2)
             ON CONFLICT (guild_id) DO UPDATE SET last_observed_stock = EXCLUDED.last_observed_stock, updated_at = NOW()",
        )
        .bind(guild_id_i64)
        .bind(i64::try_from(stock).context("last_observed_stock out of i64 range")?),
    };

    query.execute(db.pool()).await?;

    invalidate_guild_config(db.cache(), guild_id).await;

    Ok(())
}
