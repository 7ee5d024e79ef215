use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::database::Database;
use crate::impls::guild_config::{get_guild_config, list_guild_configs, set_guild_config_field};
use crate::model::guild_config::{ConfigField, GuildStockConfig};

/// Keyed storage for per-guild configuration records.
///
/// `put_field` is an upsert of a single column: it creates the record when
/// the guild is unseen and never touches the other fields.
pub trait TenantStore: Send + Sync {
    fn get(
        &self,
        guild_id: u64,
    ) -> impl Future<Output = anyhow::Result<Option<GuildStockConfig>>> + Send;

    fn scan_all(&self) -> impl Future<Output = anyhow::Result<Vec<GuildStockConfig>>> + Send;

    fn put_field(
        &self,
        guild_id: u64,
        field: ConfigField,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

impl TenantStore for Database {
    async fn get(&self, guild_id: u64) -> anyhow::Result<Option<GuildStockConfig>> {
        get_guild_config(self, guild_id).await
    }

    async fn scan_all(&self) -> anyhow::Result<Vec<GuildStockConfig>> {
        list_guild_configs(self).await
    }

    async fn put_field(&self, guild_id: u64, field: ConfigField) -> anyhow::Result<()> {
        set_guild_config_field(self, guild_id, field).await
    }
}

/// Process-local store, used for local runs and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryTenantStore {
    records: Arc<RwLock<BTreeMap<u64, GuildStockConfig>>>,
}

impl MemoryTenantStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, record: GuildStockConfig) {
        self.records.write().await.insert(record.guild_id, record);
    }
}

impl TenantStore for MemoryTenantStore {
    async fn get(&self, guild_id: u64) -> anyhow::Result<Option<GuildStockConfig>> {
        Ok(self.records.read().await.get(&guild_id).cloned())
    }

    async fn scan_all(&self) -> anyhow::Result<Vec<GuildStockConfig>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn put_field(&self, guild_id: u64, field: ConfigField) -> anyhow::Result<()> {
        self.records
            .write()
            .await
            .entry(guild_id)
            .or_insert_with(|| GuildStockConfig::new(guild_id))
            .apply(field);
        Ok(())
    }
}
