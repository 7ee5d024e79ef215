//! Optional Redis read-through cache in front of PostgreSQL.
//!
//! The cache only ever holds copies of rows; every write goes to the
//! database first and then drops the cached copy.

mod redis_store;

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use redis_store::RedisCacheStore;

pub const CONFIG_CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Clone, Debug)]
enum CacheBackend {
    Disabled,
    Redis(RedisCacheStore),
}

#[derive(Clone, Debug)]
pub struct CacheService {
    key_prefix: String,
    backend: CacheBackend,
}

impl CacheService {
    pub fn disabled(prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: prefix.into(),
            backend: CacheBackend::Disabled,
        }
    }

    pub fn redis(redis_url: &str, prefix: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            key_prefix: prefix.into(),
            backend: CacheBackend::Redis(RedisCacheStore::from_url(redis_url)?),
        })
    }

    pub fn is_redis_enabled(&self) -> bool {
        matches!(self.backend, CacheBackend::Redis(_))
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        match &self.backend {
            CacheBackend::Disabled => Ok(()),
            CacheBackend::Redis(store) => store.ping().await,
        }
    }

    pub fn key(&self, suffix: impl AsRef<str>) -> String {
        format!("{}:{}", self.key_prefix, suffix.as_ref())
    }

    pub async fn get_json<T>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let CacheBackend::Redis(store) = &self.backend else {
            return Ok(None);
        };

        let Some(bytes) = store.get(key).await? else {
            return Ok(None);
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| anyhow::anyhow!("failed to deserialize cache value for `{key}`: {e}"))
    }

    pub async fn set_json<T>(&self, key: &str, value: &T, ttl: Duration) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        let CacheBackend::Redis(store) = &self.backend else {
            return Ok(());
        };

        let payload = serde_json::to_vec(value)
            .map_err(|e| anyhow::anyhow!("failed to serialize cache value for `{key}`: {e}"))?;
        store.set(key, payload, ttl.as_secs().max(1)).await
    }

    pub async fn del(&self, key: &str) -> anyhow::Result<()> {
        match &self.backend {
            CacheBackend::Disabled => Ok(()),
            CacheBackend::Redis(store) => store.del(key).await,
        }
    }

    /// Return the cached value for `key`, or run `loader` and cache its result.
    ///
    /// Cache failures are logged and fall through to `loader`; only loader
    /// errors are returned.
    pub async fn get_or_load_json<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        loader: F,
    ) -> anyhow::Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        match self.get_json::<T>(key).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => warn!(?e, cache_key = key, "cache get failed; falling back to database"),
        }

        let loaded = loader().await?;

        if let Err(e) = self.set_json(key, &loaded, ttl).await {
            warn!(?e, cache_key = key, "cache set failed; returning database value");
        }

        Ok(loaded)
    }
}

pub fn guild_config_key(cache: &CacheService, guild_id: u64) -> String {
    cache.key(format!("guild_stock_config:{guild_id}"))
}

/// Drop the cached copy of a guild's record after a write.
///
/// The database already holds the new value, so a failed delete is logged
/// and the stale copy lives out its TTL.
pub async fn invalidate_guild_config(cache: &CacheService, guild_id: u64) {
    let key = guild_config_key(cache, guild_id);
    if let Err(e) = cache.del(&key).await {
        warn!(?e, cache_key = %key, guild_id, "cache invalidation failed after write");
    }
}
