use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, migrate::Migrator};

use crate::cache::CacheService;

/// Embedded migrations for the guild configuration schema.
pub static MIGRATOR: Migrator = sqlx::migrate!();

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// PostgreSQL-backed tenant store handle, cheap to clone.
#[derive(Clone, Debug)]
pub struct Database {
    pool: PgPool,
    cache: CacheService,
}

impl Database {
    /// Open a pool against `database_url` with the cache disabled.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(DEFAULT_MAX_CONNECTIONS)
            .connect(database_url)
            .await
            .map_err(|e| anyhow::anyhow!("failed to connect to PostgreSQL: {e}"))?;

        Ok(Self {
            pool,
            cache: CacheService::disabled("stockwatch:prod"),
        })
    }

    /// Swap in a configured cache service.
    pub fn with_cache(self, cache: CacheService) -> Self {
        Self { cache, ..self }
    }

    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn cache(&self) -> &CacheService {
        &self.cache
    }
}
