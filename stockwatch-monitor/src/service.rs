//! Monitoring passes over every configured guild.
//!
//! A pass scans the tenant store, fetches stock for each guild that has
//! both a country and an alert channel, re-baselines the guild and posts
//! an alert when the increase reaches the guild's threshold. Guilds are
//! independent: one guild failing never stops the rest of the pass.

use stockwatch_database::{ConfigField, GuildStockConfig, TenantStore};
use tracing::{debug, info, warn};

use crate::decision::decide;
use crate::error::{MonitorError, MonitorResult};
use crate::sink::{NotificationSink, StockAlert};
use crate::source::StockSource;

/// What happened to one guild during a pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TenantOutcome {
    /// No country or alert channel configured; nothing was fetched.
    Skipped,
    Checked { stock: u64, notified: bool },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub checked: usize,
    pub notified: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Clone, Debug)]
pub struct MonitorService<Source, Store, Sink> {
    source: Source,
    store: Store,
    sink: Sink,
}

impl<Source, Store, Sink> MonitorService<Source, Store, Sink>
where
    Source: StockSource,
    Store: TenantStore,
    Sink: NotificationSink,
{
    pub fn new(source: Source, store: Store, sink: Sink) -> Self {
        Self {
            source,
            store,
            sink,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Run one monitoring pass over every stored guild.
    ///
    /// Only a failure to list the guilds fails the pass as a whole.
    pub async fn run_pass(&self) -> MonitorResult<PassSummary> {
        let records = self
            .store
            .scan_all()
            .await
            .map_err(MonitorError::StoreUnavailable)?;

        let mut summary = PassSummary::default();
        for record in &records {
            match self.process_tenant(record).await {
                Ok(TenantOutcome::Skipped) => summary.skipped += 1,
                Ok(TenantOutcome::Checked { notified, .. }) => {
                    summary.checked += 1;
                    if notified {
                        summary.notified += 1;
                    }
                }
                Err(err) => {
                    summary.failed += 1;
                    warn!(guild_id = record.guild_id, %err, "monitoring failed for guild");
                }
            }
        }

        info!(
            guilds = records.len(),
            checked = summary.checked,
            notified = summary.notified,
            skipped = summary.skipped,
            failed = summary.failed,
            "monitoring pass finished"
        );

        Ok(summary)
    }

    /// Run the per-guild monitoring step for a single guild.
    pub async fn run_for_tenant(&self, guild_id: u64) -> MonitorResult<TenantOutcome> {
        let record = self
            .store
            .get(guild_id)
            .await
            .map_err(MonitorError::StoreUnavailable)?
            .unwrap_or_else(|| GuildStockConfig::new(guild_id));

        match self.process_tenant(&record).await? {
            TenantOutcome::Skipped => Err(MonitorError::ConfigurationMissing { guild_id }),
            outcome => Ok(outcome),
        }
    }

    async fn process_tenant(&self, record: &GuildStockConfig) -> MonitorResult<TenantOutcome> {
        let Some((country, channel_id)) = record.monitoring_target() else {
            debug!(guild_id = record.guild_id, "guild not configured; skipping");
            return Ok(TenantOutcome::Skipped);
        };

        let stock = self
            .source
            .get_stock(country)
            .await
            .map_err(MonitorError::SourceUnavailable)?;

        let decision = decide(record, stock);
        debug!(
            guild_id = record.guild_id,
            country,
            stock,
            delta = %decision.delta,
            should_notify = decision.should_notify,
            "stock observed"
        );

        // The baseline is recorded before alerting so a failed post never
        // causes the same alert again next pass.
        let persisted = self
            .store
            .put_field(record.guild_id, ConfigField::LastObservedStock(stock))
            .await
            .map_err(MonitorError::StoreUnavailable);
        if let Err(err) = &persisted {
            warn!(guild_id = record.guild_id, %err, "failed to record stock baseline");
        }

        if decision.should_notify {
            let alert = StockAlert {
                channel_id,
                stock,
                country: country.to_owned(),
            };
            self.sink
                .post(&alert)
                .await
                .map_err(MonitorError::SinkUnavailable)?;
            info!(guild_id = record.guild_id, channel_id, stock, country, "stock alert sent");
        }

        persisted?;

        Ok(TenantOutcome::Checked {
            stock,
            notified: decision.should_notify,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use stockwatch_database::{ConfigField, GuildStockConfig, MemoryTenantStore, TenantStore};

    use super::{MonitorService, PassSummary, TenantOutcome};
    use crate::error::MonitorError;
    use crate::sink::{NotificationSink, StockAlert};
    use crate::source::StockSource;

    #[derive(Clone, Default)]
    struct ScriptedSource {
        stock: HashMap<String, u64>,
        requested: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedSource {
        fn with(entries: &[(&str, u64)]) -> Self {
            Self {
                stock: entries
                    .iter()
                    .map(|(country, stock)| ((*country).to_owned(), *stock))
                    .collect(),
                requested: Arc::default(),
            }
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    impl StockSource for ScriptedSource {
        async fn get_stock(&self, country: &str) -> anyhow::Result<u64> {
            self.requested.lock().unwrap().push(country.to_owned());
            self.stock
                .get(country)
                .copied()
                .ok_or_else(|| anyhow::anyhow!("no stock data for {country}"))
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSink {
        failing_channel: Option<u64>,
        posted: Arc<Mutex<Vec<StockAlert>>>,
    }

    impl RecordingSink {
        fn failing_for(channel_id: u64) -> Self {
            Self {
                failing_channel: Some(channel_id),
                ..Self::default()
            }
        }

        fn posted(&self) -> Vec<StockAlert> {
            self.posted.lock().unwrap().clone()
        }
    }

    impl NotificationSink for RecordingSink {
        async fn post(&self, alert: &StockAlert) -> anyhow::Result<()> {
            self.posted.lock().unwrap().push(alert.clone());
            if self.failing_channel == Some(alert.channel_id) {
                anyhow::bail!("channel unreachable");
            }
            Ok(())
        }
    }

    /// Memory store whose writes fail for the listed guilds.
    #[derive(Clone, Default)]
    struct ReadOnlyGuilds {
        inner: MemoryTenantStore,
        read_only: Vec<u64>,
    }

    impl TenantStore for ReadOnlyGuilds {
        async fn get(&self, guild_id: u64) -> anyhow::Result<Option<GuildStockConfig>> {
            self.inner.get(guild_id).await
        }

        async fn scan_all(&self) -> anyhow::Result<Vec<GuildStockConfig>> {
            self.inner.scan_all().await
        }

        async fn put_field(&self, guild_id: u64, field: ConfigField) -> anyhow::Result<()> {
            if self.read_only.contains(&guild_id) {
                anyhow::bail!("write rejected for guild {guild_id}");
            }
            self.inner.put_field(guild_id, field).await
        }
    }

    fn configured(guild_id: u64, country: &str, last: Option<u64>) -> GuildStockConfig {
        GuildStockConfig {
            channel_id: Some(guild_id * 10),
            country: Some(country.to_owned()),
            last_observed_stock: last,
            ..GuildStockConfig::new(guild_id)
        }
    }

    #[tokio::test]
    async fn pass_alerts_and_rebaselines() {
        let store = MemoryTenantStore::new();
        store.insert(configured(1, "43", Some(10))).await;
        store.insert(configured(2, "16", Some(10))).await;

        let source = ScriptedSource::with(&[("43", 65), ("16", 40)]);
        let sink = RecordingSink::default();
        let service = MonitorService::new(source, store.clone(), sink.clone());

        let summary = service.run_pass().await.unwrap();
        assert_eq!(
            summary,
            PassSummary {
                checked: 2,
                notified: 1,
                skipped: 0,
                failed: 0,
            }
        );

        assert_eq!(
            sink.posted(),
            vec![StockAlert {
                channel_id: 10,
                stock: 65,
                country: "43".to_owned(),
            }]
        );
        let first = store.get(1).await.unwrap().unwrap();
        let second = store.get(2).await.unwrap().unwrap();
        assert_eq!(first.last_observed_stock, Some(65));
        assert_eq!(second.last_observed_stock, Some(40));
    }

    #[tokio::test]
    async fn unconfigured_guilds_never_reach_collaborators() {
        let store = MemoryTenantStore::new();
        store
            .insert(GuildStockConfig {
                country: Some("43".to_owned()),
                ..GuildStockConfig::new(1)
            })
            .await;
        store
            .insert(GuildStockConfig {
                channel_id: Some(5),
                ..GuildStockConfig::new(2)
            })
            .await;
        store.insert(GuildStockConfig::new(3)).await;

        let source = ScriptedSource::with(&[("43", 500)]);
        let sink = RecordingSink::default();
        let service = MonitorService::new(source.clone(), store.clone(), sink.clone());

        let summary = service.run_pass().await.unwrap();
        assert_eq!(summary.skipped, 3);
        assert_eq!(summary.checked, 0);
        assert!(source.requested().is_empty());
        assert!(sink.posted().is_empty());
        assert_eq!(store.get(1).await.unwrap().unwrap().last_observed_stock, None);
    }

    #[tokio::test]
    async fn source_failure_is_isolated_to_one_guild() {
        let store = MemoryTenantStore::new();
        store.insert(configured(1, "missing", Some(3))).await;
        store.insert(configured(2, "43", None)).await;

        let source = ScriptedSource::with(&[("43", 80)]);
        let sink = RecordingSink::default();
        let service = MonitorService::new(source, store.clone(), sink.clone());

        let summary = service.run_pass().await.unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.checked, 1);
        assert_eq!(summary.notified, 1);

        assert_eq!(store.get(1).await.unwrap().unwrap().last_observed_stock, Some(3));
        assert_eq!(store.get(2).await.unwrap().unwrap().last_observed_stock, Some(80));
    }

    #[tokio::test]
    async fn sink_failure_still_records_baseline() {
        let store = MemoryTenantStore::new();
        store.insert(configured(1, "43", None)).await;

        let source = ScriptedSource::with(&[("43", 90)]);
        let sink = RecordingSink::failing_for(10);
        let service = MonitorService::new(source, store.clone(), sink.clone());

        let summary = service.run_pass().await.unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(sink.posted().len(), 1);
        assert_eq!(store.get(1).await.unwrap().unwrap().last_observed_stock, Some(90));

        // Same level on the next pass: no second alert attempt.
        let summary = service.run_pass().await.unwrap();
        assert_eq!(summary.checked, 1);
        assert_eq!(summary.notified, 0);
        assert_eq!(sink.posted().len(), 1);
    }

    #[tokio::test]
    async fn single_guild_run_checks_only_that_guild() {
        let store = MemoryTenantStore::new();
        store.insert(configured(1, "43", None)).await;
        store.insert(configured(2, "16", None)).await;

        let source = ScriptedSource::with(&[("43", 12), ("16", 99)]);
        let sink = RecordingSink::default();
        let service = MonitorService::new(source.clone(), store.clone(), sink.clone());

        let outcome = service.run_for_tenant(1).await.unwrap();
        assert_eq!(
            outcome,
            TenantOutcome::Checked {
                stock: 12,
                notified: false,
            }
        );
        assert_eq!(source.requested(), vec!["43".to_owned()]);
        assert_eq!(store.get(2).await.unwrap().unwrap().last_observed_stock, None);
    }

    #[tokio::test]
    async fn single_guild_run_requires_configuration() {
        let service = MonitorService::new(
            ScriptedSource::default(),
            MemoryTenantStore::new(),
            RecordingSink::default(),
        );

        let result = service.run_for_tenant(77).await;
        assert!(matches!(
            result,
            Err(MonitorError::ConfigurationMissing { guild_id: 77 })
        ));
    }

    #[tokio::test]
    async fn failed_baseline_write_still_alerts_and_spares_other_guilds() {
        let inner = MemoryTenantStore::new();
        inner.insert(configured(1, "43", None)).await;
        inner.insert(configured(2, "43", None)).await;
        let store = ReadOnlyGuilds {
            inner: inner.clone(),
            read_only: vec![1],
        };

        let source = ScriptedSource::with(&[("43", 80)]);
        let sink = RecordingSink::default();
        let service = MonitorService::new(source, store, sink.clone());

        let summary = service.run_pass().await.unwrap();
        assert_eq!(
            summary,
            PassSummary {
                checked: 1,
                notified: 1,
                skipped: 0,
                failed: 1,
            }
        );
        let channels: Vec<u64> = sink.posted().iter().map(|alert| alert.channel_id).collect();
        assert_eq!(channels, vec![10, 20]);
        assert_eq!(inner.get(1).await.unwrap().unwrap().last_observed_stock, None);
        assert_eq!(inner.get(2).await.unwrap().unwrap().last_observed_stock, Some(80));

        // The unrecorded guild alerts again; the recorded one stays quiet.
        let summary = service.run_pass().await.unwrap();
        assert_eq!(summary.notified, 0);
        assert_eq!(summary.failed, 1);
        assert_eq!(sink.posted().len(), 3);
        assert_eq!(sink.posted()[2].channel_id, 10);
    }

    #[tokio::test]
    async fn sink_failure_is_isolated_to_one_guild() {
        let store = MemoryTenantStore::new();
        store.insert(configured(1, "43", None)).await;
        store.insert(configured(2, "43", None)).await;

        let source = ScriptedSource::with(&[("43", 80)]);
        let sink = RecordingSink::failing_for(10);
        let service = MonitorService::new(source, store.clone(), sink.clone());

        let summary = service.run_pass().await.unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.checked, 1);
        assert_eq!(summary.notified, 1);
        assert_eq!(sink.posted().len(), 2);
        assert_eq!(store.get(1).await.unwrap().unwrap().last_observed_stock, Some(80));
        assert_eq!(store.get(2).await.unwrap().unwrap().last_observed_stock, Some(80));
    }
}
