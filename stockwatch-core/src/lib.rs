use stockwatch_database::Database;
use stockwatch_monitor::{DiscordNotifier, MonitorService, SmsActivateClient};

pub type Error = anyhow::Error;

/// Monitoring service wired to the production collaborators.
pub type StockMonitor = MonitorService<SmsActivateClient, Database, DiscordNotifier>;

#[derive(Clone, Debug)]
pub struct Data {
    pub db: Database,
    pub monitor: StockMonitor,
}

pub type Context<'a> = poise::Context<'a, Data, Error>;
