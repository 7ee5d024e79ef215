use std::future::Future;
use std::sync::Arc;

use serenity::all::{ChannelId, CreateEmbed, CreateEmbedFooter, CreateMessage, Http};

pub const ALERT_EMBED_COLOR: u32 = 0x00_ff_00;
pub const PROVIDER_NAME: &str = "SMS-Activate";
pub const ALERT_THUMBNAIL_URL: &str = "https://i.imgur.com/voizd7u.jpeg";
pub const ALERT_FOOTER: &str = "Stay ahead! Monitor by Jaafar";

/// One stock alert addressed to a guild's alert channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StockAlert {
    pub channel_id: u64,
    pub stock: u64,
    pub country: String,
}

pub trait NotificationSink: Send + Sync {
    fn post(&self, alert: &StockAlert) -> impl Future<Output = anyhow::Result<()>> + Send;
}

/// Delivers alerts as channel messages through the Discord REST API.
#[derive(Clone)]
pub struct DiscordNotifier {
    http: Arc<Http>,
}

impl std::fmt::Debug for DiscordNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordNotifier").finish_non_exhaustive()
    }
}

impl DiscordNotifier {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    /// Build a notifier with its own REST client for `token`.
    pub fn from_token(token: &str) -> Self {
        Self::new(Arc::new(Http::new(token)))
    }
}

impl NotificationSink for DiscordNotifier {
    async fn post(&self, alert: &StockAlert) -> anyhow::Result<()> {
        ChannelId::new(alert.channel_id)
            .send_message(self.http.as_ref(), alert_message(alert))
            .await
            .map_err(|e| {
                anyhow::anyhow!("failed to post alert to channel {}: {e}", alert.channel_id)
            })?;

        Ok(())
    }
}

pub fn alert_message(alert: &StockAlert) -> CreateMessage {
    CreateMessage::new()
        .content(alert_content(alert.stock))
        .embed(alert_embed(alert))
}

pub fn alert_content(stock: u64) -> String {
    format!("📢 GMX Numbers Available! Stock: **{stock}**")
}

pub fn alert_embed(alert: &StockAlert) -> CreateEmbed {
    CreateEmbed::new()
        .color(ALERT_EMBED_COLOR)
        .field("📦 Stock", alert.stock.to_string(), true)
        .field("🌍 Country", alert.country.clone(), true)
        .field("💻 Provider", PROVIDER_NAME, false)
        .thumbnail(ALERT_THUMBNAIL_URL)
        .footer(CreateEmbedFooter::new(ALERT_FOOTER))
}
