use serde::{Deserialize, Serialize};

/// Stock increase required before an alert fires when a guild never set one.
pub const DEFAULT_THRESHOLD: u64 = 50;

/// Per-guild monitoring configuration.
///
/// Unset numeric fields are not errors: use the `effective_*` accessors,
/// which apply the documented defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildStockConfig {
    pub guild_id: u64,
    pub channel_id: Option<u64>,
    pub country: Option<String>,
    pub last_observed_stock: Option<u64>,
    pub threshold: Option<u64>,
}

impl GuildStockConfig {
    /// An unconfigured record for a guild seen for the first time.
    pub fn new(guild_id: u64) -> Self {
        Self {
            guild_id,
            channel_id: None,
            country: None,
            last_observed_stock: None,
            threshold: None,
        }
    }

    pub fn effective_threshold(&self) -> u64 {
        self.threshold.unwrap_or(DEFAULT_THRESHOLD)
    }

    pub fn effective_last_observed_stock(&self) -> u64 {
        self.last_observed_stock.unwrap_or(0)
    }

    /// Country and alert channel, or `None` while the record is still inert.
    pub fn monitoring_target(&self) -> Option<(&str, u64)> {
        let country = self
            .country
            .as_deref()
            .map(str::trim)
            .filter(|country| !country.is_empty())?;
        let channel_id = self.channel_id?;
        Some((country, channel_id))
    }

    /// Apply a single-field update in place, leaving every other field alone.
    pub fn apply(&mut self, field: ConfigField) {
        match field {
            ConfigField::Country(country) => self.country = Some(country),
            ConfigField::ChannelId(channel_id) => self.channel_id = Some(channel_id),
            ConfigField::Threshold(threshold) => self.threshold = Some(threshold),
            ConfigField::LastObservedStock(stock) => self.last_observed_stock = Some(stock),
        }
    }
}

/// A single writable column of [`GuildStockConfig`] together with its new value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigField {
    Country(String),
    ChannelId(u64),
    Threshold(u64),
    LastObservedStock(u64),
}

impl ConfigField {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Country(_) => "country",
            Self::ChannelId(_) => "channel_id",
            Self::Threshold(_) => "threshold",
            Self::LastObservedStock(_) => "last_observed_stock",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigField, DEFAULT_THRESHOLD, GuildStockConfig};

    #[test]
    fn unset_fields_fall_back_to_defaults() {
        let config = GuildStockConfig::new(1);
        assert_eq!(config.effective_threshold(), DEFAULT_THRESHOLD);
        assert_eq!(config.effective_last_observed_stock(), 0);
    }

    #[test]
    fn stored_values_win_over_defaults() {
        let config = GuildStockConfig {
            last_observed_stock: Some(12),
            threshold: Some(0),
            ..GuildStockConfig::new(1)
        };
        assert_eq!(config.effective_threshold(), 0);
        assert_eq!(config.effective_last_observed_stock(), 12);
    }

    #[test]
    fn target_requires_country_and_channel() {
        let mut config = GuildStockConfig::new(1);
        assert_eq!(config.monitoring_target(), None);

        config.apply(ConfigField::Country("43".to_owned()));
        assert_eq!(config.monitoring_target(), None);

        config.apply(ConfigField::ChannelId(99));
        assert_eq!(config.monitoring_target(), Some(("43", 99)));

        config.country = Some("   ".to_owned());
        assert_eq!(config.monitoring_target(), None);
    }

    #[test]
    fn apply_touches_only_one_field() {
        let mut config = GuildStockConfig {
            channel_id: Some(5),
            country: Some("germany".to_owned()),
            last_observed_stock: Some(30),
            threshold: Some(10),
            ..GuildStockConfig::new(7)
        };

        config.apply(ConfigField::Threshold(75));

        assert_eq!(config.threshold, Some(75));
        assert_eq!(config.channel_id, Some(5));
        assert_eq!(config.country.as_deref(), Some("germany"));
        assert_eq!(config.last_observed_stock, Some(30));
    }
}
