use stockwatch_database::GuildStockConfig;

/// Result of comparing a fresh stock observation against a guild's baseline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    pub should_notify: bool,
    /// Observed stock minus the previous baseline; negative when stock dropped.
    pub delta: i128,
    /// The input record re-baselined to the observed stock.
    pub record: GuildStockConfig,
}

/// Decide whether `observed_stock` warrants an alert for `record`.
///
/// The returned record always carries `observed_stock` as its new baseline,
/// whether or not an alert fires, so an elevated level alerts only once.
pub fn decide(record: &GuildStockConfig, observed_stock: u64) -> Decision {
    let delta = i128::from(observed_stock) - i128::from(record.effective_last_observed_stock());
    let should_notify = delta >= i128::from(record.effective_threshold());

    let mut record = record.clone();
    record.last_observed_stock = Some(observed_stock);

    Decision {
        should_notify,
        delta,
        record,
    }
}

#[cfg(test)]
mod tests {
    use stockwatch_database::GuildStockConfig;

    use super::decide;

    fn record(last_observed_stock: Option<u64>, threshold: Option<u64>) -> GuildStockConfig {
        GuildStockConfig {
            channel_id: Some(1),
            country: Some("43".to_owned()),
            last_observed_stock,
            threshold,
            ..GuildStockConfig::new(100)
        }
    }

    #[test]
    fn below_threshold_rebaselines_without_alert() {
        let decision = decide(&record(Some(10), Some(50)), 40);
        assert!(!decision.should_notify);
        assert_eq!(decision.delta, 30);
        assert_eq!(decision.record.last_observed_stock, Some(40));
    }

    #[test]
    fn increase_past_threshold_alerts() {
        let decision = decide(&record(Some(10), Some(50)), 65);
        assert!(decision.should_notify);
        assert_eq!(decision.delta, 55);
        assert_eq!(decision.record.last_observed_stock, Some(65));
    }

    #[test]
    fn delta_equal_to_threshold_alerts() {
        let decision = decide(&record(Some(0), Some(50)), 50);
        assert!(decision.should_notify);

        let decision = decide(&record(Some(0), Some(50)), 49);
        assert!(!decision.should_notify);
    }

    #[test]
    fn unset_fields_behave_like_defaults() {
        for observed in [0, 49, 50, 51, 500] {
            assert_eq!(
                decide(&record(None, None), observed).should_notify,
                decide(&record(Some(0), Some(50)), observed).should_notify,
                "observed {observed}"
            );
        }
    }

    #[test]
    fn decreases_never_alert() {
        let decision = decide(&record(Some(200), Some(0)), 150);
        assert!(!decision.should_notify);
        assert_eq!(decision.delta, -50);
        assert_eq!(decision.record.last_observed_stock, Some(150));
    }

    #[test]
    fn zero_stock_is_not_an_error() {
        let decision = decide(&record(None, None), 0);
        assert!(!decision.should_notify);
        assert_eq!(decision.record.last_observed_stock, Some(0));
    }

    #[test]
    fn same_level_does_not_alert_twice() {
        let first = decide(&record(Some(0), Some(50)), 80);
        assert!(first.should_notify);

        let second = decide(&first.record, 80);
        assert!(!second.should_notify);
    }

    #[test]
    fn baseline_always_follows_observation() {
        for (last, threshold, observed) in [(0, 50, 0), (10, 5, 3), (7, 0, 7), (u64::MAX, 50, 0)] {
            let decision = decide(&record(Some(last), Some(threshold)), observed);
            assert_eq!(decision.record.last_observed_stock, Some(observed));
            assert_eq!(decision.record.guild_id, 100);
            assert_eq!(decision.record.threshold, Some(threshold));
        }
    }
}
