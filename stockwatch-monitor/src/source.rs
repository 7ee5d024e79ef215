use std::env;
use std::future::Future;

use anyhow::Context as _;
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "https://api.sms-activate.org/stubs/handler_api.php";
/// SMS-Activate service code for GMX numbers.
pub const DEFAULT_SERVICE: &str = "abk";

/// Anything that can report how many numbers are available in a country.
pub trait StockSource: Send + Sync {
    fn get_stock(&self, country: &str) -> impl Future<Output = anyhow::Result<u64>> + Send;
}

/// Client for the SMS-Activate `getNumbersStatus` endpoint.
#[derive(Clone)]
pub struct SmsActivateClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    service: String,
}

impl std::fmt::Debug for SmsActivateClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsActivateClient")
            .field("base_url", &self.base_url)
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

impl SmsActivateClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: api_key.into(),
            service: DEFAULT_SERVICE.to_owned(),
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = env::var("SMS_ACTIVATE_API_KEY")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .context("SMS_ACTIVATE_API_KEY is required")?;
        let base_url = env::var("SMS_ACTIVATE_BASE_URL")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let service = env::var("SMS_ACTIVATE_SERVICE")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVICE.to_owned());

        Ok(Self {
            base_url,
            service,
            ..Self::new(api_key)
        })
    }

    pub fn service(&self) -> &str {
        &self.service
    }
}

impl StockSource for SmsActivateClient {
    async fn get_stock(&self, country: &str) -> anyhow::Result<u64> {
        // Request URLs carry the API key; errors are reported without them.
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("action", "getNumbersStatus"),
                ("country", country),
            ])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| anyhow::anyhow!("SMS-Activate request failed: {}", e.without_url()))?;

        let body = response.text().await.map_err(|e| {
            anyhow::anyhow!("failed to read SMS-Activate response: {}", e.without_url())
        })?;

        parse_numbers_status(&body, &self.service)
    }
}

/// Extract the stock count for `service` from a `getNumbersStatus` body.
///
/// Errors come back as bare tokens such as `BAD_KEY` rather than JSON.
/// A service missing from the object has no stock.
pub fn parse_numbers_status(body: &str, service: &str) -> anyhow::Result<u64> {
    let payload: Value = serde_json::from_str(body.trim()).map_err(|_| {
        anyhow::anyhow!("unexpected SMS-Activate response: `{}`", body.trim())
    })?;

    let Some(object) = payload.as_object() else {
        anyhow::bail!("SMS-Activate response is not an object");
    };

    match object.get(service) {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(number)) => number
            .as_u64()
            .with_context(|| format!("stock for `{service}` is not a non-negative integer")),
        Some(Value::String(raw)) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("stock for `{service}` is not a number: `{raw}`")),
        Some(other) => anyhow::bail!("unexpected stock value for `{service}`: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_numbers_status;

    #[test]
    fn reads_string_and_numeric_counts() {
        assert_eq!(
            parse_numbers_status(r#"{"abk": "137", "vk": "4"}"#, "abk").unwrap(),
            137
        );
        assert_eq!(parse_numbers_status(r#"{"abk": 12}"#, "abk").unwrap(), 12);
    }

    #[test]
    fn missing_service_means_no_stock() {
        assert_eq!(parse_numbers_status(r#"{"vk": "4"}"#, "abk").unwrap(), 0);
        assert_eq!(parse_numbers_status(r#"{"abk": null}"#, "abk").unwrap(), 0);
    }

    #[test]
    fn error_tokens_are_rejected() {
        let err = parse_numbers_status("BAD_KEY", "abk").unwrap_err();
        assert!(err.to_string().contains("BAD_KEY"));
    }

    #[test]
    fn malformed_counts_are_rejected() {
        assert!(parse_numbers_status(r#"{"abk": "-3"}"#, "abk").is_err());
        assert!(parse_numbers_status(r#"{"abk": 1.5}"#, "abk").is_err());
        assert!(parse_numbers_status(r#"["abk"]"#, "abk").is_err());
    }
}
