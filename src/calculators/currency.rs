//! Currency conversion over a rates snapshot
//!
//! Rates are quoted against the snapshot's base currency; conversions pivot
//! through that base. Live snapshots come from public endpoints tried in
//! order, with no retries beyond moving to the next endpoint.

use crate::error::{Result, ToolsError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// (code, display name)
pub const SUPPORTED_CURRENCIES: [(&str, &str); 10] = [
    ("USD", "US Dollar"),
    ("EUR", "Euro"),
    ("GBP", "British Pound"),
    ("KES", "Kenyan Shilling"),
    ("RWF", "Rwandan Franc"),
    ("CNY", "Chinese Yuan"),
    ("CAD", "Canadian Dollar"),
    ("AUD", "Australian Dollar"),
    ("CHF", "Swiss Franc"),
    ("INR", "Indian Rupee"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRates {
    pub base: String,
    /// Publication date as reported by the source
    pub date: String,
    pub rates: HashMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub converted_amount: f64,
    /// Units of `to` per unit of `from`
    pub rate: f64,
    pub inverse_rate: f64,
    pub last_updated: String,
}

/// Raw payload shared by both rate sources
#[derive(Debug, Deserialize)]
struct RatesPayload {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    base: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    rates: Option<HashMap<String, f64>>,
}

impl ExchangeRates {
    /// Load a snapshot saved in the API response shape
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let payload: RatesPayload = serde_json::from_reader(BufReader::new(file))?;
        Self::from_payload(payload, "USD")
    }

    fn from_payload(payload: RatesPayload, requested_base: &str) -> Result<Self> {
        if payload.success == Some(false) {
            return Err(ToolsError::Upstream("API returned unsuccessful response".to_string()));
        }
        let mut rates = payload
            .rates
            .ok_or_else(|| ToolsError::Upstream("Invalid API response format: rates not found".to_string()))?;

        let base = payload.base.unwrap_or_else(|| requested_base.to_string());
        rates.entry(base.clone()).or_insert(1.0);

        Ok(Self {
            base,
            date: payload
                .date
                .unwrap_or_else(|| chrono::Utc::now().date_naive().to_string()),
            rates,
        })
    }

    /// Units of `code` per unit of the base currency
    fn rate_of(&self, code: &str) -> Result<f64> {
        if code == self.base {
            return Ok(1.0);
        }
        self.rates
            .get(code)
            .copied()
            .filter(|r| *r > 0.0 && r.is_finite())
            .ok_or_else(|| ToolsError::RateUnavailable(code.to_string()))
    }
}

/// Trim and upper-case an ISO 4217 style code; anything but three ASCII letters is rejected
pub fn normalize_currency_code(field: &'static str, code: &str) -> Result<String> {
    let code = code.trim();
    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(ToolsError::invalid(field, "Currency code must be three letters"));
    }
    Ok(code.to_ascii_uppercase())
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

pub fn convert_currency(amount: f64, from: &str, to: &str, rates: &ExchangeRates) -> Result<ConversionResult> {
    let from = normalize_currency_code("from", from)?;
    let to = normalize_currency_code("to", to)?;

    if from == to {
        return Ok(ConversionResult {
            converted_amount: amount,
            rate: 1.0,
            inverse_rate: 1.0,
            last_updated: rates.date.clone(),
        });
    }

    let from_rate = rates.rate_of(&from)?;
    let to_rate = rates.rate_of(&to)?;
    let rate = to_rate / from_rate;

    Ok(ConversionResult {
        converted_amount: round4(amount / from_rate * to_rate),
        rate: round4(rate),
        inverse_rate: round4(1.0 / rate),
        last_updated: rates.date.clone(),
    })
}

/// Fetch a live snapshot, trying each endpoint template in order
///
/// `{base}` in a template is replaced by the base currency code.
pub async fn fetch_exchange_rates(
    client: &reqwest::Client,
    endpoints: &[String],
    base: &str,
) -> Result<ExchangeRates> {
    let base = normalize_currency_code("from", base)?;
    let mut last_error = ToolsError::Upstream("No exchange rate endpoints configured".to_string());

    for template in endpoints {
        let url = template.replace("{base}", &base);
        match fetch_one(client, &url, &base).await {
            Ok(rates) => {
                log::debug!("Loaded {} rates from {}", rates.rates.len(), url);
                return Ok(rates);
            }
            Err(e) => {
                log::warn!("Exchange rate source {} failed: {}", url, e);
                last_error = e;
            }
        }
    }

    Err(last_error)
}

async fn fetch_one(client: &reqwest::Client, url: &str, base: &str) -> Result<ExchangeRates> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(ToolsError::Upstream(format!(
            "Failed to fetch exchange rates: {}",
            response.status()
        )));
    }
    let payload: RatesPayload = response.json().await?;
    ExchangeRates::from_payload(payload, base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ExchangeRates {
        let payload: RatesPayload = serde_json::from_str(
            r#"{ "base": "USD", "date": "2025-03-01",
                 "rates": { "EUR": 0.9, "GBP": 0.8, "KES": 129.5, "BAD": 0 } }"#,
        )
        .unwrap();
        ExchangeRates::from_payload(payload, "USD").unwrap()
    }

    #[test]
    fn test_from_base() {
        let result = convert_currency(100.0, "USD", "EUR", &snapshot()).unwrap();
        assert_eq!(result.converted_amount, 90.0);
        assert_eq!(result.rate, 0.9);
        assert_eq!(result.inverse_rate, 1.1111);
        assert_eq!(result.last_updated, "2025-03-01");
    }

    #[test]
    fn test_cross_rate() {
        let result = convert_currency(90.0, "eur", "GBP", &snapshot()).unwrap();
        assert_eq!(result.converted_amount, 80.0);
        assert_eq!(result.rate, 0.8889);
    }

    #[test]
    fn test_to_base() {
        let result = convert_currency(259.0, "KES", "USD", &snapshot()).unwrap();
        assert_eq!(result.converted_amount, 2.0);
    }

    #[test]
    fn test_same_currency() {
        let result = convert_currency(42.0, "CHF", "CHF", &snapshot()).unwrap();
        assert_eq!(result.converted_amount, 42.0);
        assert_eq!(result.rate, 1.0);
    }

    #[test]
    fn test_missing_or_zero_rate() {
        assert!(matches!(
            convert_currency(1.0, "USD", "JPY", &snapshot()),
            Err(ToolsError::RateUnavailable(code)) if code == "JPY"
        ));
        assert!(convert_currency(1.0, "BAD", "USD", &snapshot()).is_err());
    }

    #[test]
    fn test_currency_code_shape() {
        assert_eq!(normalize_currency_code("from", " kes ").unwrap(), "KES");
        for bad in ["", "US", "USDT", "U$D", "../", "USD/../x?y", "ÉUR"] {
            let err = normalize_currency_code("from", bad).unwrap_err();
            assert!(matches!(err, ToolsError::InvalidInput { field: "from", .. }), "{}", bad);
        }
        assert!(matches!(
            convert_currency(1.0, "USD", "EU R", &snapshot()),
            Err(ToolsError::InvalidInput { field: "to", .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_rejects_malformed_base_before_any_request() {
        // Unroutable endpoint: reaching the network would surface as an upstream error
        let endpoints = vec!["http://127.0.0.1:9/{base}".to_string()];
        let err = fetch_exchange_rates(&reqwest::Client::new(), &endpoints, "USD/../x?y")
            .await
            .unwrap_err();
        assert!(matches!(err, ToolsError::InvalidInput { field: "from", .. }));
    }

    #[test]
    fn test_payload_handling() {
        let payload: RatesPayload = serde_json::from_str(r#"{ "success": false }"#).unwrap();
        assert!(ExchangeRates::from_payload(payload, "USD").is_err());

        let payload: RatesPayload = serde_json::from_str(r#"{ "rates": { "EUR": 0.9 } }"#).unwrap();
        let rates = ExchangeRates::from_payload(payload, "USD").unwrap();
        assert_eq!(rates.base, "USD");
        assert_eq!(rates.rates["USD"], 1.0);
    }
}
