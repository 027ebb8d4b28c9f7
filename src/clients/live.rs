// Live exchange REST quotes
//
// One GET per exchange per tick; each venue has its own symbol format and
// response shape.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::clients::{ensure_valid_price, PriceError, PriceSource};
use crate::config::LiveConfig;
use crate::error::{TradingError, TradingResult};
use crate::types::{Exchange, TradingPair};

#[derive(Debug)]
pub struct LivePriceSource {
    client: reqwest::Client,
    config: LiveConfig,
}

impl LivePriceSource {
    pub fn new(config: LiveConfig) -> TradingResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| TradingError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Full quote URL for a venue and pair
    pub fn quote_url(&self, exchange: Exchange, pair: &TradingPair) -> String {
        match exchange {
            Exchange::Binance => format!(
                "{}/api/v3/ticker/price?symbol={}",
                self.config.binance_url.trim_end_matches('/'),
                binance_symbol(pair)
            ),
            Exchange::Coinbase => format!(
                "{}/v2/prices/{}/spot",
                self.config.coinbase_url.trim_end_matches('/'),
                pair.dashed()
            ),
            Exchange::Kraken => format!(
                "{}/0/public/Ticker?pair={}",
                self.config.kraken_url.trim_end_matches('/'),
                pair.concatenated()
            ),
            Exchange::Bitfinex => format!(
                "{}/v2/ticker/t{}",
                self.config.bitfinex_url.trim_end_matches('/'),
                pair.concatenated()
            ),
        }
    }

    async fn get_json(&self, exchange: &str, url: &str) -> Result<Value, PriceError> {
        debug!("🌐 GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PriceError::Network {
                exchange: exchange.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(PriceError::HttpStatus {
                exchange: exchange.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.json().await.map_err(|e| PriceError::MalformedResponse {
            exchange: exchange.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl PriceSource for LivePriceSource {
    fn name(&self) -> &str {
        "live"
    }

    async fn fetch(&mut self, exchange: &str, pair: &TradingPair) -> Result<f64, PriceError> {
        let venue: Exchange = exchange.parse().map_err(PriceError::UnsupportedExchange)?;

        let url = self.quote_url(venue, pair);
        let body = self.get_json(exchange, &url).await?;

        let price = parse_quote(venue, &body).map_err(|reason| PriceError::MalformedResponse {
            exchange: exchange.to_string(),
            reason,
        })?;

        ensure_valid_price(exchange, price)
    }
}

/// Binance lists USD pairs against USDT
pub fn binance_symbol(pair: &TradingPair) -> String {
    let quote = if pair.quote == "USD" { "USDT" } else { pair.quote.as_str() };
    format!("{}{}", pair.base, quote)
}

/// Extract the last traded price from a venue's ticker response
pub fn parse_quote(exchange: Exchange, body: &Value) -> Result<f64, String> {
    match exchange {
        Exchange::Binance => number_field(&body["price"]).ok_or_else(|| "Missing price field".to_string()),

        Exchange::Coinbase => {
            number_field(&body["data"]["amount"]).ok_or_else(|| "Missing data.amount field".to_string())
        }

        Exchange::Kraken => {
            if let Some(errors) = body["error"].as_array() {
                if !errors.is_empty() {
                    return Err(format!("Kraken error: {:?}", errors));
                }
            }

            let ticker = body["result"]
                .as_object()
                .and_then(|result| result.values().next())
                .ok_or_else(|| "Missing result field".to_string())?;

            // "c" is [last trade price, lot volume]
            number_field(&ticker["c"][0]).ok_or_else(|| "Missing closing price".to_string())
        }

        Exchange::Bitfinex => {
            let fields = body.as_array().ok_or_else(|| "Expected ticker array".to_string())?;
            fields
                .get(6)
                .and_then(number_field)
                .ok_or_else(|| "Missing last price at index 6".to_string())
        }
    }
}

// Exchanges disagree on whether prices are JSON strings or numbers
fn number_field(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    }
}
