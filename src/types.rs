// Common types used across the application

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A `BASE/QUOTE` trading pair such as `XRP/USD`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradingPair {
    pub base: String,
    pub quote: String,
}

impl TradingPair {
    pub fn new(base: &str, quote: &str) -> Self {
        Self {
            base: base.to_uppercase(),
            quote: quote.to_uppercase(),
        }
    }

    /// Concatenated symbol, e.g. `XRPUSD`
    pub fn concatenated(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }

    /// Dash separated symbol, e.g. `XRP-USD`
    pub fn dashed(&self) -> String {
        format!("{}-{}", self.base, self.quote)
    }
}

impl FromStr for TradingPair {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(base), Some(quote), None) if !base.trim().is_empty() && !quote.trim().is_empty() => {
                Ok(TradingPair::new(base.trim(), quote.trim()))
            }
            _ => Err(format!("trading pair '{}' must look like BASE/QUOTE", s)),
        }
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// Exchanges with a live REST quote adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exchange {
    Binance,
    Coinbase,
    Kraken,
    Bitfinex,
}

impl FromStr for Exchange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "binance" => Ok(Exchange::Binance),
            "coinbase" => Ok(Exchange::Coinbase),
            "kraken" => Ok(Exchange::Kraken),
            "bitfinex" => Ok(Exchange::Bitfinex),
            _ => Err(s.to_string()),
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Exchange::Binance => "Binance",
            Exchange::Coinbase => "Coinbase",
            Exchange::Kraken => "Kraken",
            Exchange::Bitfinex => "Bitfinex",
        };
        write!(f, "{}", name)
    }
}

/// Which side of the session an exchange sits on; selects the simulator profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeRole {
    Primary,   // exchange1
    Secondary, // exchange2
}

/// Key of one simulated price stream
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PriceKey {
    pub exchange: String,
    pub pair: TradingPair,
}

impl PriceKey {
    pub fn new(exchange: &str, pair: &TradingPair) -> Self {
        Self {
            exchange: exchange.to_string(),
            pair: pair.clone(),
        }
    }
}

impl fmt::Display for PriceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.exchange, self.pair)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "BUY"),
            TradeSide::Sell => write!(f, "SELL"),
        }
    }
}

/// One loop iteration that obtained both prices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    pub elapsed_seconds: f64,
    pub price1: f64,
    pub price2: f64,
    pub trade_executed: bool,
    pub cumulative_profit_at_tick: f64,
}

/// One simulated buy/sell arbitrage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub elapsed_seconds: f64,
    pub buy_exchange: String,
    pub sell_exchange: String,
    pub buy_price: f64,
    pub sell_price: f64,
    pub units: f64,
    pub profit: f64,
    pub capital_after: f64,
    pub price_diff: f64,
    pub percent_diff: f64,
}

impl TradeRecord {
    /// Report line used in the session log and summary
    pub fn describe(&self) -> String {
        format!(
            "[Time: {:.1}s] ARBITRAGE OPPORTUNITY: {}(${:.4}) -> {}(${:.4}), Diff: ${:.4} ({:.2}%), Units: {:.4}, Profit: ${:.2}, Capital: ${:.2}",
            self.elapsed_seconds,
            self.buy_exchange,
            self.buy_price,
            self.sell_exchange,
            self.sell_price,
            self.price_diff,
            self.percent_diff,
            self.units,
            self.profit,
            self.capital_after
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trading_pair_parsing() {
        let pair: TradingPair = "xrp/usd".parse().unwrap();
        assert_eq!(pair.base, "XRP");
        assert_eq!(pair.quote, "USD");
        assert_eq!(pair.to_string(), "XRP/USD");
        assert_eq!(pair.concatenated(), "XRPUSD");
        assert_eq!(pair.dashed(), "XRP-USD");
    }

    #[test]
    fn test_trading_pair_rejects_malformed() {
        assert!("XRPUSD".parse::<TradingPair>().is_err());
        assert!("XRP/".parse::<TradingPair>().is_err());
        assert!("A/B/C".parse::<TradingPair>().is_err());
    }

    #[test]
    fn test_exchange_parsing_is_case_insensitive() {
        assert_eq!("binance".parse::<Exchange>(), Ok(Exchange::Binance));
        assert_eq!("Kraken".parse::<Exchange>(), Ok(Exchange::Kraken));
        assert_eq!("Gemini".parse::<Exchange>(), Err("Gemini".to_string()));
    }

    #[test]
    fn test_price_key_display() {
        let key = PriceKey::new("Binance", &TradingPair::new("XRP", "USD"));
        assert_eq!(key.to_string(), "Binance_XRP/USD");
    }
}
