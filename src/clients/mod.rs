// Price sources: synthetic or live exchange REST quotes

pub mod live;
pub mod simulated;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::TradingResult;
use crate::types::TradingPair;

pub use live::LivePriceSource;
pub use simulated::SimulatedPriceSource;

/// "Get the current price of `pair` on `exchange`"
///
/// A fetch either yields a positive finite price or fails; the engine skips
/// the tick on failure and never retries.
#[async_trait]
pub trait PriceSource: Send {
    fn name(&self) -> &str;

    async fn fetch(&mut self, exchange: &str, pair: &TradingPair) -> Result<f64, PriceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PriceError {
    #[error("Exchange {0} not supported")]
    UnsupportedExchange(String),

    #[error("Error fetching price from {exchange}: {reason}")]
    Network { exchange: String, reason: String },

    #[error("HTTP error from {exchange}: {status}")]
    HttpStatus { exchange: String, status: u16 },

    #[error("Malformed response from {exchange}: {reason}")]
    MalformedResponse { exchange: String, reason: String },

    #[error("Invalid price from {exchange}: {price}")]
    InvalidPrice { exchange: String, price: f64 },
}

/// Checks the "positive finite price" half of the fetch contract
pub fn ensure_valid_price(exchange: &str, price: f64) -> Result<f64, PriceError> {
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(PriceError::InvalidPrice {
            exchange: exchange.to_string(),
            price,
        })
    }
}

/// Pick the session's single price source from configuration
pub fn build_price_source(config: &Config) -> TradingResult<Box<dyn PriceSource>> {
    if config.session.simulate_data {
        Ok(Box::new(SimulatedPriceSource::from_config(config)))
    } else {
        Ok(Box::new(LivePriceSource::new(config.live.clone())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_valid_price() {
        assert_eq!(ensure_valid_price("Kraken", 2.5).unwrap(), 2.5);
        assert!(matches!(ensure_valid_price("Kraken", 0.0), Err(PriceError::InvalidPrice { .. })));
        assert!(ensure_valid_price("Kraken", f64::NAN).is_err());
        assert!(ensure_valid_price("Kraken", f64::INFINITY).is_err());
    }

    #[test]
    fn test_build_price_source_follows_simulate_flag() {
        let mut config = Config::default();
        config.session.simulate_data = true;
        assert_eq!(build_price_source(&config).unwrap().name(), "simulated");

        config.session.simulate_data = false;
        assert_eq!(build_price_source(&config).unwrap().name(), "live");
    }
}
