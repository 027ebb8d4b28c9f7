// Common test utilities and helpers
#![allow(dead_code)]

use async_trait::async_trait;
use spread_arbitrage_bot::{Config, DurationUnit, PriceError, PriceSource, TradingPair};
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a short, deterministic session configuration
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.session.initial_capital = 1000.0;
    config.session.arbitrage_threshold_percent = 0.5;
    config.session.session_duration = 5.0;
    config.session.duration_unit = DurationUnit::Seconds;
    config.session.exchange1 = "Binance".to_string();
    config.session.exchange2 = "Kraken".to_string();
    config.session.trading_pair = "XRP/USD".to_string();
    config.session.simulate_data = true;
    config.session.tick_interval_ms = 1000;
    config.session.seed = Some(42);
    config.logging.show_progress = false;
    config
}

/// Temporary directory plus CSV and log paths inside it
pub fn create_temp_session_files() -> (TempDir, PathBuf, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let data_file = temp_dir.path().join("out").join("trade_data.csv");
    let log_file = temp_dir.path().join("out").join("trade_log.txt");
    (temp_dir, data_file, log_file)
}

/// Replays fixed quotes, one `(price1, price2)` entry per tick.
/// `None` makes that fetch fail. The last entry repeats once the script runs out.
pub struct ScriptedPriceSource {
    exchange1: String,
    script: Vec<(Option<f64>, Option<f64>)>,
    cursor: usize,
}

impl ScriptedPriceSource {
    pub fn new(exchange1: &str, script: Vec<(Option<f64>, Option<f64>)>) -> Self {
        assert!(!script.is_empty(), "script needs at least one tick");
        Self {
            exchange1: exchange1.to_string(),
            script,
            cursor: 0,
        }
    }

    pub fn constant(exchange1: &str, price1: f64, price2: f64) -> Self {
        Self::new(exchange1, vec![(Some(price1), Some(price2))])
    }

    pub fn from_prices(exchange1: &str, prices: &[(f64, f64)]) -> Self {
        Self::new(exchange1, prices.iter().map(|&(p1, p2)| (Some(p1), Some(p2))).collect())
    }

    fn current(&self) -> (Option<f64>, Option<f64>) {
        self.script[self.cursor.min(self.script.len() - 1)]
    }
}

#[async_trait]
impl PriceSource for ScriptedPriceSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch(&mut self, exchange: &str, _pair: &TradingPair) -> Result<f64, PriceError> {
        let (price1, price2) = self.current();

        let quote = if exchange == self.exchange1 {
            price1
        } else {
            // Second fetch of the tick moves the script forward
            self.cursor += 1;
            price2
        };

        quote.ok_or_else(|| PriceError::Network {
            exchange: exchange.to_string(),
            reason: "scripted outage".to_string(),
        })
    }
}
