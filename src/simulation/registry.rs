// Session-owned registry of simulated price streams

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;

use crate::config::SimulatorConfig;
use crate::simulation::price_simulator::ShortTermPriceSimulator;
use crate::types::{ExchangeRole, PriceKey, TradingPair};

/// Owns every simulator of one session, keyed by `(exchange, pair)`, plus the
/// last price each one published so the sibling exchange can diverge from it.
pub struct SimulatorRegistry {
    config: SimulatorConfig,
    exchange1: String,
    exchange2: String,
    simulators: HashMap<PriceKey, ShortTermPriceSimulator>,
    last_prices: HashMap<PriceKey, f64>,
    rng: StdRng,
}

impl SimulatorRegistry {
    pub fn new(config: SimulatorConfig, exchange1: &str, exchange2: &str, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config,
            exchange1: exchange1.to_string(),
            exchange2: exchange2.to_string(),
            simulators: HashMap::new(),
            last_prices: HashMap::new(),
            rng,
        }
    }

    fn role_of(&self, exchange: &str) -> ExchangeRole {
        if exchange == self.exchange1 {
            ExchangeRole::Primary
        } else {
            ExchangeRole::Secondary
        }
    }

    fn sibling_of(&self, exchange: &str) -> &str {
        if exchange == self.exchange1 {
            &self.exchange2
        } else {
            &self.exchange1
        }
    }

    /// Advance the stream for `(exchange, pair)`, creating it on first use
    pub fn next_price(&mut self, exchange: &str, pair: &TradingPair) -> f64 {
        let key = PriceKey::new(exchange, pair);
        let role = self.role_of(exchange);
        let sibling_key = PriceKey::new(self.sibling_of(exchange), pair);
        let other_price = self.last_prices.get(&sibling_key).copied();

        let simulator = match self.simulators.entry(key.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let profile = self.config.profile(role);
                let simulator = ShortTermPriceSimulator::from_profile(profile, &self.config, &mut self.rng);
                debug!(
                    "🎲 Created simulator for {}: start {:.4}, volatility {:.4}, period {}s",
                    entry.key(),
                    simulator.base_price(),
                    simulator.params().volatility,
                    simulator.params().oscillation_period
                );
                entry.insert(simulator)
            }
        };

        let price = simulator.next_price(other_price, &mut self.rng);
        self.last_prices.insert(key, price);
        price
    }

    pub fn last_price(&self, exchange: &str, pair: &TradingPair) -> Option<f64> {
        self.last_prices.get(&PriceKey::new(exchange, pair)).copied()
    }

    pub fn simulator(&self, exchange: &str, pair: &TradingPair) -> Option<&ShortTermPriceSimulator> {
        self.simulators.get(&PriceKey::new(exchange, pair))
    }

    pub fn len(&self) -> usize {
        self.simulators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.simulators.is_empty()
    }
}
