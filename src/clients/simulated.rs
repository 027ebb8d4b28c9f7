// Price source backed by the session's simulator registry

use async_trait::async_trait;

use crate::clients::{PriceError, PriceSource};
use crate::config::Config;
use crate::simulation::SimulatorRegistry;
use crate::types::TradingPair;

pub struct SimulatedPriceSource {
    registry: SimulatorRegistry,
}

impl SimulatedPriceSource {
    pub fn new(registry: SimulatorRegistry) -> Self {
        Self { registry }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(SimulatorRegistry::new(
            config.simulator.clone(),
            &config.session.exchange1,
            &config.session.exchange2,
            config.session.seed,
        ))
    }

    pub fn registry(&self) -> &SimulatorRegistry {
        &self.registry
    }
}

#[async_trait]
impl PriceSource for SimulatedPriceSource {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn fetch(&mut self, exchange: &str, pair: &TradingPair) -> Result<f64, PriceError> {
        Ok(self.registry.next_price(exchange, pair))
    }
}
