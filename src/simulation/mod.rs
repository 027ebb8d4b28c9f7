// Simulation Module
// Synthetic short-term prices for paper sessions without network access

pub mod price_simulator;
pub mod registry;

pub use price_simulator::{ShortTermPriceSimulator, SimulatorParams, round_price};
pub use registry::SimulatorRegistry;
