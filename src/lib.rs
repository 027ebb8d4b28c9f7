// Spread Arbitrage Bot Library
//
// Simulated cross-exchange arbitrage on a single trading pair, fed by either
// synthetic or live exchange quotes

pub mod clients;
pub mod config;
pub mod core;
pub mod error;      // Unified error handling
pub mod progress;
pub mod recorder;   // CSV and session log sinks
pub mod simulation;
pub mod types;

// Re-export core engine types
pub use crate::core::{
    evaluate_spread, run_session, ArbitrageEngine, ArbitrageLeg, SessionState, SessionSummary, ShutdownHandle,
    SpreadAnalysis, Venue,
};

// Re-export error types
pub use error::{TradingError, TradingResult};

// Re-export price sources
pub use clients::{build_price_source, LivePriceSource, PriceError, PriceSource, SimulatedPriceSource};

// Re-export configuration
pub use config::{Config, ConfigError, DurationUnit, LiveConfig, LoggingConfig, SessionConfig, SimulatorConfig};

// Re-export persistence and simulation
pub use recorder::{FileRecorder, MemoryRecorder, Recorder};
pub use simulation::{ShortTermPriceSimulator, SimulatorRegistry};
pub use types::{Exchange, TickRecord, TradeRecord, TradingPair};
