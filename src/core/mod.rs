// Core arbitrage logic modules

pub mod arbitrage_engine;
pub mod session_state;
pub mod shutdown;
pub mod spread;
pub mod summary;

// Re-export commonly used types
pub use arbitrage_engine::{run_session, ArbitrageEngine};
pub use session_state::SessionState;
pub use shutdown::ShutdownHandle;
pub use spread::{evaluate_spread, ArbitrageLeg, SpreadAnalysis, Venue};
pub use summary::SessionSummary;
