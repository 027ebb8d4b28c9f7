// End-of-session report

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::config::DurationUnit;
use crate::types::TradeRecord;

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub started_at: DateTime<Local>,
    pub exchange1: String,
    pub exchange2: String,
    pub pair: String,
    pub initial_capital: f64,
    pub final_capital: f64,
    pub total_profit: f64,
    pub profit_percent: f64,
    pub trade_count: u64,
    pub session_duration: f64,
    pub duration_unit: DurationUnit,
    pub session_seconds: f64,
    pub elapsed_seconds: f64,
    pub ticks_recorded: usize,
    pub cancelled: bool,
    pub trades: Vec<TradeRecord>,
}

impl SessionSummary {
    /// Multi-line report written to the session log and printed by the CLI
    pub fn render(&self) -> String {
        let mut lines = vec![
            format!("Trading Complete: {} vs {} for {}", self.exchange1, self.exchange2, self.pair),
            format!("Initial Capital: ${:.2}", self.initial_capital),
            format!("Final Capital: ${:.2}", self.final_capital),
            format!("Total Profit: ${:.2} ({:.2}%)", self.total_profit, self.profit_percent),
            format!("Number of Trades: {}", self.trade_count),
            format!(
                "Trading Duration: {} {} ({} seconds)",
                self.session_duration, self.duration_unit, self.session_seconds
            ),
        ];

        if self.cancelled {
            lines.push(format!("Session cancelled after {:.1} seconds", self.elapsed_seconds));
        }

        if self.trades.is_empty() {
            lines.push("\nNo arbitrage opportunities found.".to_string());
        } else {
            lines.push("\nTrade Details:".to_string());
            lines.extend(self.trades.iter().map(TradeRecord::describe));
        }

        lines.join("\n")
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
