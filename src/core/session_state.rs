// Per-session accounting: capital, profit and the tick/trade tables

use serde::Serialize;

use crate::core::spread::{ArbitrageLeg, SpreadAnalysis};
use crate::types::{TickRecord, TradeRecord};

const BALANCE_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub start_capital: f64,
    pub capital: f64,
    pub cumulative_profit: f64,
    pub trade_count: u64,
    pub ticks: Vec<TickRecord>,
    pub trades: Vec<TradeRecord>,
}

impl SessionState {
    pub fn new(start_capital: f64) -> Self {
        Self {
            start_capital,
            capital: start_capital,
            cumulative_profit: 0.0,
            trade_count: 0,
            ticks: Vec::new(),
            trades: Vec::new(),
        }
    }

    /// Append a provisional tick: no trade, profit as of now
    pub fn record_tick(&mut self, elapsed_seconds: f64, price1: f64, price2: f64) {
        self.ticks.push(TickRecord {
            elapsed_seconds,
            price1,
            price2,
            trade_executed: false,
            cumulative_profit_at_tick: self.cumulative_profit,
        });
    }

    /// Execute a simulated arbitrage with the whole capital.
    ///
    /// Capital is re-derived from the start snapshot so it never drifts from
    /// `start_capital + cumulative_profit`. The latest tick is marked as traded.
    pub fn apply_trade(
        &mut self,
        elapsed_seconds: f64,
        analysis: &SpreadAnalysis,
        leg: &ArbitrageLeg,
        buy_exchange: &str,
        sell_exchange: &str,
    ) -> &TradeRecord {
        let units = self.capital / leg.buy_price;
        let profit = (leg.sell_price - leg.buy_price) * units;

        self.cumulative_profit += profit;
        self.capital = self.start_capital + self.cumulative_profit;
        self.trade_count += 1;

        if let Some(tick) = self.ticks.last_mut() {
            tick.trade_executed = true;
            tick.cumulative_profit_at_tick = self.cumulative_profit;
        }

        self.trades.push(TradeRecord {
            elapsed_seconds,
            buy_exchange: buy_exchange.to_string(),
            sell_exchange: sell_exchange.to_string(),
            buy_price: leg.buy_price,
            sell_price: leg.sell_price,
            units,
            profit,
            capital_after: self.capital,
            price_diff: analysis.price_diff,
            percent_diff: analysis.percent_diff,
        });

        &self.trades[self.trades.len() - 1]
    }

    pub fn total_profit(&self) -> f64 {
        self.capital - self.start_capital
    }

    pub fn profit_percent(&self) -> f64 {
        self.total_profit() / self.start_capital * 100.0
    }

    /// `capital == start_capital + cumulative_profit`
    pub fn is_balanced(&self) -> bool {
        let scale = self.start_capital.abs().max(1.0);
        (self.capital - (self.start_capital + self.cumulative_profit)).abs() <= BALANCE_TOLERANCE * scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::spread::evaluate_spread;

    #[test]
    fn test_trade_updates_capital_and_tick() {
        let mut state = SessionState::new(1000.0);
        state.record_tick(0.0, 100.0, 100.60);

        let analysis = evaluate_spread(100.0, 100.60, 0.5);
        let leg = analysis.opportunity.unwrap();
        let trade = state.apply_trade(0.0, &analysis, &leg, "Binance", "Kraken").clone();

        assert!((trade.units - 10.0).abs() < 1e-9);
        assert!((trade.profit - 6.0).abs() < 1e-9);
        assert!((state.capital - 1006.0).abs() < 1e-9);
        assert_eq!(state.trade_count, 1);
        assert_eq!(trade.buy_exchange, "Binance");
        assert_eq!(trade.sell_exchange, "Kraken");

        let tick = &state.ticks[0];
        assert!(tick.trade_executed);
        assert_eq!(tick.cumulative_profit_at_tick, state.cumulative_profit);
        assert!(state.is_balanced());
    }

    #[test]
    fn test_compounding_stays_balanced() {
        let mut state = SessionState::new(1000.0);
        for i in 0..500 {
            let (p1, p2) = if i % 2 == 0 { (10.0, 10.1) } else { (10.13, 10.02) };
            state.record_tick(i as f64, p1, p2);
            let analysis = evaluate_spread(p1, p2, 0.5);
            if let Some(leg) = analysis.opportunity {
                state.apply_trade(i as f64, &analysis, &leg, "A", "B");
            }
            assert!(state.is_balanced());
        }
        assert_eq!(state.trade_count, 500);
        assert!(state.profit_percent() > 0.0);
    }
}
