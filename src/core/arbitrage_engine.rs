// Cross-exchange arbitrage session engine
//
// One session is a strictly sequential tick loop: fetch exchange1 then
// exchange2, evaluate the spread, simulate the trade, persist, wait.

use chrono::Local;
use tokio::time::{sleep, Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clients::{build_price_source, PriceError, PriceSource};
use crate::config::Config;
use crate::core::session_state::SessionState;
use crate::core::shutdown::ShutdownHandle;
use crate::core::spread::{evaluate_spread, SpreadAnalysis, Venue};
use crate::core::summary::SessionSummary;
use crate::error::{TradingError, TradingResult};
use crate::progress::SessionProgress;
use crate::recorder::{FileRecorder, Recorder};
use crate::types::{TradeSide, TradingPair};

pub struct ArbitrageEngine {
    config: Config,
    pair: TradingPair,
    source: Box<dyn PriceSource>,
    recorder: Box<dyn Recorder>,
    state: SessionState,
    shutdown: ShutdownHandle,
    progress: Option<SessionProgress>,
    session_id: Uuid,
}

impl ArbitrageEngine {
    /// Validates the configuration; nothing runs if it is rejected
    pub fn new(config: Config, source: Box<dyn PriceSource>, recorder: Box<dyn Recorder>) -> TradingResult<Self> {
        config.validate()?;
        let pair = config.session.pair()?;
        let state = SessionState::new(config.session.initial_capital);

        Ok(Self {
            config,
            pair,
            source,
            recorder,
            state,
            shutdown: ShutdownHandle::new(),
            progress: None,
            session_id: Uuid::new_v4(),
        })
    }

    pub fn with_shutdown(mut self, shutdown: ShutdownHandle) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn with_progress(mut self, progress: SessionProgress) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn exchange_name(&self, venue: Venue) -> &str {
        match venue {
            Venue::First => &self.config.session.exchange1,
            Venue::Second => &self.config.session.exchange2,
        }
    }

    fn record(&mut self, message: &str) {
        if let Err(e) = self.recorder.log(message) {
            warn!("⚠️  Failed to write session log: {}", e);
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.recorder.persist_ticks(&self.state.ticks) {
            warn!("⚠️  Failed to persist tick data: {}", e);
        }
    }

    fn begin(&mut self) {
        if let Err(e) = self.recorder.begin_session() {
            warn!("⚠️  Failed to reset session log: {}", e);
        }

        let session = &self.config.session;
        let header = [
            format!("Starting new trading session with {} USD", session.initial_capital),
            format!(
                "Starting trading bot: {} vs {} for {}",
                session.exchange1, session.exchange2, session.trading_pair
            ),
            format!(
                "Initial capital: ${}, Threshold: {}%",
                session.initial_capital, session.arbitrage_threshold_percent
            ),
            format!(
                "Trading duration: {} {} ({} seconds)",
                session.session_duration,
                session.duration_unit,
                session.session_seconds()
            ),
        ];

        info!(
            "🚀 Starting arbitrage session {} ({} source): {} vs {} for {}",
            self.session_id,
            self.source.name(),
            session.exchange1,
            session.exchange2,
            session.trading_pair
        );

        for line in header {
            self.record(&line);
        }
    }

    /// Fetch both quotes in order. `None` means the tick is skipped.
    async fn fetch_prices(&mut self) -> Option<(f64, f64)> {
        let session = &self.config.session;
        let price1 = self.source.fetch(&session.exchange1, &self.pair).await;
        let price2 = self.source.fetch(&session.exchange2, &self.pair).await;

        match (price1, price2) {
            (Ok(p1), Ok(p2)) => Some((p1, p2)),
            (price1, price2) => {
                let message = format!(
                    "Could not fetch price from one or both exchanges. {}: {}, {}: {}",
                    self.config.session.exchange1,
                    quote_label(&price1),
                    self.config.session.exchange2,
                    quote_label(&price2)
                );

                for error in [price1.err(), price2.err()].into_iter().flatten() {
                    self.record(&error.to_string());
                    let error = TradingError::from(error);
                    warn!("⚠️  [{}] {}", error.category(), error);
                }

                warn!("⚠️  {}", message);
                self.record(&message);
                None
            }
        }
    }

    /// Evaluate one pair of quotes and simulate the trade if the spread clears
    /// the threshold. Appends exactly one tick record.
    pub fn process_prices(&mut self, elapsed_seconds: f64, price1: f64, price2: f64) -> SpreadAnalysis {
        let analysis = evaluate_spread(price1, price2, self.config.session.arbitrage_threshold_percent);

        let tick_line = format!(
            "Time: {:.1}s - {}: ${:.4}, {}: ${:.4}, Diff: ${:.4} ({:.2}%)",
            elapsed_seconds,
            self.config.session.exchange1,
            price1,
            self.config.session.exchange2,
            price2,
            analysis.price_diff,
            analysis.percent_diff
        );
        debug!("📊 {}", tick_line);
        self.record(&tick_line);

        self.state.record_tick(elapsed_seconds, price1, price2);

        if let Some(leg) = analysis.opportunity {
            let buy_exchange = self.exchange_name(leg.buy).to_string();
            let sell_exchange = self.exchange_name(leg.sell()).to_string();

            let trade = self
                .state
                .apply_trade(elapsed_seconds, &analysis, &leg, &buy_exchange, &sell_exchange)
                .clone();

            for (side, exchange, price) in [
                (TradeSide::Buy, &buy_exchange, leg.buy_price),
                (TradeSide::Sell, &sell_exchange, leg.sell_price),
            ] {
                let message = format!(
                    "{} {:.4} of {} at {} for ${:.4}",
                    side, trade.units, self.config.session.trading_pair, exchange, price
                );
                self.record(&message);
            }

            info!(
                "✅ ARBITRAGE: buy {} @ ${:.4}, sell {} @ ${:.4} | Profit: ${:.2} | Capital: ${:.2}",
                buy_exchange, leg.buy_price, sell_exchange, leg.sell_price, trade.profit, trade.capital_after
            );
            self.record(&trade.describe());
        }

        analysis
    }

    /// Run the session until its duration elapses or shutdown is triggered.
    /// A summary is produced either way.
    pub async fn run_session(&mut self) -> TradingResult<SessionSummary> {
        let started_at = Local::now();
        let session_seconds = self.config.session.session_seconds();
        let tick_interval = Duration::from_millis(self.config.session.tick_interval_ms);
        let mut shutdown_rx = self.shutdown.subscribe();

        self.begin();

        let session_start = Instant::now();
        let mut cancelled = false;

        loop {
            if self.shutdown.is_triggered() {
                cancelled = true;
                break;
            }

            let elapsed = session_start.elapsed().as_secs_f64();
            if elapsed >= session_seconds {
                info!("⏰ Trading session completed after {:.1} seconds", elapsed);
                break;
            }

            if let Some((price1, price2)) = self.fetch_prices().await {
                self.process_prices(elapsed, price1, price2);
                self.persist();
            }

            if let Some(progress) = &self.progress {
                progress.update(elapsed, self.state.capital, self.state.trade_count);
            }

            tokio::select! {
                _ = sleep(tick_interval) => {}
                _ = shutdown_rx.changed() => {
                    cancelled = true;
                    break;
                }
            }
        }

        if cancelled {
            info!("🛑 Shutdown requested, ending session early");
        }

        let elapsed_seconds = session_start.elapsed().as_secs_f64();
        let summary = self.summarize(started_at, elapsed_seconds, cancelled);

        self.record("Trading session ended.");
        let report = summary.render();
        self.record(&report);

        if let Err(e) = self.recorder.finish(&self.state.ticks) {
            warn!("⚠️  Failed to flush session data: {}", e);
        }

        if let Some(progress) = &self.progress {
            progress.finish(summary.final_capital, summary.profit_percent);
        }

        info!(
            "💰 Final capital: ${:.2} ({:+.2}%) after {} trades",
            summary.final_capital, summary.profit_percent, summary.trade_count
        );

        Ok(summary)
    }

    fn summarize(&self, started_at: chrono::DateTime<Local>, elapsed_seconds: f64, cancelled: bool) -> SessionSummary {
        let session = &self.config.session;

        SessionSummary {
            session_id: self.session_id,
            started_at,
            exchange1: session.exchange1.clone(),
            exchange2: session.exchange2.clone(),
            pair: session.trading_pair.clone(),
            initial_capital: self.state.start_capital,
            final_capital: self.state.capital,
            total_profit: self.state.total_profit(),
            profit_percent: self.state.profit_percent(),
            trade_count: self.state.trade_count,
            session_duration: session.session_duration,
            duration_unit: session.duration_unit,
            session_seconds: session.session_seconds(),
            elapsed_seconds,
            ticks_recorded: self.state.ticks.len(),
            cancelled,
            trades: self.state.trades.clone(),
        }
    }
}

fn quote_label(quote: &Result<f64, PriceError>) -> String {
    match quote {
        Ok(price) => price.to_string(),
        Err(_) => "unavailable".to_string(),
    }
}

/// Build the configured price source and file recorder, then run one session
pub async fn run_session(config: &Config, shutdown: Option<ShutdownHandle>) -> TradingResult<SessionSummary> {
    config.validate()?;

    let now = Local::now();
    let recorder = FileRecorder::new(
        config.session.resolve_data_file(now),
        config.session.resolve_log_file(now),
    );
    info!(
        "📁 Writing tick data to {} and session log to {}",
        recorder.data_file().display(),
        recorder.log_file().display()
    );

    let source = build_price_source(config)?;
    let mut engine = ArbitrageEngine::new(config.clone(), source, Box::new(recorder))?;
    if let Some(shutdown) = shutdown {
        engine = engine.with_shutdown(shutdown);
    }

    engine.run_session().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::SimulatedPriceSource;
    use crate::recorder::MemoryRecorder;

    fn engine_with(threshold: f64, recorder: MemoryRecorder) -> ArbitrageEngine {
        let mut config = Config::default();
        config.session.arbitrage_threshold_percent = threshold;
        config.session.seed = Some(1);
        let source = SimulatedPriceSource::from_config(&config);
        ArbitrageEngine::new(config, Box::new(source), Box::new(recorder)).unwrap()
    }

    #[test]
    fn test_process_prices_trade_logs_in_order() {
        let recorder = MemoryRecorder::new();
        let mut engine = engine_with(0.5, recorder.clone());

        let analysis = engine.process_prices(1.0, 100.0, 100.60);
        assert!(analysis.opportunity.is_some());

        let lines = recorder.lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Time: 1.0s - Binance: $100.0000, Kraken: $100.6000"));
        assert_eq!(lines[1], "BUY 10.0000 of XRP/USD at Binance for $100.0000");
        assert_eq!(lines[2], "SELL 10.0000 of XRP/USD at Kraken for $100.6000");
        assert!(lines[3].contains("ARBITRAGE OPPORTUNITY: Binance($100.0000) -> Kraken($100.6000)"));

        assert!((engine.state().capital - 1006.0).abs() < 1e-9);
    }

    #[test]
    fn test_process_prices_without_trade() {
        let recorder = MemoryRecorder::new();
        let mut engine = engine_with(1.0, recorder.clone());

        engine.process_prices(0.0, 100.0, 100.30);

        assert_eq!(recorder.lines().len(), 1);
        assert_eq!(engine.state().capital, 1000.0);
        assert!(!engine.state().ticks[0].trade_executed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_summary_carries_engine_identity() {
        let recorder = MemoryRecorder::new();
        let mut engine = engine_with(0.5, recorder.clone());
        engine.shutdown_handle().trigger();

        let summary = engine.run_session().await.unwrap();

        assert_eq!(summary.session_id, engine.session_id());
        assert_eq!(summary.pair, engine.config().session.trading_pair);
        assert_eq!(recorder.lines()[0], "Starting new trading session with 1000 USD");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = Config::default();
        config.session.initial_capital = 0.0;
        let source = SimulatedPriceSource::from_config(&config);
        let result = ArbitrageEngine::new(config, Box::new(source), Box::new(MemoryRecorder::new()));
        assert!(matches!(result, Err(e) if e.is_fatal()));
    }
}
