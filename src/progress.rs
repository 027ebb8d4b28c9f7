//! Progress bar for a running arbitrage session
//!
//! Visual feedback on the terminal using the indicatif crate. The bar spans the
//! session length in whole seconds; the message carries capital and trade count.

use indicatif::{ProgressBar, ProgressStyle};

pub struct SessionProgress {
    pub progress: ProgressBar,
    pub total_seconds: u64,
}

impl SessionProgress {
    pub fn new(session_seconds: f64) -> Self {
        let total_seconds = session_seconds.ceil().max(1.0) as u64;
        let progress = ProgressBar::new(total_seconds);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}s\n{msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        Self {
            progress,
            total_seconds,
        }
    }

    /// Bar that draws nothing, for non-interactive runs
    pub fn hidden(session_seconds: f64) -> Self {
        let bar = Self::new(session_seconds);
        bar.progress.set_draw_target(indicatif::ProgressDrawTarget::hidden());
        bar
    }

    pub fn update(&self, elapsed_seconds: f64, capital: f64, trades: u64) {
        let position = (elapsed_seconds.max(0.0) as u64).min(self.total_seconds);
        self.progress.set_position(position);
        self.progress.set_message(format!("💰 Capital: ${:.2} | Trades: {}", capital, trades));
    }

    pub fn finish(&self, capital: f64, profit_percent: f64) {
        self.progress.finish_with_message(format!(
            "✅ Session complete! Capital: ${:.2} ({:+.2}%)",
            capital, profit_percent
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_progress_clamps_position() {
        let progress = SessionProgress::hidden(10.5);
        assert_eq!(progress.total_seconds, 11);

        progress.update(4.2, 1001.0, 1);
        assert_eq!(progress.progress.position(), 4);

        progress.update(30.0, 1002.0, 2);
        assert_eq!(progress.progress.position(), 11);

        progress.finish(1002.0, 0.2);
    }
}
