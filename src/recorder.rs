//! Session persistence sinks
//!
//! A recorder receives event lines and the growing tick table. It makes no
//! decisions; the engine reports any write failure as a warning and carries on.

use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{TradingError, TradingResult};
use crate::types::TickRecord;

pub const CSV_HEADER: &str = "Time,Exchange1_Price,Exchange2_Price,Trade_Executed,Cumulative_Profit";

pub trait Recorder: Send {
    /// Start a fresh session log, discarding any previous content
    fn begin_session(&mut self) -> TradingResult<()>;

    /// Append one event line
    fn log(&mut self, message: &str) -> TradingResult<()>;

    /// Persist the complete tick table as of now
    fn persist_ticks(&mut self, ticks: &[TickRecord]) -> TradingResult<()>;

    /// Final flush at session end
    fn finish(&mut self, ticks: &[TickRecord]) -> TradingResult<()> {
        self.persist_ticks(ticks)
    }
}

/// Render the whole tick table, header included
pub fn render_csv(ticks: &[TickRecord]) -> String {
    let mut out = String::with_capacity(64 * (ticks.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');

    for tick in ticks {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            tick.elapsed_seconds,
            tick.price1,
            tick.price2,
            if tick.trade_executed { "Yes" } else { "No" },
            tick.cumulative_profit_at_tick
        ));
    }

    out
}

/// `YYYY-MM-DD HH:MM:SS - message`
pub fn format_log_line(message: &str) -> String {
    format!("{} - {}", Local::now().format("%Y-%m-%d %H:%M:%S"), message)
}

/// CSV table plus text log on disk
#[derive(Debug, Clone)]
pub struct FileRecorder {
    data_file: PathBuf,
    log_file: PathBuf,
}

impl FileRecorder {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(data_file: P, log_file: Q) -> Self {
        Self {
            data_file: data_file.into(),
            log_file: log_file.into(),
        }
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    fn ensure_parent(path: &Path) -> TradingResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    TradingError::FileWrite(format!("{}: {}", parent.display(), e))
                })?;
            }
        }
        Ok(())
    }
}

impl Recorder for FileRecorder {
    fn begin_session(&mut self) -> TradingResult<()> {
        Self::ensure_parent(&self.log_file)?;
        File::create(&self.log_file)
            .map_err(|e| TradingError::FileWrite(format!("{}: {}", self.log_file.display(), e)))?;
        Ok(())
    }

    fn log(&mut self, message: &str) -> TradingResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)
            .map_err(|e| TradingError::FileWrite(format!("{}: {}", self.log_file.display(), e)))?;

        writeln!(file, "{}", format_log_line(message))
            .map_err(|e| TradingError::FileWrite(format!("{}: {}", self.log_file.display(), e)))
    }

    fn persist_ticks(&mut self, ticks: &[TickRecord]) -> TradingResult<()> {
        Self::ensure_parent(&self.data_file)?;
        // Whole-file rewrite: readers always see a complete table
        fs::write(&self.data_file, render_csv(ticks))
            .map_err(|e| TradingError::FileWrite(format!("{}: {}", self.data_file.display(), e)))
    }
}

#[derive(Debug, Default)]
pub struct MemoryLog {
    pub sessions_started: usize,
    pub lines: Vec<String>,
    pub last_table: Vec<TickRecord>,
    pub persist_count: usize,
    pub finished: bool,
}

/// In-memory recorder; clones share the same log
#[derive(Debug, Clone, Default)]
pub struct MemoryRecorder {
    inner: Arc<Mutex<MemoryLog>>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MutexGuard<'_, MemoryLog> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn lines(&self) -> Vec<String> {
        self.snapshot().lines.clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.snapshot().lines.iter().any(|line| line.contains(needle))
    }
}

impl Recorder for MemoryRecorder {
    fn begin_session(&mut self) -> TradingResult<()> {
        let mut log = self.snapshot();
        log.sessions_started += 1;
        log.lines.clear();
        Ok(())
    }

    fn log(&mut self, message: &str) -> TradingResult<()> {
        self.snapshot().lines.push(message.to_string());
        Ok(())
    }

    fn persist_ticks(&mut self, ticks: &[TickRecord]) -> TradingResult<()> {
        let mut log = self.snapshot();
        log.last_table = ticks.to_vec();
        log.persist_count += 1;
        Ok(())
    }

    fn finish(&mut self, ticks: &[TickRecord]) -> TradingResult<()> {
        self.persist_ticks(ticks)?;
        self.snapshot().finished = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn tick(elapsed: f64, traded: bool, profit: f64) -> TickRecord {
        TickRecord {
            elapsed_seconds: elapsed,
            price1: 10.0,
            price2: 10.25,
            trade_executed: traded,
            cumulative_profit_at_tick: profit,
        }
    }

    #[test]
    fn test_render_csv() {
        let csv = render_csv(&[tick(0.0, false, 0.0), tick(1.5, true, 24.5)]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "0,10,10.25,No,0");
        assert_eq!(lines[2], "1.5,10,10.25,Yes,24.5");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_csv_is_rewritten_not_appended() {
        let dir = tempdir().unwrap();
        let mut recorder = FileRecorder::new(dir.path().join("data.csv"), dir.path().join("log.txt"));

        recorder.persist_ticks(&[tick(0.0, false, 0.0)]).unwrap();
        recorder.persist_ticks(&[tick(0.0, false, 0.0), tick(1.0, false, 0.0)]).unwrap();

        let content = fs::read_to_string(recorder.data_file()).unwrap();
        assert_eq!(content.matches(CSV_HEADER).count(), 1);
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_begin_session_truncates_log() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("logs").join("session.txt");
        fs::create_dir_all(log_path.parent().unwrap()).unwrap();
        fs::write(&log_path, "stale line\n").unwrap();

        let mut recorder = FileRecorder::new(dir.path().join("data.csv"), &log_path);
        recorder.begin_session().unwrap();
        recorder.log("Starting trading bot").unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        assert!(!content.contains("stale line"));
        assert_eq!(content.lines().count(), 1);
        assert!(content.trim_end().ends_with(" - Starting trading bot"));
    }

    #[test]
    fn test_log_line_timestamp_format() {
        let line = format_log_line("hello");
        // "YYYY-MM-DD HH:MM:SS - hello"
        assert_eq!(line.len(), 19 + 3 + 5);
        assert_eq!(&line[4..5], "-");
        assert_eq!(&line[10..11], " ");
        assert_eq!(&line[19..22], " - ");
    }

    #[test]
    fn test_memory_recorder_shares_state() {
        let recorder = MemoryRecorder::new();
        let mut writer = recorder.clone();

        writer.begin_session().unwrap();
        writer.log("one").unwrap();
        writer.finish(&[tick(0.0, false, 0.0)]).unwrap();

        assert_eq!(recorder.lines(), vec!["one".to_string()]);
        assert!(recorder.snapshot().finished);
        assert_eq!(recorder.snapshot().last_table.len(), 1);
    }
}
