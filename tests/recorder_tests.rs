// File recorder behaviour, including write failures during a session

mod common;

use common::{create_temp_session_files, create_test_config, ScriptedPriceSource};
use spread_arbitrage_bot::recorder::CSV_HEADER;
use spread_arbitrage_bot::{ArbitrageEngine, FileRecorder, Recorder, TickRecord, TradingError};
use std::fs;

fn tick(elapsed: f64) -> TickRecord {
    TickRecord {
        elapsed_seconds: elapsed,
        price1: 2.4512,
        price2: 2.4633,
        trade_executed: false,
        cumulative_profit_at_tick: 0.0,
    }
}

#[test]
fn test_parent_directories_created() {
    let (_dir, data_file, log_file) = create_temp_session_files();
    let mut recorder = FileRecorder::new(&data_file, &log_file);

    recorder.begin_session().unwrap();
    recorder.persist_ticks(&[tick(0.0)]).unwrap();

    assert!(data_file.exists());
    assert!(log_file.exists());
    assert_eq!(
        fs::read_to_string(&data_file).unwrap(),
        format!("{}\n0,2.4512,2.4633,No,0\n", CSV_HEADER)
    );
}

#[test]
fn test_multi_line_message_shares_one_timestamp() {
    let (_dir, data_file, log_file) = create_temp_session_files();
    let mut recorder = FileRecorder::new(&data_file, &log_file);

    recorder.begin_session().unwrap();
    recorder.log("Trading Complete\nInitial Capital: $1000.00").unwrap();

    let content = fs::read_to_string(&log_file).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(" - Trading Complete"));
    assert_eq!(lines[1], "Initial Capital: $1000.00");
}

#[test]
fn test_unwritable_data_file_is_file_write_error() {
    let (dir, _, log_file) = create_temp_session_files();
    // A directory where the CSV should go
    let mut recorder = FileRecorder::new(dir.path(), &log_file);

    let err = recorder.persist_ticks(&[tick(0.0)]).unwrap_err();
    assert!(matches!(err, TradingError::FileWrite(_)));
    assert_eq!(err.category(), "io");
}

#[tokio::test(start_paused = true)]
async fn test_session_survives_persistence_failures() {
    let (dir, _, log_file) = create_temp_session_files();
    let mut config = create_test_config();
    config.session.session_duration = 3.0;

    let recorder = FileRecorder::new(dir.path(), &log_file);
    let source = ScriptedPriceSource::constant("Binance", 10.0, 10.1);
    let mut engine = ArbitrageEngine::new(config, Box::new(source), Box::new(recorder)).unwrap();

    let summary = engine.run_session().await.unwrap();

    assert_eq!(summary.ticks_recorded, 3);
    assert_eq!(summary.trade_count, 3);
    assert!(fs::read_to_string(&log_file).unwrap().contains("Trading session ended."));
}
