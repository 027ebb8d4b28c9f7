// Spread Arbitrage Bot - CLI
// Runs one simulated arbitrage session between two exchanges

use chrono::Local;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn, Level};

use spread_arbitrage_bot::progress::SessionProgress;
use spread_arbitrage_bot::{
    build_price_source, ArbitrageEngine, Config, ConfigError, DurationUnit, FileRecorder, ShutdownHandle,
    TradingError,
};

#[derive(Parser)]
#[command(name = "arb-bot")]
#[command(version = "0.2.0")]
#[command(about = "Cross-exchange spread arbitrage simulator", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one trading session
    Run(RunArgs),

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Load and validate the configuration without trading
    Check,
}

#[derive(Args)]
struct RunArgs {
    /// Initial capital in quote currency
    #[arg(long)]
    capital: Option<f64>,

    /// Arbitrage threshold in percent
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Session duration, in `--unit`s
    #[arg(short, long)]
    duration: Option<f64>,

    /// Duration unit: seconds, minutes, hours or days
    #[arg(short, long)]
    unit: Option<String>,

    /// First exchange
    #[arg(long)]
    exchange1: Option<String>,

    /// Second exchange
    #[arg(long)]
    exchange2: Option<String>,

    /// Trading pair (e.g., XRP/USD)
    #[arg(short, long)]
    pair: Option<String>,

    /// Use live exchange quotes instead of simulated prices
    #[arg(long)]
    live: bool,

    /// Seed for the price simulator
    #[arg(long)]
    seed: Option<u64>,

    /// CSV tick data output
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Session log output
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

impl RunArgs {
    fn apply(&self, config: &mut Config) -> Result<(), ConfigError> {
        let session = &mut config.session;

        if let Some(capital) = self.capital {
            session.initial_capital = capital;
        }
        if let Some(threshold) = self.threshold {
            session.arbitrage_threshold_percent = threshold;
        }
        if let Some(duration) = self.duration {
            session.session_duration = duration;
        }
        if let Some(unit) = &self.unit {
            session.duration_unit = unit.parse::<DurationUnit>()?;
        }
        if let Some(exchange) = &self.exchange1 {
            session.exchange1 = exchange.clone();
        }
        if let Some(exchange) = &self.exchange2 {
            session.exchange2 = exchange.clone();
        }
        if let Some(pair) = &self.pair {
            session.trading_pair = pair.clone();
        }
        if self.live {
            session.simulate_data = false;
        }
        if self.seed.is_some() {
            session.seed = self.seed;
        }
        if self.data_file.is_some() {
            session.data_file = self.data_file.clone();
        }
        if self.log_file.is_some() {
            session.log_file = self.log_file.clone();
        }

        config.validate()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging first (before config load so we can see config errors)
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Config::from_file(&cli.config)
            .ok()
            .and_then(|config| config.logging.level.parse::<Level>().ok())
            .unwrap_or(Level::INFO)
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚀 Spread Arbitrage Bot v0.2.0");
    info!("📁 Config: {}", cli.config);

    match cli.command {
        // Init doesn't require config (it creates it)
        Commands::Init { force } => {
            init_config(&cli.config, force)?;
        }

        Commands::Check => {
            if !Path::new(&cli.config).exists() {
                exit_with_config_error(TradingError::ConfigNotFound(cli.config.clone()));
            }
            let config = load_config_or_exit(&cli.config);
            show_session(&config);
        }

        Commands::Run(args) => {
            let mut config = load_config_or_exit(&cli.config);
            if let Err(e) = args.apply(&mut config) {
                exit_with_config_error(e.into());
            }
            run(config, &args).await?;
        }
    }

    Ok(())
}

/// Load config or exit with helpful error message
fn load_config_or_exit(path: &str) -> Config {
    match Config::load_or_default(path) {
        Ok(config) => config,
        Err(e) => exit_with_config_error(e.into()),
    }
}

fn exit_with_config_error(err: TradingError) -> ! {
    error!("❌ Configuration Error");
    for line in err.user_message().lines() {
        error!("{}", line);
    }
    std::process::exit(1);
}

fn init_config(path: &str, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if Path::new(path).exists() && !force {
        warn!("⚠️  {} already exists (use --force to overwrite)", path);
        return Ok(());
    }

    Config::default().to_file(path)?;
    info!("✅ Wrote default configuration to {}", path);
    info!("💡 Edit the [session] table, then run: arb-bot run");
    Ok(())
}

fn show_session(config: &Config) {
    let session = &config.session;
    let now = Local::now();

    info!("✅ Configuration is valid");
    println!("Pair:        {}", session.trading_pair);
    println!("Exchanges:   {} vs {}", session.exchange1, session.exchange2);
    println!("Capital:     ${:.2}", session.initial_capital);
    println!("Threshold:   {}%", session.arbitrage_threshold_percent);
    println!(
        "Duration:    {} {} ({} seconds)",
        session.session_duration,
        session.duration_unit,
        session.session_seconds()
    );
    println!("Tick:        {} ms", session.tick_interval_ms);
    println!("Source:      {}", if session.simulate_data { "simulated" } else { "live" });
    println!("Data file:   {}", session.resolve_data_file(now).display());
    println!("Log file:    {}", session.resolve_log_file(now).display());
}

async fn run(config: Config, args: &RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let now = Local::now();
    let recorder = FileRecorder::new(
        config.session.resolve_data_file(now),
        config.session.resolve_log_file(now),
    );
    info!("📁 Tick data: {}", recorder.data_file().display());
    info!("📝 Session log: {}", recorder.log_file().display());

    let shutdown = ShutdownHandle::new();
    let signal = shutdown.clone();
    let listener = tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if result.is_ok() {
                    warn!("🛑 Ctrl+C received, stopping after the current tick");
                    signal.trigger();
                }
            }
            _ = signal.triggered() => {}
        }
    });

    let source = build_price_source(&config)?;
    let show_progress = config.logging.show_progress && !args.no_progress;
    let mut engine = ArbitrageEngine::new(config, source, Box::new(recorder))?.with_shutdown(shutdown.clone());
    if show_progress {
        let session_seconds = engine.config().session.session_seconds();
        engine = engine.with_progress(SessionProgress::new(session_seconds));
    }
    info!("🆔 Session {}", engine.session_id());

    let summary = engine.run_session().await?;

    // Release the Ctrl+C listener once the session is over
    shutdown.trigger();
    let _ = listener.await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("\n{}", summary);
    }

    Ok(())
}
