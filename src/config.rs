// Configuration management for the arbitrage bot

use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::types::{ExchangeRole, TradingPair};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl DurationUnit {
    pub fn multiplier(&self) -> f64 {
        match self {
            DurationUnit::Seconds => 1.0,
            DurationUnit::Minutes => 60.0,
            DurationUnit::Hours => 3600.0,
            DurationUnit::Days => 86400.0,
        }
    }

    pub fn to_seconds(&self, duration: f64) -> f64 {
        duration * self.multiplier()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DurationUnit::Seconds => "seconds",
            DurationUnit::Minutes => "minutes",
            DurationUnit::Hours => "hours",
            DurationUnit::Days => "days",
        }
    }
}

impl std::str::FromStr for DurationUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "seconds" => Ok(DurationUnit::Seconds),
            "minutes" => Ok(DurationUnit::Minutes),
            "hours" => Ok(DurationUnit::Hours),
            "days" => Ok(DurationUnit::Days),
            other => Err(ConfigError::Validation(format!(
                "duration_unit '{}' must be one of seconds, minutes, hours, days",
                other
            ))),
        }
    }
}

impl std::fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub initial_capital: f64,
    pub arbitrage_threshold_percent: f64,
    pub session_duration: f64,
    #[serde(default = "default_duration_unit")]
    pub duration_unit: DurationUnit,
    pub exchange1: String,
    pub exchange2: String,
    pub trading_pair: String,
    #[serde(default = "default_true")]
    pub simulate_data: bool,
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SessionConfig {
    pub fn session_seconds(&self) -> f64 {
        self.duration_unit.to_seconds(self.session_duration)
    }

    pub fn pair(&self) -> Result<TradingPair, ConfigError> {
        self.trading_pair.parse().map_err(ConfigError::Validation)
    }

    /// Configured CSV path, or a timestamp-derived name
    pub fn resolve_data_file(&self, now: DateTime<Local>) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("trade_data_{}.csv", now.format("%Y%m%d_%H%M%S"))))
    }

    /// Configured log path, or a timestamp-derived name
    pub fn resolve_log_file(&self, now: DateTime<Local>) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("trade_log_{}.txt", now.format("%Y%m%d_%H%M%S"))))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(ConfigError::Validation("initial_capital must be positive".to_string()));
        }

        if !self.arbitrage_threshold_percent.is_finite() || self.arbitrage_threshold_percent <= 0.0 {
            return Err(ConfigError::Validation(
                "arbitrage_threshold_percent must be positive".to_string(),
            ));
        }

        if !self.session_duration.is_finite() || self.session_duration <= 0.0 {
            return Err(ConfigError::Validation("session_duration must be positive".to_string()));
        }

        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Validation("tick_interval_ms must be greater than 0".to_string()));
        }

        if self.exchange1.trim().is_empty() || self.exchange2.trim().is_empty() {
            return Err(ConfigError::Validation("exchange1 and exchange2 must be set".to_string()));
        }

        if self.exchange1 == self.exchange2 {
            return Err(ConfigError::Validation(format!(
                "exchange1 and exchange2 must differ (both are '{}')",
                self.exchange1
            )));
        }

        self.pair()?;
        Ok(())
    }
}

/// Parameter ranges one exchange role draws its simulator from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorProfile {
    pub starting_price_jitter: [f64; 2],
    pub volatility: [f64; 2],
    pub mean_reversion: [f64; 2],
    pub oscillation_amplitude: [f64; 2],
    pub oscillation_period: [u32; 2], // seconds, inclusive
    pub divergence_factor: [f64; 2],
}

/// Fields a `[simulator.primary]` or `[simulator.secondary]` table may override
#[derive(Debug, Default, Deserialize)]
struct ProfileOverrides {
    starting_price_jitter: Option<[f64; 2]>,
    volatility: Option<[f64; 2]>,
    mean_reversion: Option<[f64; 2]>,
    oscillation_amplitude: Option<[f64; 2]>,
    oscillation_period: Option<[u32; 2]>,
    divergence_factor: Option<[f64; 2]>,
}

impl ProfileOverrides {
    fn apply(self, base: SimulatorProfile) -> SimulatorProfile {
        SimulatorProfile {
            starting_price_jitter: self.starting_price_jitter.unwrap_or(base.starting_price_jitter),
            volatility: self.volatility.unwrap_or(base.volatility),
            mean_reversion: self.mean_reversion.unwrap_or(base.mean_reversion),
            oscillation_amplitude: self.oscillation_amplitude.unwrap_or(base.oscillation_amplitude),
            oscillation_period: self.oscillation_period.unwrap_or(base.oscillation_period),
            divergence_factor: self.divergence_factor.unwrap_or(base.divergence_factor),
        }
    }
}

fn primary_profile<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SimulatorProfile, D::Error> {
    Ok(ProfileOverrides::deserialize(deserializer)?.apply(SimulatorProfile::primary()))
}

fn secondary_profile<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SimulatorProfile, D::Error> {
    Ok(ProfileOverrides::deserialize(deserializer)?.apply(SimulatorProfile::secondary()))
}

impl SimulatorProfile {
    pub fn primary() -> Self {
        Self {
            starting_price_jitter: [0.98, 1.02],
            volatility: [0.02, 0.04],
            mean_reversion: [0.05, 0.1],
            oscillation_amplitude: [0.01, 0.02],
            oscillation_period: [5, 25],
            divergence_factor: [0.01, 0.03],
        }
    }

    /// Noisier than the primary profile: more volatility, weaker reversion
    pub fn secondary() -> Self {
        Self {
            starting_price_jitter: [0.97, 1.03],
            volatility: [0.03, 0.06],
            mean_reversion: [0.04, 0.08],
            oscillation_amplitude: [0.015, 0.025],
            oscillation_period: [5, 25],
            divergence_factor: [0.01, 0.04],
        }
    }

    fn validate(&self, role: &str) -> Result<(), ConfigError> {
        let ranges = [
            ("starting_price_jitter", self.starting_price_jitter),
            ("volatility", self.volatility),
            ("mean_reversion", self.mean_reversion),
            ("oscillation_amplitude", self.oscillation_amplitude),
            ("divergence_factor", self.divergence_factor),
        ];

        for (name, [low, high]) in ranges {
            if !low.is_finite() || !high.is_finite() || low < 0.0 || low > high {
                return Err(ConfigError::Validation(format!(
                    "simulator.{}.{} must be an ordered non-negative range",
                    role, name
                )));
            }
        }

        if self.starting_price_jitter[0] <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "simulator.{}.starting_price_jitter must be positive",
                role
            )));
        }

        let [min_period, max_period] = self.oscillation_period;
        if min_period == 0 || min_period > max_period {
            return Err(ConfigError::Validation(format!(
                "simulator.{}.oscillation_period must be an ordered range of positive seconds",
                role
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    #[serde(default = "default_base_price")]
    pub base_price: f64,
    #[serde(default = "default_shock_probability")]
    pub shock_probability: f64,
    #[serde(default = "default_divergence_chance")]
    pub divergence_chance: f64,
    #[serde(default = "default_clamp_lower")]
    pub clamp_lower: f64,
    #[serde(default = "default_clamp_upper")]
    pub clamp_upper: f64,
    #[serde(default = "SimulatorProfile::primary", deserialize_with = "primary_profile")]
    pub primary: SimulatorProfile,
    #[serde(default = "SimulatorProfile::secondary", deserialize_with = "secondary_profile")]
    pub secondary: SimulatorProfile,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            base_price: default_base_price(),
            shock_probability: default_shock_probability(),
            divergence_chance: default_divergence_chance(),
            clamp_lower: default_clamp_lower(),
            clamp_upper: default_clamp_upper(),
            primary: SimulatorProfile::primary(),
            secondary: SimulatorProfile::secondary(),
        }
    }
}

impl SimulatorConfig {
    pub fn profile(&self, role: ExchangeRole) -> &SimulatorProfile {
        match role {
            ExchangeRole::Primary => &self.primary,
            ExchangeRole::Secondary => &self.secondary,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_price.is_finite() || self.base_price <= 0.0 {
            return Err(ConfigError::Validation("simulator.base_price must be positive".to_string()));
        }

        if !(0.0..=1.0).contains(&self.shock_probability) {
            return Err(ConfigError::Validation(
                "simulator.shock_probability must be between 0 and 1".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.divergence_chance) {
            return Err(ConfigError::Validation(
                "simulator.divergence_chance must be between 0 and 1".to_string(),
            ));
        }

        let clamp_ordered = self.clamp_lower > 0.0 && self.clamp_lower < 1.0 && self.clamp_upper > 1.0;
        if !clamp_ordered || !self.clamp_upper.is_finite() {
            return Err(ConfigError::Validation(
                "simulator clamp must satisfy 0 < clamp_lower < 1 < clamp_upper".to_string(),
            ));
        }

        self.primary.validate("primary")?;
        self.secondary.validate("secondary")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveConfig {
    #[serde(default = "default_binance_url")]
    pub binance_url: String,
    #[serde(default = "default_coinbase_url")]
    pub coinbase_url: String,
    #[serde(default = "default_kraken_url")]
    pub kraken_url: String,
    #[serde(default = "default_bitfinex_url")]
    pub bitfinex_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            binance_url: default_binance_url(),
            coinbase_url: default_coinbase_url(),
            kraken_url: default_kraken_url(),
            bitfinex_url: default_bitfinex_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            show_progress: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub session: SessionConfig,
    #[serde(default)]
    pub simulator: SimulatorConfig,
    #[serde(default)]
    pub live: LiveConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

// Default value functions
fn default_duration_unit() -> DurationUnit { DurationUnit::Seconds }
fn default_true() -> bool { true }
fn default_tick_interval_ms() -> u64 { 1000 }
fn default_base_price() -> f64 { 10.0 } // far from real XRP/USD so simulated runs are obvious
fn default_shock_probability() -> f64 { 0.05 }
fn default_divergence_chance() -> f64 { 0.1 }
fn default_clamp_lower() -> f64 { 0.7 }
fn default_clamp_upper() -> f64 { 1.3 }
fn default_binance_url() -> String { "https://api.binance.com".to_string() }
fn default_coinbase_url() -> String { "https://api.coinbase.com".to_string() }
fn default_kraken_url() -> String { "https://api.kraken.com".to_string() }
fn default_bitfinex_url() -> String { "https://api-pub.bitfinex.com".to_string() }
fn default_request_timeout() -> u64 { 10 }
fn default_log_level() -> String { "info".to_string() }

impl Default for Config {
    fn default() -> Self {
        Self {
            session: SessionConfig {
                initial_capital: 1000.0,
                arbitrage_threshold_percent: 0.5,
                session_duration: 2.0,
                duration_unit: DurationUnit::Minutes,
                exchange1: "Binance".to_string(),
                exchange2: "Kraken".to_string(),
                trading_pair: "XRP/USD".to_string(),
                simulate_data: true,
                data_file: None,
                log_file: None,
                tick_interval_ms: default_tick_interval_ms(),
                seed: None,
            },
            simulator: SimulatorConfig::default(),
            live: LiveConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, content)
            .map_err(|e| ConfigError::FileWrite(e.to_string()))?;

        Ok(())
    }

    /// Load configuration from file, or fall back to defaults if it doesn't exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("📁 No config at {}, using defaults", path.as_ref().display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.session.validate()?;
        self.simulator.validate()?;

        if self.live.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "live.request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(String),

    #[error("Failed to write config file: {0}")]
    FileWrite(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}
