//! Unified error handling for the spread arbitrage bot
//!
//! Module-level errors (`ConfigError`, `PriceError`) convert into `TradingError`
//! so the binary can report a single, actionable message.

use std::fmt;
use std::io;

/// Main error type for the arbitrage bot
#[derive(Debug)]
pub enum TradingError {
    // Price source errors (transient, a tick is skipped)
    PriceUnavailable(String),
    UnsupportedExchange(String),

    // Configuration errors (fatal at session start)
    ConfigNotFound(String),
    ConfigParse(String),
    ConfigValidation(String),

    // IO errors
    FileRead(String),
    FileWrite(String),

    // General errors
    Internal(String),
}

impl TradingError {
    /// Get a user-friendly error message with helpful context
    pub fn user_message(&self) -> String {
        match self {
            TradingError::ConfigNotFound(path) => {
                format!(
                    "Configuration file not found: {}\n\n\
                    💡 Quick fix:\n\
                    1. Run: arb-bot init\n\
                    2. Edit config.toml with your session settings\n\
                    3. Try again",
                    path
                )
            }
            TradingError::ConfigValidation(msg) => {
                format!(
                    "Configuration validation error: {}\n\n\
                    💡 Check config.toml for:\n\
                    - Positive capital and threshold\n\
                    - A duration unit of seconds, minutes, hours or days\n\
                    - Two different exchanges and a BASE/QUOTE trading pair",
                    msg
                )
            }
            TradingError::UnsupportedExchange(exchange) => {
                format!(
                    "Exchange not supported: {}\n\n\
                    💡 Live quotes are available for Binance, Coinbase, Kraken and Bitfinex.\n\
                    Any name works with simulate_data = true",
                    exchange
                )
            }
            _ => self.to_string(),
        }
    }

    /// Fatal errors stop a session before it starts; the rest only skip a tick
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TradingError::ConfigNotFound(_)
                | TradingError::ConfigParse(_)
                | TradingError::ConfigValidation(_)
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            TradingError::PriceUnavailable(_) | TradingError::UnsupportedExchange(_) => "price",

            TradingError::ConfigNotFound(_)
            | TradingError::ConfigParse(_)
            | TradingError::ConfigValidation(_) => "config",

            TradingError::FileRead(_) | TradingError::FileWrite(_) => "io",

            TradingError::Internal(_) => "internal",
        }
    }
}

impl fmt::Display for TradingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradingError::PriceUnavailable(msg) => {
                write!(f, "Price unavailable: {}", msg)
            }
            TradingError::UnsupportedExchange(exchange) => {
                write!(f, "Exchange {} not supported", exchange)
            }

            TradingError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path)
            }
            TradingError::ConfigParse(msg) => {
                write!(f, "Configuration parse error: {}", msg)
            }
            TradingError::ConfigValidation(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }

            TradingError::FileRead(msg) => {
                write!(f, "File read error: {}", msg)
            }
            TradingError::FileWrite(msg) => {
                write!(f, "File write error: {}", msg)
            }

            TradingError::Internal(msg) => {
                write!(f, "Internal error: {}", msg)
            }
        }
    }
}

impl std::error::Error for TradingError {}

impl From<io::Error> for TradingError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => TradingError::FileRead(err.to_string()),
            io::ErrorKind::PermissionDenied => TradingError::FileWrite(err.to_string()),
            _ => TradingError::Internal(format!("IO error: {}", err)),
        }
    }
}

impl From<crate::config::ConfigError> for TradingError {
    fn from(err: crate::config::ConfigError) -> Self {
        use crate::config::ConfigError;
        match err {
            ConfigError::FileRead(msg) => TradingError::FileRead(msg),
            ConfigError::FileWrite(msg) => TradingError::FileWrite(msg),
            ConfigError::Parse(msg) => TradingError::ConfigParse(msg),
            ConfigError::Serialize(msg) => TradingError::Internal(msg),
            ConfigError::Validation(msg) => TradingError::ConfigValidation(msg),
        }
    }
}

impl From<crate::clients::PriceError> for TradingError {
    fn from(err: crate::clients::PriceError) -> Self {
        use crate::clients::PriceError;
        match err {
            PriceError::UnsupportedExchange(exchange) => TradingError::UnsupportedExchange(exchange),
            other => TradingError::PriceUnavailable(other.to_string()),
        }
    }
}

/// Result type alias using TradingError
pub type TradingResult<T> = Result<T, TradingError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::PriceError;
    use crate::config::ConfigError;

    #[test]
    fn test_error_display() {
        let err = TradingError::ConfigNotFound("config.toml".to_string());
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_error_category() {
        let err = TradingError::ConfigValidation("test".to_string());
        assert_eq!(err.category(), "config");

        let err = TradingError::PriceUnavailable("test".to_string());
        assert_eq!(err.category(), "price");

        let err = TradingError::FileWrite("test".to_string());
        assert_eq!(err.category(), "io");
    }

    #[test]
    fn test_only_config_errors_are_fatal() {
        assert!(TradingError::ConfigValidation("bad unit".to_string()).is_fatal());
        assert!(!TradingError::PriceUnavailable("timeout".to_string()).is_fatal());
        assert!(!TradingError::UnsupportedExchange("Gemini".to_string()).is_fatal());
    }

    #[test]
    fn test_price_error_conversion() {
        let err: TradingError = PriceError::UnsupportedExchange("Gemini".to_string()).into();
        assert!(matches!(err, TradingError::UnsupportedExchange(ref name) if name == "Gemini"));

        let err: TradingError = PriceError::HttpStatus {
            exchange: "Kraken".to_string(),
            status: 503,
        }
        .into();
        assert!(matches!(err, TradingError::PriceUnavailable(_)));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_config_error_conversion() {
        let err: TradingError = ConfigError::Validation("initial_capital must be positive".to_string()).into();
        assert!(err.is_fatal());
        assert!(err.user_message().contains("💡"));

        let err: TradingError = ConfigError::Parse("missing field `session`".to_string()).into();
        assert!(matches!(err, TradingError::ConfigParse(_)));
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test");
        let trading_err: TradingError = io_err.into();
        assert!(matches!(trading_err, TradingError::FileRead(_)));
    }
}
