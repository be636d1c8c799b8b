use std::env;
use std::path::PathBuf;

use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::models::{DividendQuantity, PriceMode};

/// Default name of the output artifact, relative to the working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "activities-import.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable [{0}]")]
    Missing(&'static str),
    #[error("Invalid value [{value}] for [{variable}], expected one of: {expected}")]
    Invalid {
        variable: &'static str,
        value: String,
        expected: &'static str
    }
}

/// Full run configuration, collected from the environment once at startup
/// and passed down explicitly. Nothing below this layer reads the
/// environment. A `.env` file next to the binary is honored.
#[derive(Debug, Clone)]
pub struct Config {
    pub input_path: PathBuf,
    pub account_id: String,
    pub api_url: String,
    pub api_secret: String,
    pub output_path: PathBuf,
    pub dividend_quantity: DividendQuantity,
    pub price_mode: PriceMode,
    pub log_level: LevelFilter
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            input_path: required("IMPORT_INPUT_PATH")?.into(),
            account_id: required("IMPORT_ACCOUNT_ID")?,
            api_url: required("IMPORT_API_URL")?.trim_end_matches('/').to_string(),
            api_secret: required("IMPORT_API_SECRET")?,
            output_path: optional("IMPORT_OUTPUT_PATH")
                .unwrap_or_else(|| DEFAULT_OUTPUT_PATH.to_string())
                .into(),
            dividend_quantity: dividend_quantity(optional("IMPORT_DIVIDEND_QUANTITY"))?,
            price_mode: price_mode(optional("IMPORT_PRICE_MODE"))?,
            log_level: log_level(optional("IMPORT_LOG_LEVEL"))
        })
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn dividend_quantity(value: Option<String>) -> Result<DividendQuantity, ConfigError> {
    match value.as_deref() {
        None => Ok(DividendQuantity::default()),
        Some("zero") => Ok(DividendQuantity::Zero),
        Some("one") => Ok(DividendQuantity::One),
        Some(other) => Err(ConfigError::Invalid {
            variable: "IMPORT_DIVIDEND_QUANTITY",
            value: other.to_string(),
            expected: "zero, one"
        })
    }
}

fn price_mode(value: Option<String>) -> Result<PriceMode, ConfigError> {
    match value.as_deref() {
        None => Ok(PriceMode::default()),
        Some("total") => Ok(PriceMode::Total),
        Some("per-unit") => Ok(PriceMode::PerUnit),
        Some(other) => Err(ConfigError::Invalid {
            variable: "IMPORT_PRICE_MODE",
            value: other.to_string(),
            expected: "total, per-unit"
        })
    }
}

fn log_level(value: Option<String>) -> LevelFilter {
    let Some(value) = value else {
        return LevelFilter::INFO;
    };

    match value.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'info'", value);
            LevelFilter::INFO
        }
    }
}
