//! Server configuration
//!
//! Read from the command line and environment:
//! - first argument, or `NASRICHAT_ADDR`: bind address
//! - `NASRICHAT_COUNTRIES`: path to a country dataset (JSON)
//! - `NASRICHAT_SUGGESTION_LIMIT`: max autocomplete suggestions

use std::env;
use std::path::PathBuf;

use crate::country::DEFAULT_SUGGESTION_LIMIT;
use crate::error::AppError;

/// Default server address
pub const DEFAULT_ADDR: &str = "127.0.0.1:5000";

pub const ADDR_VAR: &str = "NASRICHAT_ADDR";
pub const COUNTRIES_VAR: &str = "NASRICHAT_COUNTRIES";
pub const SUGGESTION_LIMIT_VAR: &str = "NASRICHAT_SUGGESTION_LIMIT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Country dataset; None means use the fallback list
    pub countries_path: Option<PathBuf>,
    pub suggestion_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_ADDR.to_string(),
            countries_path: None,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }
}

impl ServerConfig {
    /// Build from the process arguments and environment
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(env::args().nth(1), |key| env::var(key).ok())
    }

    /// Build from an explicit address argument and a variable lookup
    pub fn from_lookup<F>(addr_arg: Option<String>, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = addr_arg.or_else(|| lookup(ADDR_VAR)) {
            config.bind_addr = addr;
        }

        config.countries_path = lookup(COUNTRIES_VAR)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        if let Some(raw) = lookup(SUGGESTION_LIMIT_VAR) {
            config.suggestion_limit = match raw.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => limit,
                _ => {
                    return Err(AppError::Config(format!(
                        "{} must be a positive integer, got '{}'",
                        SUGGESTION_LIMIT_VAR, raw
                    )))
                }
            };
        }

        Ok(config)
    }
}
