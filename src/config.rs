use std::env;
use std::str::FromStr;

use log::warn;

use crate::blockchain::{DEFAULT_DIFFICULTY, MiningLimits};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

/// Runtime settings, read from the environment (and an optional `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Starting difficulty; at least 1.
    pub difficulty: u32,
    /// Nonce attempts allowed per block. `None` mines without bound.
    pub max_mining_attempts: Option<u64>,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            difficulty: DEFAULT_DIFFICULTY,
            max_mining_attempts: None,
            cors_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let host = lookup("HOST")
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or(defaults.host);
        let port = parse_or("PORT", lookup("PORT"), defaults.port);

        let mut difficulty = parse_or("DIFFICULTY", lookup("DIFFICULTY"), defaults.difficulty);
        if difficulty < 1 {
            warn!("DIFFICULTY must be at least 1, using {DEFAULT_DIFFICULTY}");
            difficulty = DEFAULT_DIFFICULTY;
        }

        let max_mining_attempts = lookup("MAX_MINING_ATTEMPTS")
            .filter(|v| !v.trim().is_empty())
            .and_then(|raw| match raw.trim().parse::<u64>() {
                Ok(n) => Some(n),
                Err(_) => {
                    warn!("ignoring MAX_MINING_ATTEMPTS={raw:?}: not a number");
                    None
                }
            });

        let cors_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty() && *o != "*")
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            host,
            port,
            difficulty,
            max_mining_attempts,
            cors_origins,
        }
    }

    pub fn mining_limits(&self) -> MiningLimits {
        match self.max_mining_attempts {
            Some(max) => MiningLimits::unbounded().with_max_attempts(max),
            None => MiningLimits::unbounded(),
        }
    }
}

fn parse_or<T: FromStr + Copy>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring {key}={raw:?}: could not parse");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::AppConfig;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = config(&[]);
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.difficulty, 3);
        assert!(cfg.mining_limits().is_unbounded());
    }

    #[test]
    fn reads_all_settings() {
        let cfg = config(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("DIFFICULTY", "2"),
            ("MAX_MINING_ATTEMPTS", "1000"),
            ("CORS_ALLOWED_ORIGINS", "http://localhost:5173, http://localhost:8080"),
        ]);
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.difficulty, 2);
        assert_eq!(cfg.max_mining_attempts, Some(1000));
        assert_eq!(cfg.mining_limits().max_attempts, Some(1000));
        assert_eq!(
            cfg.cors_origins,
            vec!["http://localhost:5173", "http://localhost:8080"]
        );
    }

    #[test]
    fn bad_values_fall_back() {
        let cfg = config(&[
            ("PORT", "eighty"),
            ("DIFFICULTY", "0"),
            ("MAX_MINING_ATTEMPTS", "lots"),
            ("CORS_ALLOWED_ORIGINS", "*"),
        ]);
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.difficulty, 3);
        assert_eq!(cfg.max_mining_attempts, None);
        assert!(cfg.cors_origins.is_empty());
    }
}
