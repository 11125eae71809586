//! # API Configuration
//!
//! Environment-based configuration for the analytics API service.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use school_analytics::recent::DEFAULT_RECENT_LIMIT;

use crate::error::{ApiError, ApiResult};

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8080";

/// API server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub server_addr: SocketAddr,

    /// Logging level, used when `RUST_LOG` is unset
    pub log_level: String,

    /// JSON dataset backing the in-memory store
    pub dataset_path: PathBuf,

    /// Number of recently due assessments per report
    pub recent_assessment_limit: usize,

    /// CORS allowed origins
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Only an unparseable `SERVER_ADDR` is an error; everything else falls
    /// back to its default.
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ApiResult<Self> {
        let raw_addr = lookup("SERVER_ADDR").unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());
        let server_addr = raw_addr
            .parse()
            .map_err(|_| ApiError::Config(format!("invalid SERVER_ADDR '{raw_addr}'")))?;

        Ok(Self {
            server_addr,

            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),

            dataset_path: lookup("DATASET_PATH")
                .map_or_else(|| PathBuf::from("data/dataset.json"), PathBuf::from),

            recent_assessment_limit: lookup("RECENT_ASSESSMENT_LIMIT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_RECENT_LIMIT),

            cors_origins: lookup("CORS_ORIGINS")
                .unwrap_or_else(|| "*".to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ApiResult<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.server_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.dataset_path, PathBuf::from("data/dataset.json"));
        assert_eq!(config.recent_assessment_limit, 6);
        assert_eq!(config.cors_origins, vec!["*".to_string()]);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("SERVER_ADDR", "127.0.0.1:9000"),
            ("RECENT_ASSESSMENT_LIMIT", "10"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
            ("DATASET_PATH", "/srv/school.json"),
        ])
        .unwrap();
        assert_eq!(config.server_addr.port(), 9000);
        assert_eq!(config.recent_assessment_limit, 10);
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(config.cors_origins[1], "https://b.example");
        assert_eq!(config.dataset_path, PathBuf::from("/srv/school.json"));
    }

    #[test]
    fn test_bad_limit_falls_back() {
        let config = config(&[("RECENT_ASSESSMENT_LIMIT", "lots")]).unwrap();
        assert_eq!(config.recent_assessment_limit, 6);
    }

    #[test]
    fn test_bad_server_addr_is_an_error() {
        let err = config(&[("SERVER_ADDR", "not-an-addr")]).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }
}
