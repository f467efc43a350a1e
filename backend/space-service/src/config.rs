/// Configuration management for Space Service
///
/// Loads configuration from environment variables.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Occupancy-report rate limits
    pub limits: ReportLimits,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// HTTP port
    pub http_port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Min connections in pool
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Rate limits applied to occupancy report submissions
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReportLimits {
    /// Minutes a user must wait before re-reporting the same space
    #[serde(default = "default_cooldown_minutes")]
    pub cooldown_minutes: i64,
    /// Maximum accepted reports per user per calendar day
    #[serde(default = "default_daily_limit")]
    pub daily_limit: i32,
}

impl Default for ReportLimits {
    fn default() -> Self {
        Self {
            cooldown_minutes: default_cooldown_minutes(),
            daily_limit: default_daily_limit(),
        }
    }
}

// Default values
fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_cooldown_minutes() -> i64 {
    15
}

fn default_daily_limit() -> i32 {
    10
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8010), // space-service default HTTP port
        };

        let database = DatabaseConfig {
            url: std::env::var("DATABASE_URL")
                .context("DATABASE_URL environment variable not set")?,
            max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_max_connections),
            min_connections: std::env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_min_connections),
        };

        let limits = ReportLimits {
            cooldown_minutes: std::env::var("REPORT_COOLDOWN_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_cooldown_minutes),
            daily_limit: std::env::var("REPORT_DAILY_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_daily_limit),
        };

        Ok(Config {
            app,
            database,
            limits,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        std::env::set_var("DATABASE_URL", "postgres://test");

        let config = Config::from_env().unwrap();

        assert_eq!(config.app.env, "development");
        assert_eq!(config.app.host, "0.0.0.0");
        assert_eq!(config.app.http_port, 8010);
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.database.min_connections, 5);
        assert_eq!(config.limits.cooldown_minutes, 15);
        assert_eq!(config.limits.daily_limit, 10);
    }
}
