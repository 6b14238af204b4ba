//! API configuration.

use std::fmt;

use thiserror::Error;

/// Minimum accepted length of the token signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Startup configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set")]
    MissingSecret,

    #[error("JWT_SECRET must be at least {MIN_SECRET_LEN} bytes")]
    WeakSecret,

    #[error("Invalid value for {0}")]
    InvalidValue(&'static str),
}

/// API server configuration.
#[derive(Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Token signing secret
    pub jwt_secret: String,
    /// Token lifetime in days
    pub token_ttl_days: i64,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Per-IP requests per second on credential routes
    pub rate_limit_rps: u32,
    /// Max request body size
    pub max_body_size: usize,
    /// Reject job mutations by recruiters other than the owner
    pub enforce_job_ownership: bool,
    /// Expose Prometheus metrics at /metrics
    pub metrics_enabled: bool,
    /// Environment (development/production)
    pub environment: String,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_days", &self.token_ttl_days)
            .field("cors_origins", &self.cors_origins)
            .field("rate_limit_rps", &self.rate_limit_rps)
            .field("max_body_size", &self.max_body_size)
            .field("enforce_job_ownership", &self.enforce_job_ownership)
            .field("metrics_enabled", &self.metrics_enabled)
            .field("environment", &self.environment)
            .finish()
    }
}

fn env_parsed<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key)),
        _ => Ok(default),
    }
}

fn env_flag(key: &'static str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}

impl ApiConfig {
    /// Configuration with the given secret and defaults everywhere else.
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            jwt_secret: jwt_secret.into(),
            token_ttl_days: 30,
            cors_origins: vec!["*".to_string()],
            rate_limit_rps: 10,
            max_body_size: 1024 * 1024, // 1MB
            enforce_job_ownership: true,
            metrics_enabled: true,
            environment: "development".to_string(),
        }
    }

    /// Create config from environment variables.
    ///
    /// There is no fallback signing secret: startup fails without one.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = std::env::var("JWT_SECRET").map_err(|_| ConfigError::MissingSecret)?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret);
        }

        let port = match std::env::var("PORT") {
            Ok(_) => env_parsed("PORT", 5000)?,
            Err(_) => env_parsed("API_PORT", 5000)?,
        };

        Ok(Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            jwt_secret,
            token_ttl_days: env_parsed("TOKEN_TTL_DAYS", 30)?,
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["*".to_string()]),
            rate_limit_rps: env_parsed("RATE_LIMIT_RPS", 10)?,
            max_body_size: env_parsed("MAX_BODY_SIZE", 1024 * 1024)?,
            enforce_job_ownership: env_flag("ENFORCE_JOB_OWNERSHIP", true),
            metrics_enabled: env_flag("METRICS_ENABLED", true),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        })
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn clear() {
        for key in [
            "JWT_SECRET",
            "PORT",
            "API_PORT",
            "TOKEN_TTL_DAYS",
            "ENFORCE_JOB_OWNERSHIP",
            "RATE_LIMIT_RPS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_missing_secret_fails() {
        clear();
        assert!(matches!(ApiConfig::from_env(), Err(ConfigError::MissingSecret)));
    }

    #[test]
    #[serial]
    fn test_short_secret_fails() {
        clear();
        std::env::set_var("JWT_SECRET", "secret");
        assert!(matches!(ApiConfig::from_env(), Err(ConfigError::WeakSecret)));
        clear();
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear();
        std::env::set_var("JWT_SECRET", SECRET);
        let config = ApiConfig::from_env().unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.token_ttl_days, 30);
        assert!(config.enforce_job_ownership);
        assert!(!format!("{:?}", config).contains(SECRET));
        clear();
    }

    #[test]
    #[serial]
    fn test_port_wins_over_api_port() {
        clear();
        std::env::set_var("JWT_SECRET", SECRET);
        std::env::set_var("API_PORT", "8000");
        std::env::set_var("PORT", "9000");
        assert_eq!(ApiConfig::from_env().unwrap().port, 9000);

        std::env::remove_var("PORT");
        assert_eq!(ApiConfig::from_env().unwrap().port, 8000);
        clear();
    }

    #[test]
    #[serial]
    fn test_invalid_number_is_rejected() {
        clear();
        std::env::set_var("JWT_SECRET", SECRET);
        std::env::set_var("RATE_LIMIT_RPS", "lots");
        assert!(matches!(
            ApiConfig::from_env(),
            Err(ConfigError::InvalidValue("RATE_LIMIT_RPS"))
        ));
        clear();
    }

    #[test]
    #[serial]
    fn test_ownership_can_be_disabled() {
        clear();
        std::env::set_var("JWT_SECRET", SECRET);
        std::env::set_var("ENFORCE_JOB_OWNERSHIP", "false");
        assert!(!ApiConfig::from_env().unwrap().enforce_job_ownership);
        clear();
    }
}
