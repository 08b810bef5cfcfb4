use std::str::FromStr;

/// Default bind port.
pub const DEFAULT_PORT: u16 = 9124;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// HTTP server configuration loaded from environment variables.
///
/// All fields have defaults suitable for running on the monitored host.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `9124`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `10`).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default   |
    /// |------------------------|-----------|
    /// | `ZEROSTAT_HOST`        | `0.0.0.0` |
    /// | `ZEROSTAT_PORT`        | `9124`    |
    /// | `REQUEST_TIMEOUT_SECS` | `10`      |
    pub fn from_env() -> Self {
        let host = std::env::var("ZEROSTAT_HOST")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "0.0.0.0".into());

        Self {
            host,
            port: env_or("ZEROSTAT_PORT", DEFAULT_PORT),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, %default, "Invalid number in environment, using default");
            default
        }),
        _ => default,
    }
}
