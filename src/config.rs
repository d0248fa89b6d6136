//! Server configuration from environment variables.
//!
//! `HOST` (default `0.0.0.0`), `PORT` (default `8080`), `SESSION_TTL_HOURS` (default 12),
//! `CLEANUP_INTERVAL_MINUTES` (default 30).

use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Sessions idle this long are dropped.
    pub session_ttl: Duration,
    pub cleanup_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            session_ttl: Duration::from_secs(12 * 3600),
            cleanup_interval: Duration::from_secs(30 * 60),
        }
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(v) => v.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring unparseable {}={:?}, using default", key, v);
            default
        }),
    }
}

impl ServerConfig {
    /// Read from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparseable values keep their defaults.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let d = Self::default();
        let ttl_hours = parse_or("SESSION_TTL_HOURS", lookup("SESSION_TTL_HOURS"), 12u64);
        let cleanup_minutes = parse_or(
            "CLEANUP_INTERVAL_MINUTES",
            lookup("CLEANUP_INTERVAL_MINUTES"),
            30u64,
        );
        Self {
            host: lookup("HOST").unwrap_or(d.host),
            port: parse_or("PORT", lookup("PORT"), d.port),
            session_ttl: Duration::from_secs(ttl_hours * 3600),
            cleanup_interval: Duration::from_secs(cleanup_minutes.max(1) * 60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_unset() {
        assert_eq!(ServerConfig::from_lookup(|_| None), ServerConfig::default());
    }

    #[test]
    fn reads_overrides_and_ignores_garbage() {
        let env: HashMap<&str, &str> = [
            ("HOST", "127.0.0.1"),
            ("PORT", "not-a-port"),
            ("SESSION_TTL_HOURS", "2"),
        ]
        .into_iter()
        .collect();
        let c = ServerConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(c.host, "127.0.0.1");
        assert_eq!(c.port, 8080);
        assert_eq!(c.session_ttl, Duration::from_secs(2 * 3600));
    }
}
