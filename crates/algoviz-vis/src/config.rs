//! Server and playback configuration read from the environment.

use std::net::SocketAddr;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Milliseconds per step when nothing else is configured.
pub const DEFAULT_SPEED_MS: u64 = 800;
/// Fastest speed the server accepts from clients.
pub const DEFAULT_MIN_SPEED_MS: u64 = 200;
/// Slowest speed the server accepts from clients.
pub const DEFAULT_MAX_SPEED_MS: u64 = 2000;

/// Visualizer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisConfig {
    /// Address the HTTP server listens on
    pub addr: SocketAddr,
    /// Initial playback speed
    pub speed_ms: u64,
    pub min_speed_ms: u64,
    pub max_speed_ms: u64,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            speed_ms: DEFAULT_SPEED_MS,
            min_speed_ms: DEFAULT_MIN_SPEED_MS,
            max_speed_ms: DEFAULT_MAX_SPEED_MS,
        }
    }
}

impl VisConfig {
    /// Create config from environment variables with sensible defaults.
    ///
    /// Reads `ALGOVIZ_ADDR`, `ALGOVIZ_SPEED_MS`, `ALGOVIZ_MIN_SPEED_MS` and
    /// `ALGOVIZ_MAX_SPEED_MS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            addr: read(&lookup, "ALGOVIZ_ADDR", defaults.addr)?,
            speed_ms: read(&lookup, "ALGOVIZ_SPEED_MS", defaults.speed_ms)?,
            min_speed_ms: read(&lookup, "ALGOVIZ_MIN_SPEED_MS", defaults.min_speed_ms)?,
            max_speed_ms: read(&lookup, "ALGOVIZ_MAX_SPEED_MS", defaults.max_speed_ms)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Override the listen address, e.g. from a command-line argument.
    pub fn with_addr(mut self, addr: &str) -> Result<Self> {
        self.addr = addr
            .parse()
            .map_err(|e| Error::Config(format!("invalid listen address `{addr}`: {e}")))?;
        Ok(self)
    }

    /// Clamp a requested speed into the accepted range.
    pub fn clamp_speed(&self, ms: u64) -> u64 {
        ms.clamp(self.min_speed_ms, self.max_speed_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.min_speed_ms == 0 || self.min_speed_ms > self.max_speed_ms {
            return Err(Error::Config(format!(
                "speed range {}..={} ms is empty or starts at zero",
                self.min_speed_ms, self.max_speed_ms
            )));
        }
        if self.speed_ms == 0 {
            return Err(Error::Config("ALGOVIZ_SPEED_MS must be positive".into()));
        }
        Ok(())
    }
}

fn read<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("invalid {key} `{raw}`: {e}"))),
        None => Ok(default),
    }
}
