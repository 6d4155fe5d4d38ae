//! Configuration for mcrcon
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;

use crate::cache::ServerKey;

/// Default RCON port used by Minecraft servers
pub const DEFAULT_PORT: u16 = 25575;

/// Main configuration for an RCON session
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Server Configuration
    // -------------------------------------------------------------------------
    /// Server host name or address
    pub host: String,

    /// Server RCON port
    pub port: u16,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Connect/read/write timeout (milliseconds)
    pub timeout_ms: u64,

    /// Reconnect schedule for the interactive connection
    pub backoff: Backoff,

    // -------------------------------------------------------------------------
    // Discovery Configuration
    // -------------------------------------------------------------------------
    /// Directory holding one command cache file per server
    pub cache_dir: PathBuf,

    /// How often the background connection refreshes the player list
    pub player_refresh_interval: Duration,

    /// Command that lists help pages (`?`, `help`)
    pub help_command: String,

    /// Command that lists online players
    pub player_list_command: String,
}

/// Exponential reconnect schedule
///
/// Attempt `n` (zero-based) waits `initial_delay * 2^n`, capped at `max_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    /// Number of reconnect attempts before giving up
    pub max_attempts: u32,

    /// Delay before the first attempt
    pub initial_delay: Duration,

    /// Upper bound for any single delay
    pub max_delay: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl Backoff {
    /// Delay before the given zero-based attempt
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    /// The full schedule, one delay per attempt
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.max_attempts).map(move |attempt| self.delay_for(attempt))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            timeout_ms: 10_000,
            backoff: Backoff::default(),
            cache_dir: Self::default_cache_dir(),
            player_refresh_interval: Duration::from_secs(60),
            help_command: "?".to_string(),
            player_list_command: "list".to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Socket timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Identity of the configured server, used to key the cache
    pub fn server_key(&self) -> ServerKey {
        ServerKey::new(&self.host, self.port)
    }

    /// Platform cache directory, or `./.mcrcon/cache` when none is known
    pub fn default_cache_dir() -> PathBuf {
        ProjectDirs::from("", "", "mcrcon")
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".mcrcon").join("cache"))
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server RCON port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the socket timeout (in milliseconds)
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeout_ms = ms;
        self
    }

    /// Set the reconnect schedule
    pub fn backoff(mut self, backoff: Backoff) -> Self {
        self.config.backoff = backoff;
        self
    }

    /// Set the cache directory
    pub fn cache_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.cache_dir = path.into();
        self
    }

    /// Set the player list refresh interval
    pub fn player_refresh_interval(mut self, interval: Duration) -> Self {
        self.config.player_refresh_interval = interval;
        self
    }

    /// Set the help command
    pub fn help_command(mut self, command: impl Into<String>) -> Self {
        self.config.help_command = command.into();
        self
    }

    /// Set the player list command
    pub fn player_list_command(mut self, command: impl Into<String>) -> Self {
        self.config.player_list_command = command.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
