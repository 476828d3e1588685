//! Configuration management.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration structure that matches the TOML file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    session: SessionConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ServerConfig {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    /// Absolute prefix for the message endpoint announced over SSE
    public_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionConfig {
    /// How long a reply may wait for room in the session slot
    #[serde(default = "default_reply_timeout_ms")]
    reply_timeout_ms: u64,
    /// Interval between SSE keep-alive comments
    #[serde(default = "default_keep_alive_secs")]
    keep_alive_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reply_timeout_ms: default_reply_timeout_ms(),
            keep_alive_secs: default_keep_alive_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct LoggingConfig {
    /// Path to log file (if set, logs will be written to file in addition to stdout)
    log_file: Option<PathBuf>,
    /// Log level (trace, debug, info, warn, error)
    /// If not set, uses RUST_LOG environment variable or defaults to "info"
    log_level: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    mcp_time_types::DEFAULT_PORT
}

fn default_reply_timeout_ms() -> u64 {
    crate::mcp::dispatch::DEFAULT_REPLY_TIMEOUT.as_millis() as u64
}

fn default_keep_alive_secs() -> u64 {
    crate::state::DEFAULT_KEEP_ALIVE.as_secs()
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Absolute prefix for the message endpoint in the SSE handshake
    pub public_url: Option<String>,
    /// Bound on how long a reply waits for its session slot
    pub reply_timeout: Duration,
    /// Interval between SSE keep-alive comments
    pub keep_alive: Duration,
    /// Path to log file (if set, logs will be written to file in addition to stdout)
    pub log_file: Option<PathBuf>,
    /// Log level (if set, overrides RUST_LOG environment variable)
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration with full priority chain: CLI args > env vars > config files > defaults.
    ///
    /// Config files are searched in this order:
    /// 1. `config.toml` in user config directory (~/.config/mcp-time/ on Linux)
    /// 2. `.mcp-time.toml` in current directory
    ///
    /// Environment variables use the `MCP_TIME_` prefix with `__` between
    /// section and key, e.g. `MCP_TIME_SERVER__PORT=9000` or
    /// `MCP_TIME_SESSION__REPLY_TIMEOUT_MS=500`.
    pub fn from_figment(
        host: Option<String>,
        port: Option<u16>,
        public_url: Option<String>,
    ) -> anyhow::Result<Self> {
        let local_config = std::env::current_dir()
            .ok()
            .map(|d| d.join(".mcp-time.toml"));
        let user_config = directories::ProjectDirs::from("", "", "mcp-time")
            .map(|dirs| dirs.config_dir().join("config.toml"));

        // defaults < user config < local config < env vars < CLI args
        let mut figment = Figment::new().merge(Serialized::defaults(ConfigFile::default()));

        if let Some(ref path) = user_config {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        if let Some(ref path) = local_config {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed("MCP_TIME_").split("__"));

        if let Some(ref h) = host {
            figment = figment.merge(Serialized::default("server.host", h));
        }
        if let Some(p) = port {
            figment = figment.merge(Serialized::default("server.port", p));
        }
        if let Some(ref url) = public_url {
            figment = figment.merge(Serialized::default("server.public_url", url));
        }

        let config_file: ConfigFile = figment.extract()?;
        Ok(Self::from(config_file))
    }

    /// Socket address to bind.
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self.host.parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl From<ConfigFile> for Config {
    fn from(file: ConfigFile) -> Self {
        Self {
            host: file.server.host,
            port: file.server.port,
            public_url: file.server.public_url,
            reply_timeout: Duration::from_millis(file.session.reply_timeout_ms),
            keep_alive: Duration::from_secs(file.session.keep_alive_secs),
            log_file: file.logging.log_file,
            log_level: file.logging.log_level,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from(ConfigFile::default())
    }
}
