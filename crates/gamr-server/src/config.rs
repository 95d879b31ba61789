use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "gamr.toml";

/// Top-level server configuration, loaded from `gamr.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// SQLite path, or `:memory:` for a throwaway store.
    pub database_url: String,
    /// JSON array of games inserted when the store is empty.
    pub fixtures: Option<PathBuf>,
    /// Lowers the default log level to `debug` when `RUST_LOG` is unset.
    pub debug: bool,
    pub cors_allow_any_origin: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8888".to_string(),
            database_url: "gamr.sqlite".to_string(),
            fixtures: None,
            debug: false,
            cors_allow_any_origin: true,
        }
    }
}

/// Where the loaded configuration came from. Logged once tracing is up.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
    /// The file exists but failed to parse; defaults were used.
    Invalid { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidListenAddr(String),
    EmptyDatabaseUrl,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidListenAddr(addr) => {
                write!(f, "listen_addr {addr:?} is not a valid socket address")
            },
            Self::EmptyDatabaseUrl => write!(f, "database_url must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::InvalidListenAddr(self.listen_addr.clone()));
        }
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }
        Ok(())
    }

    /// Load config from `gamr.toml` if it exists, then apply env var overrides.
    pub fn load() -> (Self, ConfigSource) {
        let (mut config, source) = Self::load_file(Path::new(CONFIG_FILE));
        config.apply_overrides(|key| std::env::var(key).ok());
        (config, source)
    }

    pub fn load_file(path: &Path) -> (Self, ConfigSource) {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<ServerConfig>(&content) {
                Ok(cfg) => (cfg, ConfigSource::File(path.to_path_buf())),
                Err(e) => (
                    ServerConfig::default(),
                    ConfigSource::Invalid {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    },
                ),
            },
            Err(_) => (ServerConfig::default(), ConfigSource::Defaults),
        }
    }

    /// Apply `GAMR_*` overrides. Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(addr) = var("GAMR_LISTEN_ADDR") {
            self.listen_addr = addr;
        }
        if let Some(url) = var("GAMR_DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(path) = var("GAMR_FIXTURES") {
            self.fixtures = Some(PathBuf::from(path));
        }
        if let Some(val) = var("GAMR_DEBUG")
            && let Ok(debug) = val.parse::<bool>()
        {
            self.debug = debug;
        }
    }

    /// Filter directive used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }
}
