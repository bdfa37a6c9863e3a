/// Shell configuration
use crate::error::{Result, ShellError};
use encore_playback::PlayerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "encore.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Device tick in milliseconds (one track line per tick)
    pub tick_ms: u64,

    /// Start with repeat mode on
    pub repeat: bool,

    /// Start with random mode on
    pub random: bool,

    /// Track files loaded into the initial playlist
    pub tracks: Vec<PathBuf>,

    /// Log filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            repeat: false,
            random: false,
            tracks: Vec::new(),
            log_filter: default_log_filter(),
        }
    }
}

fn default_tick_ms() -> u64 {
    1000
}

fn default_log_filter() -> String {
    "encore=info,encore_shell=info,encore_playback=info,encore_device=info".to_string()
}

/// Environment overrides: `ENCORE_TICK_MS=500`, `ENCORE_REPEAT=true`, ...
///
/// Keys contain underscores themselves, so nesting uses `__`.
fn environment() -> config::Environment {
    config::Environment::with_prefix("ENCORE")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl ShellConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `encore.toml` is read when
    /// present. `ENCORE_*` environment variables override file values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, environment())
    }

    fn load_with(path: Option<&Path>, environment: config::Environment) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(environment);

        let config = settings
            .build()
            .map_err(|e| ShellError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ShellError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            return Err(ShellError::Config(
                "tick_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn player_config(&self) -> PlayerConfig {
        PlayerConfig {
            repeat: self.repeat,
            random: self.random,
        }
    }
}
