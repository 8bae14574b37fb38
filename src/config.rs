use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub list_delay_ms: u64,
    pub lookup_delay_ms: u64,
    pub tick_rate_ms: u64,
    pub log_file: String,
    pub log_level: String,
    pub fixture_path: Option<String>,
}

/// Values given on the command line; they win over every config source.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub fixture_path: Option<String>,
    pub list_delay_ms: Option<u64>,
    pub lookup_delay_ms: Option<u64>,
}

/// Where config files and environment variables are read from.
#[derive(Debug, Default, Clone)]
pub struct Sources {
    pub user_config: Option<PathBuf>,
    pub local_config: Option<PathBuf>,
    pub env_prefix: Option<&'static str>,
}

impl Sources {
    /// `~/.config/docsel/docsel.toml`, `./docsel.toml` and `DOCSEL_*`.
    pub fn system() -> Self {
        Self {
            user_config: get_user_config_path(),
            local_config: Some(PathBuf::from("docsel.toml")),
            env_prefix: Some("DOCSEL"),
        }
    }
}

impl Settings {
    pub fn new(overrides: &Overrides) -> Result<Self, ConfigError> {
        Self::load(overrides, &Sources::system())
    }

    pub fn load(overrides: &Overrides, sources: &Sources) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // 1. Built-in defaults, matching the demo service latency.
            .set_default("list_delay_ms", 700)?
            .set_default("lookup_delay_ms", 500)?
            .set_default("tick_rate_ms", 200)?
            .set_default("log_file", "~/.local/state/docsel/docsel.log")?
            .set_default("log_level", "info")?;

        // 2. User config, then 3. docsel.toml in the working directory.
        for path in [&sources.user_config, &sources.local_config].into_iter().flatten() {
            builder = builder.add_source(File::from(path.clone()).required(false));
        }

        // 4. Explicit --config file must exist.
        if let Some(path) = &overrides.config_path {
            builder = builder.add_source(File::from(path.clone()).required(true));
        }

        // 5. DOCSEL_LIST_DELAY_MS and friends.
        if let Some(prefix) = sources.env_prefix {
            builder = builder.add_source(Environment::with_prefix(prefix));
        }

        // 6. CLI flags.
        builder = builder
            .set_override_option("fixture_path", overrides.fixture_path.clone())?
            .set_override_option("list_delay_ms", overrides.list_delay_ms)?
            .set_override_option("lookup_delay_ms", overrides.lookup_delay_ms)?;

        builder.build()?.try_deserialize()
    }

    pub fn list_delay(&self) -> Duration {
        Duration::from_millis(self.list_delay_ms)
    }

    pub fn lookup_delay(&self) -> Duration {
        Duration::from_millis(self.lookup_delay_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    pub fn log_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.log_file).into_owned())
    }

    pub fn fixture(&self) -> Option<PathBuf> {
        self.fixture_path
            .as_deref()
            .map(|p| PathBuf::from(shellexpand::tilde(p).into_owned()))
    }
}

pub fn get_user_config_path() -> Option<PathBuf> {
    let mut path = dirs::home_dir()?;
    path.push(".config");
    path.push("docsel");
    path.push("docsel.toml");
    Some(path)
}
