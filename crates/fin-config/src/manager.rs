use std::{
    env,
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use crate::{Config, ConfigError};

/// Overrides the base directory for config and data.
pub const HOME_ENV: &str = "FINANCE_CORE_HOME";
const DEFAULT_DIR_NAME: &str = "your-finance";
const STAGED_EXTENSION: &str = "json.tmp";

/// `$FINANCE_CORE_HOME`, else the platform data directory joined with `your-finance`.
pub fn default_base_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Handles persistence of [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base_dir: PathBuf,
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(base_dir: PathBuf, config_path: PathBuf) -> Self {
        Self {
            base_dir,
            config_path,
        }
    }

    /// Uses `<base>/config/config.json`, creating the directory if needed.
    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let config_dir = base.join("config");
        fs::create_dir_all(&config_dir)?;
        let config_path = config_dir.join("config.json");
        Ok(Self::new(base, config_path))
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::with_base_dir(default_base_dir())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Absent config files yield the defaults.
    pub fn load(&self) -> Result<Config, ConfigError> {
        match fs::read_to_string(&self.config_path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Config::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Writes `config.json.tmp` next to the target, then renames it into place.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(dir) = self.config_path.parent() {
            fs::create_dir_all(dir)?;
        }
        let staged = self.config_path.with_extension(STAGED_EXTENSION);
        let mut file = File::create(&staged)?;
        serde_json::to_writer_pretty(&mut file, config)?;
        file.sync_all()?;
        fs::rename(&staged, &self.config_path)?;
        Ok(())
    }

    pub fn data_dir(&self, config: &Config) -> PathBuf {
        config.resolve_data_dir(&self.base_dir)
    }
}
