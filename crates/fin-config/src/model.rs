use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User preferences for formatting, persistence and logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    /// Name of the persisted state record.
    #[serde(default = "Config::default_storage_key")]
    pub storage_key: String,
    /// Directory holding the state file and its backups. Defaults to `<base>/data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
    #[serde(default = "Config::default_log_filter")]
    pub log_filter: String,
    /// Show `Rp 4.4jt` instead of `Rp 4.442.000` where space is tight.
    #[serde(default)]
    pub compact_amounts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            currency: Self::default_currency(),
            storage_key: Self::default_storage_key(),
            data_dir: None,
            backup_retention: Self::default_backup_retention(),
            log_filter: Self::default_log_filter(),
            compact_amounts: false,
        }
    }
}

impl Config {
    pub fn default_locale() -> String {
        "id-ID".into()
    }

    pub fn default_currency() -> String {
        "IDR".into()
    }

    pub fn default_storage_key() -> String {
        "your-finance-store".into()
    }

    pub fn default_backup_retention() -> usize {
        5
    }

    pub fn default_log_filter() -> String {
        "finance_core=info,fin_core=info".into()
    }

    /// Retention actually applied by storage; never below one.
    pub fn effective_retention(&self) -> usize {
        self.backup_retention.max(1)
    }

    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        match &self.data_dir {
            Some(path) => path.clone(),
            None => base.join("data"),
        }
    }
}
