//! Wires configuration, JSON storage and the finance store together.

use std::path::PathBuf;

use fin_config::{Config, ConfigManager};
use fin_core::{
    format::{CurrencyFormatter, DateFormatter, IndonesianDateFormatter, RupiahFormatter},
    FinanceStore,
};
use fin_domain::Amount;
use fin_storage_json::JsonFinanceStorage;
use tracing::info;

use crate::errors::Result;

/// A ready-to-use store plus the configuration it was opened with.
pub struct FinanceApp {
    config: Config,
    data_dir: PathBuf,
    store: FinanceStore,
    currency: RupiahFormatter,
    dates: IndonesianDateFormatter,
}

impl FinanceApp {
    /// Loads config from `manager` and opens the store it points at.
    pub fn open(manager: &ConfigManager) -> Result<Self> {
        let config = manager.load()?;
        let data_dir = manager.data_dir(&config);
        let store = open_store(&config, data_dir.clone())?;
        info!(data_dir = %data_dir.display(), key = %config.storage_key, "finance app ready");
        Ok(Self {
            currency: RupiahFormatter::for_locale(&config.locale),
            dates: IndonesianDateFormatter,
            config,
            data_dir,
            store,
        })
    }

    /// Opens using `$FINANCE_CORE_HOME` or the platform data directory.
    pub fn open_default() -> Result<Self> {
        Self::open(&ConfigManager::from_env()?)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    pub fn store(&self) -> &FinanceStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut FinanceStore {
        &mut self.store
    }

    /// Formats an amount honouring the `compact_amounts` preference.
    pub fn format_amount(&self, amount: Amount) -> String {
        if self.config.compact_amounts {
            self.currency.format_compact(amount)
        } else {
            self.currency.format_amount(amount)
        }
    }

    pub fn format_date(&self, date: chrono::NaiveDate) -> String {
        self.dates.format_date(date)
    }
}

/// Opens a store persisted as JSON under `data_dir` with the configured key and retention.
pub fn open_store(config: &Config, data_dir: PathBuf) -> Result<FinanceStore> {
    let storage = JsonFinanceStorage::with_retention(
        data_dir,
        &config.storage_key,
        config.effective_retention(),
    )?;
    Ok(FinanceStore::open(Box::new(storage))?)
}
