#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use finance_core::{open_store, Config, ConfigManager, FinanceStore};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh base directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates an isolated config manager and a seeded store backed by JSON files.
pub fn setup_test_env() -> (FinanceStore, ConfigManager) {
    let base = temp_base();
    let manager = ConfigManager::with_base_dir(base).expect("create config manager for temp dir");
    let config = Config {
        backup_retention: 3,
        ..Config::default()
    };
    manager.save(&config).expect("save config");
    let store = open_store(&config, manager.data_dir(&config)).expect("open store");
    (store, manager)
}
