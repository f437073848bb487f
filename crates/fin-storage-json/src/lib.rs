use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use fin_core::{CoreError, FinanceStorage};
use fin_domain::FinanceState;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_STORAGE_KEY: &str = "your-finance-store";
pub const DEFAULT_RETENTION: usize = 5;

const EXTENSION: &str = "json";
const BACKUP_DIR: &str = "backups";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";

/// Filesystem-backed JSON persistence of the complete finance state under one storage key.
#[derive(Debug, Clone)]
pub struct JsonFinanceStorage {
    data_dir: PathBuf,
    key: String,
    retention: usize,
}

/// A backup file of the live state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
    pub path: PathBuf,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    schema_version: u32,
    saved_at: DateTime<Utc>,
    state: &'a FinanceState,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEnvelope {
    schema_version: u32,
    state: serde_json::Value,
}

impl JsonFinanceStorage {
    pub fn new(data_dir: impl Into<PathBuf>, storage_key: &str) -> Result<Self, CoreError> {
        Self::with_retention(data_dir, storage_key, DEFAULT_RETENTION)
    }

    /// Keeps at most `retention` backups; values below one are raised to one.
    pub fn with_retention(
        data_dir: impl Into<PathBuf>,
        storage_key: &str,
        retention: usize,
    ) -> Result<Self, CoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self {
            data_dir,
            key: canonical_key(storage_key),
            retention: retention.max(1),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.{}", self.key, EXTENSION))
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.data_dir.join(BACKUP_DIR)
    }

    /// Backups of this storage key, newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, CoreError> {
        let dir = self.backups_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let prefix = format!("{}_", self.key);
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION)
            {
                continue;
            }
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            // keys may share a prefix (`store`, `store_2`); only a bare timestamp suffix is ours
            let Some(created_at) = name
                .strip_prefix(&prefix)
                .and_then(parse_backup_timestamp)
            else {
                continue;
            };
            let size_bytes = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
            entries.push(BackupInfo {
                name: name.to_string(),
                created_at,
                size_bytes,
                path: path.clone(),
            });
        }
        entries.sort_by(|a, b| b.name.cmp(&a.name));
        Ok(entries)
    }

    /// Copies the named backup over the live file and returns the state it holds.
    pub fn restore_backup(&self, name: &str) -> Result<FinanceState, CoreError> {
        if name.contains(&['/', '\\'][..]) || name.starts_with('.') {
            return Err(CoreError::Storage(format!("invalid backup name `{}`", name)));
        }
        let source = self.backups_dir().join(name);
        if !source.is_file() {
            return Err(CoreError::Storage(format!("backup `{}` not found", name)));
        }
        let state = read_state(&source)?;
        let target = self.state_path();
        let tmp = tmp_path(&target);
        fs::copy(&source, &tmp)?;
        fs::rename(&tmp, &target)?;
        info!(backup = %name, key = %self.key, "restored finance state from backup");
        Ok(state)
    }

    fn backup_existing(&self, path: &Path) -> Result<(), CoreError> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backups_dir();
        fs::create_dir_all(&dir)?;
        let stem = format!(
            "{}_{}",
            self.key,
            Utc::now().format(BACKUP_TIMESTAMP_FORMAT)
        );
        let mut backup = dir.join(format!("{}.{}", stem, EXTENSION));
        let mut sequence = 1;
        while backup.exists() {
            backup = dir.join(format!("{}_{:03}.{}", stem, sequence, EXTENSION));
            sequence += 1;
        }
        fs::copy(path, &backup)?;
        self.prune_backups()
    }

    fn prune_backups(&self) -> Result<(), CoreError> {
        for entry in self.list_backups()?.into_iter().skip(self.retention) {
            debug!(backup = %entry.name, "pruning backup");
            let _ = fs::remove_file(entry.path);
        }
        Ok(())
    }
}

impl FinanceStorage for JsonFinanceStorage {
    fn load(&self) -> Result<Option<FinanceState>, CoreError> {
        let path = self.state_path();
        if !path.exists() {
            return Ok(None);
        }
        read_state(&path).map(Some)
    }

    fn save(&self, state: &FinanceState) -> Result<(), CoreError> {
        let path = self.state_path();
        self.backup_existing(&path)?;
        let tmp = tmp_path(&path);
        write_file(&tmp, &serialize_state(state)?)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), transactions = state.transactions.len(), "finance state saved");
        Ok(())
    }
}

/// Reads a state envelope from any path, rejecting schema versions newer than this build understands.
pub fn read_state(path: &Path) -> Result<FinanceState, CoreError> {
    let data = fs::read_to_string(path)?;
    let envelope: StoredEnvelope =
        serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))?;
    if envelope.schema_version > SCHEMA_VERSION {
        return Err(CoreError::Storage(format!(
            "{} uses schema version {}, newest supported is {}",
            path.display(),
            envelope.schema_version,
            SCHEMA_VERSION
        )));
    }
    let mut state: FinanceState = serde_json::from_value(envelope.state)
        .map_err(|err| CoreError::Serde(err.to_string()))?;
    state.ensure_opening_balances();
    Ok(state)
}

fn serialize_state(state: &FinanceState) -> Result<String, CoreError> {
    let envelope = Envelope {
        schema_version: SCHEMA_VERSION,
        saved_at: Utc::now(),
        state,
    };
    serde_json::to_string_pretty(&envelope).map_err(|err| CoreError::Serde(err.to_string()))
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches(&['_', '-'][..]).is_empty() {
        DEFAULT_STORAGE_KEY.into()
    } else {
        sanitized
    }
}

/// Parses `YYYYMMDD_HHMMSS[_NNN].json`.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_suffix(&format!(".{}", EXTENSION))?;
    let mut segments = stem.split('_');
    let date = segments.next()?;
    let time = segments.next()?;
    if !is_digits(date, 8) || !is_digits(time, 6) {
        return None;
    }
    if let Some(sequence) = segments.next() {
        if !is_digits(sequence, 3) || segments.next().is_some() {
            return None;
        }
    }
    NaiveDateTime::parse_from_str(&format!("{}{}", date, time), "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
