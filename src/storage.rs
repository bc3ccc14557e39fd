//! Key-value persistence for the stored documents: the transaction list, the settings and the
//! bookkeeping the store needs to hand out ids.
//!
//! The `Storage` trait is deliberately small so that backends are easy to swap. `FileStorage`
//! keeps one JSON file per key in a directory; `MemoryStorage` keeps everything in memory and can
//! be told to fail writes, which is how tests exercise a full disk.

use crate::model::{Settings, Transaction};
use crate::{fs, Result};
use anyhow::{anyhow, bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// The key under which the transaction list is stored.
pub const RECORDS_KEY: &str = "sft:data";

/// The key under which the settings document is stored.
pub const SETTINGS_KEY: &str = "sft:settings";

/// The key under which the store's bookkeeping is stored.
pub const META_KEY: &str = "sft:meta";

/// A string-keyed store of string documents.
pub trait Storage: Debug {
    /// Returns the document stored under `key`, or `None` if there is none.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the document stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Stores each document as `<key>.json` inside a directory. `:` in keys is written as `-`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates the directory if it does not exist.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).context("Unable to create the storage directory")?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file that holds the document for `key`.
    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key.replace(':', "-")))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        fs::read_optional(self.path(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::replace(self.path(key), value)
    }
}

/// An in-memory store. Clones share the same underlying data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    data: Arc<Mutex<BTreeMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// When `fail` is true every subsequent `set` returns an error, as a full disk or an exceeded
    /// browser quota would.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let data = self
            .data
            .lock()
            .map_err(|_| anyhow!("The storage lock is poisoned"))?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("Storage quota exceeded while writing '{key}'");
        }
        let mut data = self
            .data
            .lock()
            .map_err(|_| anyhow!("The storage lock is poisoned"))?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Loads the stored transactions. A missing document is an empty list.
///
/// # Errors
/// - Returns an error if the document cannot be read or is not a valid transaction list.
pub fn load_records(storage: &dyn Storage) -> Result<Vec<Transaction>> {
    let Some(json) = storage.get(RECORDS_KEY)? else {
        debug!("No stored transactions found, starting empty");
        return Ok(Vec::new());
    };
    let records: Vec<Transaction> =
        serde_json::from_str(&json).context("Failed to parse the stored transactions")?;
    debug!("Loaded {} transactions", records.len());
    Ok(records)
}

/// Replaces the stored transactions with `records`.
pub fn save_records(storage: &dyn Storage, records: &[Transaction]) -> Result<()> {
    let json = serde_json::to_string(records).context("Unable to serialize transactions")?;
    storage
        .set(RECORDS_KEY, &json)
        .context("Failed to save transactions")
}

/// Bookkeeping kept next to the transactions.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreMeta {
    /// The sequence number of the newest id ever issued, including ids of deleted records.
    pub last_id: u64,
}

/// Loads the store bookkeeping. A missing or unreadable document is the default.
pub fn load_meta(storage: &dyn Storage) -> StoreMeta {
    match storage.get(META_KEY) {
        Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
            warn!("Failed to parse the stored bookkeeping, ignoring it: {e}");
            StoreMeta::default()
        }),
        Ok(None) => StoreMeta::default(),
        Err(e) => {
            warn!("Failed to load the stored bookkeeping, ignoring it: {e:#}");
            StoreMeta::default()
        }
    }
}

pub fn save_meta(storage: &dyn Storage, meta: StoreMeta) -> Result<()> {
    let json = serde_json::to_string(&meta).context("Unable to serialize bookkeeping")?;
    storage
        .set(META_KEY, &json)
        .context("Failed to save bookkeeping")
}

/// Loads the stored settings, falling back to the defaults if there are none or they cannot be
/// read.
pub fn load_settings(storage: &dyn Storage) -> Settings {
    match storage.get(SETTINGS_KEY) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to parse the stored settings, using defaults: {e}");
                Settings::default()
            }
        },
        Ok(None) => Settings::default(),
        Err(e) => {
            warn!("Failed to load settings, using defaults: {e:#}");
            Settings::default()
        }
    }
}

/// Replaces the stored settings.
pub fn save_settings(storage: &dyn Storage, settings: &Settings) -> Result<()> {
    let json = serde_json::to_string(settings).context("Unable to serialize settings")?;
    storage
        .set(SETTINGS_KEY, &json)
        .context("Failed to save settings")
}
