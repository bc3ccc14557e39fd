//! The expenses home directory.
//!
//! Everything the app stores lives under `$EXPENSES_HOME`: one JSON document per storage key and
//! an `exports` directory that export files are written to by default.

use crate::clock::Clock;
use crate::model::Settings;
use crate::storage::{self, FileStorage};
use crate::store::Store;
use crate::{utils, Result};
use anyhow::Context;
use std::path::{Path, PathBuf};

const EXPORTS: &str = "exports";

/// The `Config` object represents the home directory of the app. `Config::load` creates the
/// directory and its subdirectories if they are missing, and provides the storage backend that
/// reads and writes the documents inside it.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    exports: PathBuf,
}

impl Config {
    /// Creates the home directory if needed, canonicalizes it and ensures `exports` exists inside.
    ///
    /// # Errors
    /// - Returns an error if any directory cannot be created or resolved.
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the expenses home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let exports = root.join(EXPORTS);
        utils::make_dir(&exports).await?;

        Ok(Self { root, exports })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The default directory for export files.
    pub fn exports(&self) -> &Path {
        &self.exports
    }

    /// A storage backend rooted at the home directory.
    pub fn storage(&self) -> Result<FileStorage> {
        FileStorage::new(&self.root)
    }

    /// Opens the transaction store kept in the home directory.
    pub fn open_store(&self, clock: impl Clock + 'static) -> Result<Store> {
        Store::open(self.storage()?, clock)
            .with_context(|| format!("Unable to open the store in {}", self.root.display()))
    }

    /// The settings stored in the home directory, or the defaults.
    pub fn settings(&self) -> Result<Settings> {
        Ok(storage::load_settings(&self.storage()?))
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        storage::save_settings(&self.storage()?, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Theme;
    use crate::storage::{Storage, RECORDS_KEY};
    use crate::test::fixed_clock;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_load_creates_directories() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("a").join("expenses");
        let config = Config::load(&home).await.unwrap();
        assert!(config.root().is_absolute());
        assert!(config.root().is_dir());
        assert!(config.exports().is_dir());
        assert_eq!(config.exports(), config.root().join("exports"));

        // Loading an existing home is fine.
        let again = Config::load(&home).await.unwrap();
        assert_eq!(again.root(), config.root());
    }

    #[tokio::test]
    async fn test_store_persists_to_home() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).await.unwrap();
        let store = config.open_store(fixed_clock()).unwrap();
        assert!(store.is_empty());

        let storage = config.storage().unwrap();
        storage.set(RECORDS_KEY, "[]").unwrap();
        assert!(config.root().join("sft-data.json").is_file());
    }

    #[tokio::test]
    async fn test_settings_round_trip() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).await.unwrap();
        assert_eq!(config.settings().unwrap(), Settings::default());

        let mut settings = Settings::default();
        settings.set_theme(Theme::Dark);
        config.save_settings(&settings).unwrap();
        assert_eq!(config.settings().unwrap().theme(), Theme::Dark);
    }
}
