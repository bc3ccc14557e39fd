//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::clock::{Clock, FixedClock};
use crate::model::{Amount, Transaction};
use crate::store::Store;
use crate::Config;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::str::FromStr;
use tempfile::TempDir;

/// The moment `fixed_clock` is stopped at: midday on 2024-06-15, UTC.
pub(crate) const NOW: &str = "2024-06-15T12:00:00Z";

/// Test environment that sets up an expenses home directory with a Config.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub(crate) struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    pub(crate) async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load(temp_dir.path().join("expenses"))
            .await
            .unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Returns a clone of the Config.
    pub(crate) fn config(&self) -> Config {
        self.config.clone()
    }

    pub(crate) fn root(&self) -> &Path {
        self.config.root()
    }

    /// Opens the store kept in this environment's home directory.
    pub(crate) fn store(&self, clock: impl Clock + 'static) -> Store {
        self.config.open_store(clock).unwrap()
    }
}

pub(crate) fn timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

/// A clock stopped at `NOW`.
pub(crate) fn fixed_clock() -> FixedClock {
    FixedClock::new(timestamp(NOW))
}

/// Builds a transaction that was created and last updated on 2024-06-01.
pub(crate) fn transaction(
    id: &str,
    description: &str,
    amount: &str,
    category: &str,
    date: &str,
) -> Transaction {
    let created = timestamp("2024-06-01T08:00:00Z");
    Transaction {
        id: id.to_string(),
        description: description.to_string(),
        amount: Amount::from_str(amount).unwrap(),
        category: category.to_string(),
        date: date.to_string(),
        created_at: created,
        updated_at: created,
    }
}
