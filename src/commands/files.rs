//! Import and export handlers.

use crate::args::{ExportArgs, ImportArgs};
use crate::clock::Clock;
use crate::commands::{plural, Out};
use crate::export::export_to_dir;
use crate::import::import_file;
use crate::model::Transaction;
use crate::{utils, Config, Result};
use std::path::PathBuf;

/// Adds the transactions in the file named by `args`. Either every record is added or none are.
pub async fn import(
    config: Config,
    clock: impl Clock + 'static,
    args: ImportArgs,
) -> Result<Out<Vec<Transaction>>> {
    let mut store = config.open_store(clock)?;
    let (imported, saved) = import_file(&mut store, args.file()).await?.into_parts();
    saved?;
    Ok(Out::new(
        format!("Imported {}", plural(imported.len(), "transaction")),
        imported,
    ))
}

/// Writes every transaction to `finance-tracker-export-<today>.json` and returns its path.
pub async fn export(
    config: Config,
    clock: impl Clock + 'static,
    args: ExportArgs,
) -> Result<Out<PathBuf>> {
    let today = clock.today();
    let store = config.open_store(clock)?;
    let dir = args.dir().unwrap_or(config.exports());
    utils::make_dir(dir).await?;
    let path = export_to_dir(dir, store.records(), today).await?;
    Ok(Out::new(
        format!(
            "Exported {} to {}",
            plural(store.len(), "transaction"),
            path.display()
        ),
        path,
    ))
}
