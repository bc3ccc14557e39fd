//! Exporting transactions as a JSON document that `import` can read back.

use crate::model::Transaction;
use crate::{utils, Result};
use anyhow::Context;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Serializes `records` as a pretty-printed JSON array.
pub fn export_json(records: &[Transaction]) -> Result<String> {
    serde_json::to_string_pretty(records).context("Unable to serialize transactions for export")
}

/// The name of the export file written on `date`, e.g. `finance-tracker-export-2024-06-15.json`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("finance-tracker-export-{}.json", date.format("%Y-%m-%d"))
}

/// Writes `records` into `dir` under the export file name for `date` and returns the path.
pub async fn export_to_dir(
    dir: impl AsRef<Path>,
    records: &[Transaction],
    date: NaiveDate,
) -> Result<PathBuf> {
    let path = dir.as_ref().join(export_file_name(date));
    let json = export_json(records)?;
    utils::write(&path, json).await?;
    debug!("Exported {} transactions to {}", records.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::parse_import;
    use crate::test::transaction;
    use tempfile::TempDir;

    #[test]
    fn test_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            export_file_name(date),
            "finance-tracker-export-2024-03-09.json"
        );
    }

    #[test]
    fn test_export_is_importable() {
        let records = vec![
            transaction("rec_1", "Lunch", "12.5", "Food", "2024-06-01"),
            transaction("rec_2", "Rent", "900", "Housing", "2024-06-01"),
        ];
        let json = export_json(&records).unwrap();
        assert!(json.contains("\n  {"));
        assert!(json.contains("\"createdAt\""));

        let batch = parse_import(&json).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].id.as_deref(), Some("rec_1"));
        assert_eq!(batch[0].fields, records[0].fields());
        assert_eq!(batch[1].created_at, Some(records[1].created_at()));
    }

    #[test]
    fn test_empty_export() {
        assert_eq!(export_json(&[]).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_export_to_dir() {
        let dir = TempDir::new().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let records = vec![transaction("rec_1", "Lunch", "12.5", "Food", "2024-06-01")];
        let path = export_to_dir(dir.path(), &records, date).await.unwrap();
        assert_eq!(
            path,
            dir.path().join("finance-tracker-export-2024-06-15.json")
        );
        let written = utils::read(&path).await.unwrap();
        assert_eq!(written, export_json(&records).unwrap());
    }
}
