//! Bulk import of transactions from a JSON document.
//!
//! The document must be an array of objects. Each object is checked for shape only: the
//! required fields are present and of the right JSON type. The first offending item rejects the
//! whole batch.

use crate::model::{Amount, Transaction, TransactionFields};
use crate::store::{Persisted, Store};
use crate::{utils, Result};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// A transaction read from an import document, before it has been given an id or timestamps.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ImportedRecord {
    /// `None` when the document has no id, or an empty one.
    pub id: Option<String>,
    pub fields: TransactionFields,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Why an import batch was rejected.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Invalid JSON file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid file format: expected an array of transactions")]
    NotAnArray,

    #[error("Record {index}: {}", describe(.field, .problem))]
    Record {
        index: usize,
        field: &'static str,
        problem: Problem,
    },
}

/// What is wrong with a single field of an imported record.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Problem {
    NotAnObject,
    Missing,
    NotAString,
    NotANumber,
    Empty,
    OutOfRange,
    InvalidTimestamp(String),
    DuplicateId(String),
}

fn describe(field: &str, problem: &Problem) -> String {
    match problem {
        Problem::NotAnObject => "not an object".to_string(),
        Problem::Missing => format!("missing {field}"),
        Problem::NotAString => format!("{field} must be a string"),
        Problem::NotANumber => format!("{field} must be a number"),
        Problem::Empty => format!("{field} cannot be empty"),
        Problem::OutOfRange => format!("{field} is out of range"),
        Problem::InvalidTimestamp(value) => format!("invalid {field} '{value}'"),
        Problem::DuplicateId(id) => format!("duplicate id '{id}'"),
    }
}

/// Parses an import document into records ready for [`Store::import`].
pub fn parse_import(text: &str) -> std::result::Result<Vec<ImportedRecord>, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(items) = value else {
        return Err(ImportError::NotAnArray);
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            parse_item(item).map_err(|(field, problem)| ImportError::Record {
                index,
                field,
                problem,
            })
        })
        .collect()
}

/// Reads the import document at `path` and adds its records to `store`. The store is untouched
/// if the file cannot be read or any record is rejected.
pub async fn import_file(
    store: &mut Store,
    path: impl AsRef<Path>,
) -> Result<Persisted<Vec<Transaction>>> {
    let path = path.as_ref();
    let text = utils::read(path).await?;
    let batch =
        parse_import(&text).with_context(|| format!("Unable to import {}", path.display()))?;
    debug!("Parsed {} records from {}", batch.len(), path.display());
    let imported = store
        .import(batch)
        .with_context(|| format!("Unable to import {}", path.display()))?;
    Ok(imported)
}

const REQUIRED_FIELDS: [&str; 4] = ["description", "amount", "category", "date"];

type FieldResult<T> = std::result::Result<T, (&'static str, Problem)>;

fn parse_item(item: &Value) -> FieldResult<ImportedRecord> {
    let Value::Object(obj) = item else {
        return Err(("record", Problem::NotAnObject));
    };
    // Every missing field is reported before any field of the wrong type.
    for field in REQUIRED_FIELDS {
        if obj.get(field).map_or(true, Value::is_null) {
            return Err((field, Problem::Missing));
        }
    }
    let fields = TransactionFields {
        description: required_string(obj, "description")?,
        amount: required_amount(obj, "amount")?,
        category: required_string(obj, "category")?,
        date: required_string(obj, "date")?,
    };
    let id = optional_string(obj, "id")?.filter(|id| !id.is_empty());
    Ok(ImportedRecord {
        id,
        fields,
        created_at: optional_timestamp(obj, "createdAt")?,
        updated_at: optional_timestamp(obj, "updatedAt")?,
    })
}

fn required_string(obj: &Map<String, Value>, field: &'static str) -> FieldResult<String> {
    match obj.get(field) {
        None | Some(Value::Null) => Err((field, Problem::Missing)),
        Some(Value::String(s)) if s.is_empty() => Err((field, Problem::Empty)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err((field, Problem::NotAString)),
    }
}

fn optional_string(obj: &Map<String, Value>, field: &'static str) -> FieldResult<Option<String>> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err((field, Problem::NotAString)),
    }
}

fn required_amount(obj: &Map<String, Value>, field: &'static str) -> FieldResult<Amount> {
    match obj.get(field) {
        None | Some(Value::Null) => Err((field, Problem::Missing)),
        Some(Value::Number(n)) => parse_number(n)
            .filter(Amount::is_within_limit)
            .ok_or((field, Problem::OutOfRange)),
        Some(_) => Err((field, Problem::NotANumber)),
    }
}

fn parse_number(n: impl Display) -> Option<Amount> {
    let text = n.to_string();
    Amount::from_str(&text)
        .ok()
        .or_else(|| rust_decimal::Decimal::from_scientific(&text).ok().map(Amount::new))
}

fn optional_timestamp(
    obj: &Map<String, Value>,
    field: &'static str,
) -> FieldResult<Option<DateTime<Utc>>> {
    let Some(value) = optional_string(obj, field)? else {
        return Ok(None);
    };
    DateTime::parse_from_rfc3339(&value)
        .map(|t| Some(t.with_timezone(&Utc)))
        .map_err(|_| (field, Problem::InvalidTimestamp(value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{fixed_clock, TestEnv};

    #[test]
    fn test_parse_valid_batch() {
        let text = r#"[
            {"id": "rec_7", "description": "Lunch", "amount": 12.5, "category": "Food",
             "date": "2024-06-01", "createdAt": "2024-06-01T12:00:00Z"},
            {"id": "", "description": "Bus", "amount": 2, "category": "Transport",
             "date": "2024-06-02"}
        ]"#;
        let batch = parse_import(text).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].id.as_deref(), Some("rec_7"));
        assert_eq!(batch[0].fields.amount.to_string(), "12.5");
        assert!(batch[0].created_at.is_some());
        assert_eq!(batch[1].id, None);
        assert_eq!(batch[1].fields.category, "Transport");
        assert_eq!(batch[1].updated_at, None);
    }

    #[test]
    fn test_reject_malformed_documents() {
        assert!(matches!(parse_import("[1, 2"), Err(ImportError::Json(_))));
        assert!(matches!(
            parse_import(r#"{"description": "x"}"#),
            Err(ImportError::NotAnArray)
        ));
    }

    #[test]
    fn test_first_bad_record_is_named() {
        let text = r#"[
            {"description": "Lunch", "amount": 12, "category": "Food", "date": "2024-06-01"},
            {"description": "Bus", "amount": 2, "date": "2024-06-02"},
            {"description": "Tea", "amount": "3", "category": "Food", "date": "2024-06-02"}
        ]"#;
        let err = parse_import(text).unwrap_err();
        assert_eq!(err.to_string(), "Record 1: missing category");
    }

    #[test]
    fn test_missing_fields_are_reported_before_wrong_types() {
        let text = r#"[{"description": "Tea", "amount": "3", "date": "2024-06-02"}]"#;
        let err = parse_import(text).unwrap_err();
        assert_eq!(err.to_string(), "Record 0: missing category");

        let text = r#"[{"description": 7, "amount": 3, "category": "Food", "date": null}]"#;
        let err = parse_import(text).unwrap_err();
        assert_eq!(err.to_string(), "Record 0: missing date");
    }

    #[test]
    fn test_amounts_over_the_limit_are_out_of_range() {
        let text = r#"[{"description": "Yacht", "amount": 50000000000000000000000000000,
                        "category": "Fun", "date": "2024-06-02"}]"#;
        let err = parse_import(text).unwrap_err();
        assert_eq!(err.to_string(), "Record 0: amount is out of range");
    }

    #[test]
    fn test_problem_messages() {
        let cases = [
            (
                r#"[{"description": "Tea", "amount": "3", "category": "Food", "date": "x"}]"#,
                "Record 0: amount must be a number",
            ),
            (r#"["Tea"]"#, "Record 0: not an object"),
            (
                r#"[{"description": "", "amount": 3, "category": "Food", "date": "x"}]"#,
                "Record 0: description cannot be empty",
            ),
            (
                r#"[{"description": "Tea", "amount": 3, "category": 5, "date": "x"}]"#,
                "Record 0: category must be a string",
            ),
            (
                r#"[{"description": "Tea", "amount": 3, "category": "Food", "date": "x",
                     "updatedAt": "yesterday"}]"#,
                "Record 0: invalid updatedAt 'yesterday'",
            ),
        ];
        for (text, expected) in cases {
            assert_eq!(parse_import(text).unwrap_err().to_string(), expected);
        }
    }

    #[test]
    fn test_scientific_amounts() {
        let text = r#"[{"description": "Tea", "amount": 1e2, "category": "Food", "date": "x"}]"#;
        let batch = parse_import(text).unwrap();
        assert_eq!(batch[0].fields.amount.to_string(), "100");
    }

    #[tokio::test]
    async fn test_import_file() {
        let env = TestEnv::new().await;
        let path = env.root().join("batch.json");
        utils::write(
            &path,
            r#"[{"description": "Lunch", "amount": 12, "category": "Food", "date": "2024-06-01"}]"#,
        )
        .await
        .unwrap();

        let mut store = env.store(fixed_clock());
        let imported = import_file(&mut store, &path).await.unwrap().into_value();
        assert_eq!(imported.len(), 1);
        assert_eq!(store.list(), imported);
    }

    #[tokio::test]
    async fn test_import_file_failures_leave_store_untouched() {
        let env = TestEnv::new().await;
        let mut store = env.store(fixed_clock());

        let missing = env.root().join("missing.json");
        assert!(import_file(&mut store, &missing).await.is_err());

        let bad = env.root().join("bad.json");
        utils::write(
            &bad,
            r#"[{"description": "Lunch", "amount": 12, "category": "Food", "date": "2024-06-01"},
                {"description": "Bus"}]"#,
        )
        .await
        .unwrap();
        let err = import_file(&mut store, &bad).await.unwrap_err();
        assert!(format!("{err:#}").contains("Record 1: missing amount"));
        assert!(store.is_empty());
    }
}
