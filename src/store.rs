//! The in-memory collection of transactions and its persistence.
//!
//! A `Store` is the single owner of the records. Every mutation writes the whole collection back
//! to its `Storage` before returning. A failed write does not undo the change: the caller gets the
//! new value together with the error inside a [`Persisted`].

use crate::clock::Clock;
use crate::import::{ImportError, ImportedRecord, Problem};
use crate::model::{id_sequence, Transaction, TransactionFields, TransactionPatch, ID_PREFIX};
use crate::storage::{self, Storage, StoreMeta};
use crate::Result;
use std::collections::HashSet;
use tracing::{debug, error};

/// The outcome of a mutation: the new value, and the error if it could not be saved.
#[derive(Debug)]
#[must_use]
pub struct Persisted<T> {
    value: T,
    error: Option<anyhow::Error>,
}

impl<T> Persisted<T> {
    fn saved(value: T) -> Self {
        Self { value, error: None }
    }

    fn unsaved(value: T, error: anyhow::Error) -> Self {
        Self {
            value,
            error: Some(error),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// True if the change was written to storage.
    pub fn is_persisted(&self) -> bool {
        self.error.is_none()
    }

    pub fn persist_error(&self) -> Option<&anyhow::Error> {
        self.error.as_ref()
    }

    /// Splits into the value and the persistence outcome.
    pub fn into_parts(self) -> (T, Result<()>) {
        match self.error {
            None => (self.value, Ok(())),
            Some(e) => (self.value, Err(e)),
        }
    }
}

/// Owns the transactions, the storage they are saved to and the clock used to stamp them.
#[derive(Debug)]
pub struct Store {
    records: Vec<Transaction>,
    storage: Box<dyn Storage>,
    clock: Box<dyn Clock>,
    last_id: u64,
}

impl Store {
    /// Loads the stored transactions. A missing document is an empty store. New ids continue past
    /// both the loaded records and every id issued before, so a deleted id is never handed out
    /// again.
    ///
    /// # Errors
    /// - Returns an error if the stored document cannot be read or parsed.
    pub fn open(storage: impl Storage + 'static, clock: impl Clock + 'static) -> Result<Self> {
        let records = storage::load_records(&storage)?;
        let last_id = records
            .iter()
            .filter_map(|r| id_sequence(r.id()))
            .max()
            .unwrap_or_default()
            .max(storage::load_meta(&storage).last_id);
        Ok(Self {
            records,
            storage: Box::new(storage),
            clock: Box::new(clock),
            last_id,
        })
    }

    /// The records in insertion order.
    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    /// A copy of the records in insertion order.
    pub fn list(&self) -> Vec<Transaction> {
        self.records.clone()
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends a new transaction with a fresh id and timestamps.
    pub fn add(&mut self, fields: TransactionFields) -> Persisted<Transaction> {
        let now = self.clock.now();
        let record = Transaction {
            id: self.next_id(),
            description: fields.description,
            amount: fields.amount,
            category: fields.category,
            date: fields.date,
            created_at: now,
            updated_at: now,
        };
        debug!("Adding transaction {}", record.id());
        self.records.push(record.clone());
        self.persist(record)
    }

    /// Merges `patch` onto the record with `id` and refreshes its `updated_at`. Returns `None` if
    /// there is no such record.
    pub fn update(&mut self, id: &str, patch: TransactionPatch) -> Option<Persisted<Transaction>> {
        let now = self.clock.now();
        let record = self.records.iter_mut().find(|r| r.id() == id)?;
        record.merge(patch);
        record.updated_at = now;
        let record = record.clone();
        debug!("Updated transaction {id}");
        Some(self.persist(record))
    }

    /// Removes the record with `id`. Returns `None`, and leaves storage alone, if there is no such
    /// record.
    pub fn delete(&mut self, id: &str) -> Option<Persisted<Transaction>> {
        let index = self.records.iter().position(|r| r.id() == id)?;
        let removed = self.records.remove(index);
        debug!("Deleted transaction {id}");
        Some(self.persist(removed))
    }

    /// Removes every record and returns how many there were.
    pub fn clear(&mut self) -> Persisted<usize> {
        let count = self.records.len();
        self.records.clear();
        debug!("Cleared {count} transactions");
        self.persist(count)
    }

    /// Appends a batch of imported records. Missing ids and timestamps are filled in.
    ///
    /// # Errors
    /// - Returns `ImportError::Record` if an id in the batch is already used, by an existing record
    ///   or an earlier record of the same batch. Nothing is added in that case.
    pub fn import(
        &mut self,
        batch: Vec<ImportedRecord>,
    ) -> std::result::Result<Persisted<Vec<Transaction>>, ImportError> {
        let mut seen: HashSet<&str> = self.records.iter().map(|r| r.id()).collect();
        for (index, item) in batch.iter().enumerate() {
            if let Some(id) = item.id.as_deref() {
                if !seen.insert(id) {
                    return Err(ImportError::Record {
                        index,
                        field: "id",
                        problem: Problem::DuplicateId(id.to_string()),
                    });
                }
            }
        }

        if let Some(max) = batch
            .iter()
            .filter_map(|item| item.id.as_deref().and_then(id_sequence))
            .max()
        {
            self.last_id = self.last_id.max(max);
        }

        let now = self.clock.now();
        let mut imported = Vec::with_capacity(batch.len());
        for item in batch {
            let id = match item.id {
                Some(id) => id,
                None => self.next_id(),
            };
            let created_at = item.created_at.unwrap_or(now);
            imported.push(Transaction {
                id,
                description: item.fields.description,
                amount: item.fields.amount,
                category: item.fields.category,
                date: item.fields.date,
                created_at,
                updated_at: item.updated_at.unwrap_or(created_at),
            });
        }
        debug!("Importing {} transactions", imported.len());
        self.records.extend_from_slice(&imported);
        Ok(self.persist(imported))
    }

    // `rec_<n>` where n is the current time in milliseconds, bumped past the last id handed out.
    fn next_id(&mut self) -> String {
        let millis = u64::try_from(self.clock.now().timestamp_millis()).unwrap_or_default();
        self.last_id = millis.max(self.last_id.saturating_add(1));
        format!("{ID_PREFIX}{}", self.last_id)
    }

    fn persist<T>(&self, value: T) -> Persisted<T> {
        let storage = self.storage.as_ref();
        let meta = StoreMeta {
            last_id: self.last_id,
        };
        match storage::save_records(storage, &self.records)
            .and_then(|()| storage::save_meta(storage, meta))
        {
            Ok(()) => Persisted::saved(value),
            Err(e) => {
                error!("Changes are kept in memory but could not be saved: {e:#}");
                Persisted::unsaved(value, e)
            }
        }
    }
}
