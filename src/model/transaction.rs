use crate::model::Amount;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Prefix shared by every identifier the store generates.
pub(crate) const ID_PREFIX: &str = "rec_";

/// A single recorded expense.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub(crate) id: String,
    pub(crate) description: String,
    pub(crate) amount: Amount,
    pub(crate) category: String,
    pub(crate) date: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// The calendar date as written, `YYYY-MM-DD`.
    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// The user-editable fields of this transaction.
    pub fn fields(&self) -> TransactionFields {
        TransactionFields {
            description: self.description.clone(),
            amount: self.amount,
            category: self.category.clone(),
            date: self.date.clone(),
        }
    }

    /// Overwrites the fields present in `patch`, leaving the others unchanged.
    pub(crate) fn merge(&mut self, patch: TransactionPatch) {
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
    }
}

/// The four user-supplied fields of a transaction, already validated and parsed.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFields {
    pub description: String,
    pub amount: Amount,
    pub category: String,
    pub date: String,
}

/// A partial update. `None` fields are left as they are.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct TransactionPatch {
    pub description: Option<String>,
    pub amount: Option<Amount>,
    pub category: Option<String>,
    pub date: Option<String>,
}

impl From<TransactionFields> for TransactionPatch {
    fn from(fields: TransactionFields) -> Self {
        Self {
            description: Some(fields.description),
            amount: Some(fields.amount),
            category: Some(fields.category),
            date: Some(fields.date),
        }
    }
}

static ID_RE: OnceLock<Regex> = OnceLock::new();

/// Returns true if `id` has the shape of a generated identifier, e.g. `rec_1718000000000`.
pub fn is_valid_id(id: &str) -> bool {
    ID_RE
        .get_or_init(|| {
            Regex::new(r"^rec_[0-9]+$")
                .unwrap_or_else(|error| panic!("id regex failed to compile: {error}"))
        })
        .is_match(id)
}

/// Extracts the numeric sequence from a generated identifier.
pub(crate) fn id_sequence(id: &str) -> Option<u64> {
    if !is_valid_id(id) {
        return None;
    }
    id.strip_prefix(ID_PREFIX)?.parse().ok()
}
