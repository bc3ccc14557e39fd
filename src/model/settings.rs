use crate::model::Amount;
use crate::validate::{validate_field, Field};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The categories offered to a new user.
pub const DEFAULT_CATEGORIES: [&str; 6] =
    ["Food", "Books", "Transport", "Entertainment", "Fees", "Other"];

const DEFAULT_CURRENCY: &str = "USD";

/// User settings, stored as a single document independent of the transactions.
///
/// Example document:
/// ```json
/// {
///   "baseCurrency": "USD",
///   "exchangeRates": { "EUR": 0.92, "GBP": 0.79, "USD": 1 },
///   "categories": ["Food", "Books", "Transport", "Entertainment", "Fees", "Other"],
///   "theme": "light",
///   "spendingCap": null
/// }
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    base_currency: String,
    /// Rates are static configuration; nothing converts between currencies.
    exchange_rates: BTreeMap<String, Amount>,
    categories: Vec<String>,
    theme: Theme,
    spending_cap: Option<Amount>,
}

impl Default for Settings {
    fn default() -> Self {
        let mut exchange_rates = BTreeMap::new();
        exchange_rates.insert("USD".to_string(), Amount::new(Decimal::ONE));
        exchange_rates.insert("EUR".to_string(), Amount::new(Decimal::new(92, 2)));
        exchange_rates.insert("GBP".to_string(), Amount::new(Decimal::new(79, 2)));
        Self {
            base_currency: DEFAULT_CURRENCY.to_string(),
            exchange_rates,
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            theme: Theme::default(),
            spending_cap: None,
        }
    }
}

impl Settings {
    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    pub fn exchange_rates(&self) -> &BTreeMap<String, Amount> {
        &self.exchange_rates
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn spending_cap(&self) -> Option<Amount> {
        self.spending_cap
    }

    pub fn set_spending_cap(&mut self, cap: Option<Amount>) {
        self.spending_cap = cap;
    }

    /// Appends a category to the list after trimming it.
    ///
    /// # Errors
    /// - `CategoryError::Empty` if nothing remains after trimming.
    /// - `CategoryError::Invalid` if the name fails category validation.
    /// - `CategoryError::Exists` if the exact name is already in the list.
    pub fn add_category(&mut self, name: &str) -> Result<String, CategoryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CategoryError::Empty);
        }
        let problems = validate_field(Field::Category, name);
        if !problems.is_empty() {
            return Err(CategoryError::Invalid(problems.join("; ")));
        }
        if self.categories.iter().any(|c| c == name) {
            return Err(CategoryError::Exists(name.to_string()));
        }
        self.categories.push(name.to_string());
        Ok(name.to_string())
    }

    /// Removes a category by exact name. Returns false if it was not in the list.
    pub fn remove_category(&mut self, name: &str) -> bool {
        let before = self.categories.len();
        self.categories.retain(|c| c != name);
        self.categories.len() != before
    }
}

/// The colour scheme preference.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

serde_plain::derive_display_from_serialize!(Theme);
serde_plain::derive_fromstr_from_deserialize!(Theme);

/// Reasons a category cannot be added.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum CategoryError {
    #[error("Please enter a category name")]
    Empty,

    #[error("Invalid category name: {0}")]
    Invalid(String),

    #[error("Category already exists: '{0}'")]
    Exists(String),
}
