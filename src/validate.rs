//! Validation of user-entered transaction fields.
//!
//! Each field has a set of rules. Every rule of a field is checked and all failures are reported,
//! so a single value can produce more than one message. The patterns are written in terms of
//! ASCII classes (`[0-9]`, `[A-Za-z0-9_]`) because the `regex` crate's `\d`, `\w` and `\b` are
//! Unicode-aware by default and would accept more than intended.

use crate::model::{Amount, TransactionFields};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::OnceLock;

pub const LEADING_TRAILING_SPACES: &str = "No leading or trailing spaces allowed";
pub const DUPLICATE_WORDS: &str = "Duplicate words detected (e.g., \"money money\")";
pub const DESCRIPTION_FORMAT: &str = "Description must be non-empty and valid format";
pub const AMOUNT_FORMAT: &str = "Amount must be a valid number (0-9, max 2 decimals)";
pub const AMOUNT_NEGATIVE: &str = "Amount cannot be negative";
pub const DATE_FORMAT: &str = "Date must be in YYYY-MM-DD format";
pub const DATE_INVALID: &str = "Invalid date";
pub const DATE_FUTURE: &str = "Date cannot be in the future";
pub const CATEGORY_FORMAT: &str = "Category must contain only letters, spaces, and hyphens";
pub const CATEGORY_EMPTY: &str = "Category cannot be empty";

/// The user-editable fields of a transaction.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Description,
    Amount,
    Date,
    Category,
}

serde_plain::derive_display_from_serialize!(Field);
serde_plain::derive_fromstr_from_deserialize!(Field);

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| {
                Regex::new($re).unwrap_or_else(|error| {
                    panic!("{} regex failed to compile: {error}", stringify!($name))
                })
            })
        }
    };
}

// `.` in the description pattern excludes every line terminator, not just `\n`.
pattern!(description_re, r"^\S(?:[^\n\r\x{2028}\x{2029}]*\S)?$");
pattern!(amount_re, r"^(0|[1-9][0-9]*)(\.[0-9]{1,2})?$");
pattern!(
    date_re,
    r"^[0-9]{4}-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])$"
);
pattern!(category_re, r"^[A-Za-z]+(?:[ -][A-Za-z]+)*$");
pattern!(word_re, r"[A-Za-z0-9_]+");
pattern!(
    leading_number_re,
    r"^[+-]?(?:Infinity|(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)"
);

/// Validates a single raw field value against the current local time.
///
/// Returns the list of problems found; an empty list means the value is valid.
pub fn validate_field(field: Field, value: &str) -> Vec<String> {
    validate_field_at(field, value, Local::now().naive_local())
}

/// Validates a single raw field value. `now` is the local wall-clock time used to reject dates
/// in the future.
pub fn validate_field_at(field: Field, value: &str, now: NaiveDateTime) -> Vec<String> {
    match field {
        Field::Description => validate_description(value),
        Field::Amount => validate_amount(value),
        Field::Date => validate_date(value, now),
        Field::Category => validate_category(value),
    }
}

fn validate_description(value: &str) -> Vec<String> {
    let mut errors = Vec::new();
    let trimmed = value.trim();

    if value != trimmed {
        errors.push(LEADING_TRAILING_SPACES.to_string());
    }

    if has_duplicate_words(trimmed) {
        errors.push(DUPLICATE_WORDS.to_string());
    }

    if !description_re().is_match(trimmed) {
        errors.push(DESCRIPTION_FORMAT.to_string());
    }

    errors
}

fn validate_amount(value: &str) -> Vec<String> {
    let mut errors = Vec::new();

    let within_limit = Amount::from_str(value).is_ok_and(|amount| amount.is_within_limit());
    if !amount_re().is_match(value) || !within_limit {
        errors.push(AMOUNT_FORMAT.to_string());
    }

    // Unreachable for strings that pass the format check, but callers may skip that check.
    if leading_number(value).is_some_and(|n| n < 0.0) {
        errors.push(AMOUNT_NEGATIVE.to_string());
    }

    errors
}

fn validate_date(value: &str, now: NaiveDateTime) -> Vec<String> {
    let mut errors = Vec::new();

    if !date_re().is_match(value) {
        errors.push(DATE_FORMAT.to_string());
    }

    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => {
            if date.and_time(NaiveTime::MIN) > now {
                errors.push(DATE_FUTURE.to_string());
            }
        }
        Err(_) => errors.push(DATE_INVALID.to_string()),
    }

    errors
}

fn validate_category(value: &str) -> Vec<String> {
    let mut errors = Vec::new();
    let trimmed = value.trim();

    if !category_re().is_match(trimmed) {
        errors.push(CATEGORY_FORMAT.to_string());
    }

    if trimmed.is_empty() {
        errors.push(CATEGORY_EMPTY.to_string());
    }

    errors
}

/// Returns true if `text` contains the same word twice in a row, separated only by whitespace.
///
/// Words are runs of `[A-Za-z0-9_]` and comparison is case-sensitive, so `"the the"` is a
/// duplicate while `"The the"`, `"the, the"` and `"the theme"` are not.
pub fn has_duplicate_words(text: &str) -> bool {
    let words: Vec<_> = word_re().find_iter(text).collect();
    words.windows(2).any(|pair| {
        let (first, second) = (pair[0], pair[1]);
        let gap = &text[first.end()..second.start()];
        !gap.is_empty() && gap.chars().all(char::is_whitespace) && first.as_str() == second.as_str()
    })
}

/// Parses the longest numeric prefix of `value`, ignoring leading whitespace.
fn leading_number(value: &str) -> Option<f64> {
    let m = leading_number_re().find(value.trim_start())?;
    f64::from_str(m.as_str()).ok()
}

/// Raw field values as entered by the user.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFields {
    pub description: String,
    pub amount: String,
    pub category: String,
    pub date: String,
}

impl RecordFields {
    pub fn new(
        description: impl Into<String>,
        amount: impl Into<String>,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            category: category.into(),
            date: date.into(),
        }
    }

    fn value(&self, field: Field) -> &str {
        match field {
            Field::Description => &self.description,
            Field::Amount => &self.amount,
            Field::Date => &self.date,
            Field::Category => &self.category,
        }
    }
}

impl From<&TransactionFields> for RecordFields {
    fn from(fields: &TransactionFields) -> Self {
        Self {
            description: fields.description.clone(),
            amount: fields.amount.to_string(),
            category: fields.category.clone(),
            date: fields.date.clone(),
        }
    }
}

/// The problems found in a record, keyed by field. Only fields with at least one problem appear.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
pub struct FieldErrors(BTreeMap<Field, Vec<String>>);

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&[String]> {
        self.0.get(&field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &[String])> {
        self.0.iter().map(|(field, errors)| (*field, errors.as_slice()))
    }

    fn push(&mut self, field: Field, errors: Vec<String>) {
        if !errors.is_empty() {
            self.0.entry(field).or_default().extend(errors);
        }
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, errors) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            write!(f, "{field}: {}", errors.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Validates every field of `fields` against the current local time.
///
/// On success the parsed fields are returned, ready to hand to the store.
pub fn validate_record(fields: &RecordFields) -> Result<TransactionFields, FieldErrors> {
    validate_record_at(fields, Local::now().naive_local())
}

/// Validates every field of `fields`. `now` is the local wall-clock time.
pub fn validate_record_at(
    fields: &RecordFields,
    now: NaiveDateTime,
) -> Result<TransactionFields, FieldErrors> {
    let mut errors = FieldErrors::default();
    for field in [Field::Description, Field::Amount, Field::Date, Field::Category] {
        errors.push(field, validate_field_at(field, fields.value(field), now));
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let amount = match Amount::from_str(&fields.amount) {
        Ok(amount) => amount,
        Err(e) => {
            errors.push(Field::Amount, vec![format!("{AMOUNT_FORMAT}: {e}")]);
            return Err(errors);
        }
    };

    Ok(TransactionFields {
        description: fields.description.clone(),
        amount,
        category: fields.category.trim().to_string(),
        date: fields.date.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn check(field: Field, value: &str) -> Vec<String> {
        validate_field_at(field, value, now())
    }

    fn has(errors: &[String], message: &str) -> bool {
        errors.iter().any(|e| e == message)
    }

    #[test]
    fn test_description_whitespace() {
        for value in [" Coffee", "Coffee ", "\tCoffee", "Coffee\n", "  "] {
            let errors = check(Field::Description, value);
            assert!(has(&errors, LEADING_TRAILING_SPACES), "{value:?}");
        }
        assert!(check(Field::Description, "Coffee").is_empty());
    }

    #[test]
    fn test_description_single_character() {
        assert!(check(Field::Description, "x").is_empty());
    }

    #[test]
    fn test_description_empty() {
        let errors = check(Field::Description, "");
        assert_eq!(errors, vec![DESCRIPTION_FORMAT.to_string()]);
    }

    #[test]
    fn test_description_errors_accumulate() {
        let errors = check(Field::Description, " coffee coffee ");
        assert_eq!(
            errors,
            vec![
                LEADING_TRAILING_SPACES.to_string(),
                DUPLICATE_WORDS.to_string()
            ]
        );
    }

    #[test]
    fn test_description_inner_line_break() {
        let errors = check(Field::Description, "Lunch\nwith team");
        assert!(has(&errors, DESCRIPTION_FORMAT));
    }

    #[test]
    fn test_duplicate_words() {
        assert!(has_duplicate_words("coffee coffee"));
        assert!(has_duplicate_words("paid the the bill"));
        assert!(has_duplicate_words("a  \t a"));
        assert!(has_duplicate_words("item_1 item_1"));
        assert!(!has_duplicate_words("coffee otherword"));
        assert!(!has_duplicate_words("the theme"));
        assert!(!has_duplicate_words("theme the"));
        assert!(!has_duplicate_words("the, the"));
        assert!(!has_duplicate_words("Coffee coffee"));
        assert!(!has_duplicate_words("coffee"));
    }

    #[test]
    fn test_duplicate_words_across_non_ascii() {
        // é is not a word character, so "caf" is followed by "é " rather than whitespace.
        assert!(!has_duplicate_words("café café"));
        assert!(has_duplicate_words("café bar bar"));
    }

    #[test]
    fn test_amount_valid() {
        for value in ["0", "5", "5.5", "5.50", "12.3", "12.34", "1000"] {
            assert!(check(Field::Amount, value).is_empty(), "{value}");
        }
    }

    #[test]
    fn test_amount_invalid() {
        for value in ["01", "12.345", "", "1.", ".5", "1,000", "abc", " 5", "٣"] {
            assert!(has(&check(Field::Amount, value), AMOUNT_FORMAT), "{value}");
        }
    }

    #[test]
    fn test_amount_too_large() {
        assert!(check(Field::Amount, "999999999999.99").is_empty());
        for value in ["1000000000000", "50000000000000000000000000000", "9".repeat(40).as_str()] {
            assert_eq!(check(Field::Amount, value), vec![AMOUNT_FORMAT.to_string()], "{value}");
        }
    }

    #[test]
    fn test_amount_negative() {
        let errors = check(Field::Amount, "-1");
        assert_eq!(
            errors,
            vec![AMOUNT_FORMAT.to_string(), AMOUNT_NEGATIVE.to_string()]
        );
        assert!(has(&check(Field::Amount, "-3abc"), AMOUNT_NEGATIVE));
        assert!(!has(&check(Field::Amount, "-0"), AMOUNT_NEGATIVE));
    }

    #[test]
    fn test_date_valid() {
        assert!(check(Field::Date, "2024-01-15").is_empty());
        assert!(check(Field::Date, "2024-06-15").is_empty());
    }

    #[test]
    fn test_date_bad_month() {
        let errors = check(Field::Date, "2024-13-01");
        assert!(has(&errors, DATE_FORMAT));
        assert!(has(&errors, DATE_INVALID));
    }

    #[test]
    fn test_date_not_calendar_date() {
        let errors = check(Field::Date, "2024-02-31");
        assert_eq!(errors, vec![DATE_INVALID.to_string()]);
    }

    #[test]
    fn test_date_future() {
        let errors = check(Field::Date, "2024-06-16");
        assert_eq!(errors, vec![DATE_FUTURE.to_string()]);
    }

    #[test]
    fn test_date_garbage() {
        let errors = check(Field::Date, "yesterday");
        assert_eq!(errors, vec![DATE_FORMAT.to_string(), DATE_INVALID.to_string()]);
    }

    #[test]
    fn test_category_valid() {
        for value in ["Food", "Fast-Food", "Self Care", "Self-Care", " Food "] {
            assert!(check(Field::Category, value).is_empty(), "{value}");
        }
    }

    #[test]
    fn test_category_invalid() {
        assert!(has(&check(Field::Category, "Food1"), CATEGORY_FORMAT));
        assert!(has(&check(Field::Category, "Fast  Food"), CATEGORY_FORMAT));
        assert!(has(&check(Field::Category, "Food-"), CATEGORY_FORMAT));
        assert!(has(&check(Field::Category, "Food & Drink"), CATEGORY_FORMAT));
    }

    #[test]
    fn test_category_empty() {
        let errors = check(Field::Category, "   ");
        assert_eq!(
            errors,
            vec![CATEGORY_FORMAT.to_string(), CATEGORY_EMPTY.to_string()]
        );
    }

    #[test]
    fn test_validate_record_ok() {
        let fields = RecordFields::new("Lunch", "12.50", " Food ", "2024-06-01");
        let valid = validate_record_at(&fields, now()).unwrap();
        assert_eq!(valid.description, "Lunch");
        assert_eq!(valid.amount.to_string(), "12.5");
        assert_eq!(valid.category, "Food");
        assert_eq!(valid.date, "2024-06-01");
    }

    #[test]
    fn test_validate_record_reports_only_failing_fields() {
        let fields = RecordFields::new("Lunch", "01", "Food", "2030-01-01");
        let errors = validate_record_at(&fields, now()).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(Field::Amount));
        assert!(errors.contains(Field::Date));
        assert!(!errors.contains(Field::Description));
        assert!(errors.get(Field::Category).is_none());
    }

    #[test]
    fn test_field_errors_display() {
        let fields = RecordFields::new("Lunch", "01", "Food", "2024-06-01");
        let errors = validate_record_at(&fields, now()).unwrap_err();
        assert_eq!(errors.to_string(), format!("amount: {AMOUNT_FORMAT}"));
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!(Field::from_str("amount").unwrap(), Field::Amount);
        assert_eq!(Field::Category.to_string(), "category");
    }
}
