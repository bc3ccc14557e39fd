//! Searching transactions with user-supplied regular expressions.
//!
//! Patterns come straight from the user, so compiling one never fails loudly: a malformed pattern
//! is logged and reported as `None`. The `regex` crate runs in linear time, which means a hostile
//! pattern cannot stall a search; patterns needing look-around or back-references are simply
//! rejected as invalid.
//!
//! Highlighted output is meant to be embedded in HTML. Both the text between matches and the
//! matched text are escaped before the `<mark>` tags are added, so user-controlled text can never
//! introduce markup of its own.

use crate::model::Transaction;
use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::borrow::Cow;
use tracing::warn;

const MARK_OPEN: &str = "<mark>";
const MARK_CLOSE: &str = "</mark>";

/// Upper bound on the compiled size of a user pattern.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// A compiled search pattern.
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Regex,
}

impl Matcher {
    /// Compiles `pattern`, returning the regex error if it is malformed.
    pub fn new(pattern: &str, case_sensitive: bool) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(!case_sensitive)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// True if any searchable field of `record` matches: description, category, amount or date.
    pub fn matches_record(&self, record: &Transaction) -> bool {
        self.is_match(record.description())
            || self.is_match(record.category())
            || self.is_match(&record.amount().to_string())
            || self.is_match(record.date())
    }

    /// Returns the matching records in their original order.
    pub fn search(&self, records: &[Transaction]) -> Vec<Transaction> {
        records
            .iter()
            .filter(|r| self.matches_record(r))
            .cloned()
            .collect()
    }

    /// Wraps every match in `<mark>` tags without escaping anything. Only suitable for sinks that
    /// do not interpret markup.
    pub fn highlight(&self, text: &str) -> String {
        self.wrap_matches(text, |s| Cow::Borrowed(s))
    }

    /// Escapes `text` for HTML and wraps every match in `<mark>` tags.
    pub fn highlight_safe(&self, text: &str) -> String {
        self.wrap_matches(text, escape_html)
    }

    /// Projects `record` with each searchable field passed through `highlight_safe`.
    pub fn highlight_record(&self, record: &Transaction) -> HighlightedRecord {
        HighlightedRecord::build(record, |s| self.highlight_safe(s))
    }

    // Zero-width matches are skipped, so patterns like `a*` do not produce empty marks.
    fn wrap_matches<'a, F>(&self, text: &'a str, escape: F) -> String
    where
        F: Fn(&'a str) -> Cow<'a, str>,
    {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for m in self.regex.find_iter(text) {
            if m.is_empty() {
                continue;
            }
            out.push_str(&escape(&text[last..m.start()]));
            out.push_str(MARK_OPEN);
            out.push_str(&escape(m.as_str()));
            out.push_str(MARK_CLOSE);
            last = m.end();
        }
        out.push_str(&escape(&text[last..]));
        out
    }
}

/// Compiles a user pattern. Returns `None` if the pattern is empty or malformed.
pub fn compile_pattern(pattern: &str, case_sensitive: bool) -> Option<Matcher> {
    if pattern.is_empty() {
        return None;
    }
    match Matcher::new(pattern, case_sensitive) {
        Ok(matcher) => Some(matcher),
        Err(e) => {
            warn!("Invalid regex pattern '{pattern}': {e}");
            None
        }
    }
}

/// Returns the records matching `pattern`, in their original order. An invalid pattern matches
/// nothing.
pub fn search_records(
    records: &[Transaction],
    pattern: &str,
    case_sensitive: bool,
) -> Vec<Transaction> {
    match compile_pattern(pattern, case_sensitive) {
        Some(matcher) => matcher.search(records),
        None => Vec::new(),
    }
}

/// See [`Matcher::highlight`].
pub fn highlight(text: &str, matcher: &Matcher) -> String {
    matcher.highlight(text)
}

/// See [`Matcher::highlight_safe`].
pub fn highlight_safe(text: &str, matcher: &Matcher) -> String {
    matcher.highlight_safe(text)
}

/// Projects `record` for display with matches of `pattern` highlighted. If the pattern cannot be
/// compiled the fields are escaped but carry no highlights.
pub fn highlight_record(
    record: &Transaction,
    pattern: &str,
    case_sensitive: bool,
) -> HighlightedRecord {
    match compile_pattern(pattern, case_sensitive) {
        Some(matcher) => matcher.highlight_record(record),
        None => HighlightedRecord::escaped(record),
    }
}

/// Escapes the characters that are significant in HTML text content: `&`, `<` and `>`.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// A transaction prepared for display. The searchable fields hold HTML-safe markup.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightedRecord {
    pub id: String,
    pub description: String,
    pub amount: String,
    pub category: String,
    pub date: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HighlightedRecord {
    /// The record with its fields escaped and nothing highlighted.
    pub fn escaped(record: &Transaction) -> Self {
        Self::build(record, |s| escape_html(s).into_owned())
    }

    fn build<F>(record: &Transaction, render: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        Self {
            id: record.id().to_string(),
            description: render(record.description()),
            amount: render(&record.amount().to_string()),
            category: render(record.category()),
            date: render(record.date()),
            created_at: record.created_at(),
            updated_at: record.updated_at(),
        }
    }
}
