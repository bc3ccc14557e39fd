//! Handlers that add, change, remove and list transactions.

use crate::args::{AddArgs, ClearArgs, DeleteArgs, ListArgs, UpdateArgs};
use crate::clock::Clock;
use crate::commands::{plural, Out};
use crate::model::Transaction;
use crate::search::HighlightedRecord;
use crate::validate::{validate_record_at, FieldErrors, RecordFields};
use crate::view::{FilterState, FilteredView};
use crate::{Config, Result};
use anyhow::{anyhow, bail, Context};
use tracing::warn;

/// Validates the fields in `args` and records a new transaction. The date defaults to today.
///
/// # Errors
///
/// - Returns an error listing every problem if any field is invalid.
/// - Returns an error if the store cannot be opened or the new transaction cannot be saved.
pub fn add(config: Config, clock: impl Clock + 'static, args: AddArgs) -> Result<Out<Transaction>> {
    let now = clock.local_now();
    let date = match args.date() {
        Some(date) => date.to_string(),
        None => now.date().format("%Y-%m-%d").to_string(),
    };
    let raw = RecordFields::new(args.description(), args.amount(), args.category(), date);
    let fields = validate_record_at(&raw, now).map_err(invalid)?;
    warn_unknown_category(&config, &fields.category);

    let mut store = config.open_store(clock)?;
    let (record, saved) = store.add(fields).into_parts();
    saved?;
    Ok(Out::new(format!("Added transaction {}", record.id()), record))
}

/// Applies the fields given in `args` to an existing transaction. The merged transaction is
/// validated as a whole.
///
/// # Errors
///
/// - Returns an error if no transaction has the id.
/// - Returns an error listing every problem if the merged fields are invalid.
pub fn update(
    config: Config,
    clock: impl Clock + 'static,
    args: UpdateArgs,
) -> Result<Out<Transaction>> {
    let now = clock.local_now();
    let mut store = config.open_store(clock)?;
    let existing = store
        .get(args.id())
        .with_context(|| format!("Transaction not found: '{}'", args.id()))?;

    let mut raw = RecordFields::from(&existing.fields());
    if let Some(description) = args.description() {
        raw.description = description.to_string();
    }
    if let Some(amount) = args.amount() {
        raw.amount = amount.to_string();
    }
    if let Some(category) = args.category() {
        raw.category = category.to_string();
    }
    if let Some(date) = args.date() {
        raw.date = date.to_string();
    }
    let fields = validate_record_at(&raw, now).map_err(invalid)?;
    warn_unknown_category(&config, &fields.category);

    let (record, saved) = store
        .update(args.id(), fields.into())
        .with_context(|| format!("Transaction not found: '{}'", args.id()))?
        .into_parts();
    saved?;
    Ok(Out::new(format!("Updated transaction {}", record.id()), record))
}

pub fn delete(
    config: Config,
    clock: impl Clock + 'static,
    args: DeleteArgs,
) -> Result<Out<Transaction>> {
    let mut store = config.open_store(clock)?;
    let (removed, saved) = store
        .delete(args.id())
        .with_context(|| format!("Transaction not found: '{}'", args.id()))?
        .into_parts();
    saved?;
    Ok(Out::new(
        format!("Deleted transaction {}", removed.id()),
        removed,
    ))
}

/// Deletes every transaction. Does nothing unless `args` confirms it.
pub fn clear(config: Config, clock: impl Clock + 'static, args: ClearArgs) -> Result<Out<usize>> {
    if !args.yes() {
        bail!("Refusing to delete every transaction without --yes");
    }
    let mut store = config.open_store(clock)?;
    let (count, saved) = store.clear().into_parts();
    saved?;
    Ok(Out::new(format!("Deleted {}", plural(count, "transaction")), count))
}

/// Lists transactions in the order given by `args`, restricted to those matching the search
/// pattern when there is one.
///
/// # Errors
///
/// - Returns an error if the search pattern is not a valid regular expression.
pub fn list(
    config: Config,
    clock: impl Clock + 'static,
    args: ListArgs,
) -> Result<Out<FilteredView>> {
    let store = config.open_store(clock)?;
    let state = FilterState {
        sort_by: args.sort_by(),
        sort_order: args.sort_order(),
        pattern: args.search().map(str::to_string),
        case_sensitive: args.case_sensitive(),
    };
    let view = state.apply(store.records());
    let message = match &view {
        FilteredView::All(records) if records.is_empty() => "No transactions".to_string(),
        FilteredView::All(records) => records.iter().map(line).collect::<Vec<_>>().join("\n"),
        FilteredView::Matches(matches) if matches.is_empty() => {
            format!("No transactions match '{}'", args.search().unwrap_or_default())
        }
        FilteredView::Matches(matches) => matches
            .iter()
            .map(highlighted_line)
            .collect::<Vec<_>>()
            .join("\n"),
        FilteredView::InvalidPattern => {
            bail!(
                "Invalid regex pattern: '{}'",
                args.search().unwrap_or_default()
            )
        }
    };
    Ok(Out::new(message, view))
}

fn line(record: &Transaction) -> String {
    format!(
        "{}  {}  {:>10}  {}  {}",
        record.id(),
        record.date(),
        record.amount().to_fixed(),
        record.category(),
        record.description()
    )
}

fn highlighted_line(record: &HighlightedRecord) -> String {
    format!(
        "{}  {}  {:>10}  {}  {}",
        record.id, record.date, record.amount, record.category, record.description
    )
}

fn invalid(errors: FieldErrors) -> anyhow::Error {
    anyhow!("Invalid transaction: {errors}")
}

fn warn_unknown_category(config: &Config, category: &str) {
    match config.settings() {
        Ok(settings) if !settings.categories().iter().any(|c| c == category) => {
            warn!("Category '{category}' is not in the category list");
        }
        Ok(_) => {}
        Err(e) => warn!("Unable to check the category list: {e:#}"),
    }
}
