//! These structs provide the CLI interface for the expenses CLI.

use crate::model::Theme;
use crate::view::{SortBy, SortOrder};
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// expenses: A command-line tool for tracking personal spending.
///
/// Transactions are kept as JSON documents in a home directory. Each one has a description, an
/// amount, a category and a date, all of which are validated before they are saved. Transactions
/// can be listed, sorted and searched with regular expressions, and the whole collection can be
/// exported to and imported from JSON files.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Record a new transaction.
    Add(AddArgs),
    /// Change one or more fields of an existing transaction.
    Update(UpdateArgs),
    /// Delete a transaction by id.
    Delete(DeleteArgs),
    /// Delete every transaction.
    Clear(ClearArgs),
    /// List transactions, optionally sorted and filtered by a regular expression.
    List(ListArgs),
    /// Add the transactions from a JSON file. Nothing is added if any record is malformed.
    Import(ImportArgs),
    /// Write all transactions to a dated JSON file.
    Export(ExportArgs),
    /// Show spending totals.
    Stats,
    /// Manage the list of categories.
    Categories(CategoriesArgs),
    /// Show or change the theme and the spending cap.
    Settings(SettingsArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where transactions and settings are kept. Defaults to ~/expenses
    #[arg(long, env = "EXPENSES_HOME", default_value_t = default_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// Args for the `expenses add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// What the money was spent on, e.g. "Coffee with Sam".
    #[arg(long)]
    description: String,

    /// The amount spent, with at most two decimal places, e.g. 4.50
    #[arg(long)]
    amount: String,

    /// The category, e.g. Food. Letters, spaces and hyphens only.
    #[arg(long)]
    category: String,

    /// The date of the transaction as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<String>,
}

impl AddArgs {
    pub fn new(
        description: impl Into<String>,
        amount: impl Into<String>,
        category: impl Into<String>,
        date: Option<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            category: category.into(),
            date,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

/// Args for the `expenses update` command. Fields that are not given keep their current value.
#[derive(Debug, Parser, Clone, Default)]
pub struct UpdateArgs {
    /// The id of the transaction to change, e.g. rec_1718000000000
    id: String,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    amount: Option<String>,

    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    date: Option<String>,
}

impl UpdateArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn amount(&self) -> Option<&str> {
        self.amount.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

/// Args for the `expenses delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The id of the transaction to delete.
    id: String,
}

impl DeleteArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Args for the `expenses clear` command.
#[derive(Debug, Parser, Clone)]
pub struct ClearArgs {
    /// Confirm that every transaction should be deleted. Nothing happens without it.
    #[arg(long)]
    yes: bool,
}

impl ClearArgs {
    pub fn new(yes: bool) -> Self {
        Self { yes }
    }

    pub fn yes(&self) -> bool {
        self.yes
    }
}

/// Args for the `expenses list` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ListArgs {
    /// The field to sort by: date, description, amount or category.
    #[arg(long, default_value_t = SortBy::Date)]
    sort_by: SortBy,

    /// The sort direction: asc or desc.
    #[arg(long, default_value_t = SortOrder::Desc)]
    sort_order: SortOrder,

    /// Only show transactions where a field matches this regular expression.
    #[arg(long)]
    search: Option<String>,

    /// Match the search pattern case-sensitively.
    #[arg(long)]
    case_sensitive: bool,
}

impl ListArgs {
    pub fn new(
        sort_by: SortBy,
        sort_order: SortOrder,
        search: Option<String>,
        case_sensitive: bool,
    ) -> Self {
        Self {
            sort_by,
            sort_order,
            search,
            case_sensitive,
        }
    }

    pub fn sort_by(&self) -> SortBy {
        self.sort_by
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

/// Args for the `expenses import` command.
#[derive(Debug, Parser, Clone)]
pub struct ImportArgs {
    /// A JSON file holding an array of transactions, such as one written by `expenses export`.
    file: PathBuf,
}

impl ImportArgs {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }
}

/// Args for the `expenses export` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ExportArgs {
    /// The directory to write the export file to. Defaults to $EXPENSES_HOME/exports
    #[arg(long)]
    dir: Option<PathBuf>,
}

impl ExportArgs {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }
}

/// Args for the `expenses categories` command.
#[derive(Debug, Parser, Clone)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    command: CategoriesCommand,
}

impl CategoriesArgs {
    pub fn new(command: CategoriesCommand) -> Self {
        Self { command }
    }

    pub fn command(&self) -> &CategoriesCommand {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum CategoriesCommand {
    /// Show the configured categories.
    List,
    /// Add a category. Letters, spaces and hyphens only.
    Add(CategoryArgs),
    /// Remove a category. Existing transactions keep their category.
    Remove(CategoryArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct CategoryArgs {
    name: String,
}

impl CategoryArgs {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Args for the `expenses settings` command.
#[derive(Debug, Parser, Clone)]
pub struct SettingsArgs {
    #[command(subcommand)]
    command: SettingsCommand,
}

impl SettingsArgs {
    pub fn new(command: SettingsCommand) -> Self {
        Self { command }
    }

    pub fn command(&self) -> &SettingsCommand {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommand {
    /// Show the current settings.
    Show,
    /// Set the colour scheme: light or dark.
    Theme(ThemeArgs),
    /// Set the spending cap that `expenses stats` warns about, or `none` to remove it.
    Cap(CapArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct ThemeArgs {
    theme: Theme,
}

impl ThemeArgs {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }
}

#[derive(Debug, Parser, Clone)]
pub struct CapArgs {
    /// An amount such as 500 or 250.50, or `none`.
    cap: String,
}

impl CapArgs {
    pub fn new(cap: impl Into<String>) -> Self {
        Self { cap: cap.into() }
    }

    pub fn cap(&self) -> &str {
        &self.cap
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("expenses"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or EXPENSES_HOME instead of relying on the default \
                home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("expenses")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
