use clap::Parser;
use expense_tracker::args::{Args, CategoriesCommand, Command, SettingsCommand};
use expense_tracker::{commands, Config, Result, SystemClock};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let config = Config::load(args.common().home().path()).await?;
    let clock = SystemClock;

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Add(add_args) => commands::add(config, clock, add_args.clone())?.print(),
        Command::Update(update_args) => {
            commands::update(config, clock, update_args.clone())?.print()
        }
        Command::Delete(delete_args) => {
            commands::delete(config, clock, delete_args.clone())?.print()
        }
        Command::Clear(clear_args) => commands::clear(config, clock, clear_args.clone())?.print(),
        Command::List(list_args) => commands::list(config, clock, list_args.clone())?.print(),
        Command::Import(import_args) => commands::import(config, clock, import_args.clone())
            .await?
            .print(),
        Command::Export(export_args) => commands::export(config, clock, export_args.clone())
            .await?
            .print(),
        Command::Stats => commands::stats(config, clock)?.print(),
        Command::Categories(categories_args) => match categories_args.command() {
            CategoriesCommand::List => commands::list_categories(config)?.print(),
            CategoriesCommand::Add(args) => commands::add_category(config, args.name())?.print(),
            CategoriesCommand::Remove(args) => {
                commands::remove_category(config, args.name())?.print()
            }
        },
        Command::Settings(settings_args) => match settings_args.command() {
            SettingsCommand::Show => commands::show_settings(config)?.print(),
            SettingsCommand::Theme(args) => commands::set_theme(config, args.theme())?.print(),
            SettingsCommand::Cap(args) => commands::set_spending_cap(config, args.cap())?.print(),
        },
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(default_directives(level))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// The library and the binary have different target names, so both are listed.
fn default_directives(level: LevelFilter) -> String {
    format!(
        "{}={level},{}={level}",
        LIBRARY_TARGET,
        env!("CARGO_CRATE_NAME")
    )
}

const LIBRARY_TARGET: &str = "expense_tracker";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_cover_library_and_binary() {
        let directives = default_directives(LevelFilter::INFO);
        let targets: Vec<&str> = directives
            .split(',')
            .filter_map(|d| d.split_once('=').map(|(target, _)| target))
            .collect();
        for module in ["expense_tracker::commands", "expense_tracker::store", "expenses"] {
            assert!(
                targets.iter().any(|t| module.starts_with(t)),
                "{module} is not covered by {directives}"
            );
        }
        assert!(directives.to_lowercase().ends_with("=info"));
    }

    #[test]
    fn test_default_directives_parse() {
        assert!(EnvFilter::try_new(default_directives(LevelFilter::DEBUG)).is_ok());
    }
}
