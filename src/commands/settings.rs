//! Handlers for the theme and spending cap stored in the settings document.

use crate::commands::Out;
use crate::model::{Amount, Settings, Theme};
use crate::validate::{validate_field, Field};
use crate::{Config, Result};
use anyhow::bail;
use std::str::FromStr;

/// The cap value that removes the spending cap.
const NO_CAP: &str = "none";

pub fn show_settings(config: Config) -> Result<Out<Settings>> {
    let settings = config.settings()?;
    Ok(Out::new(describe(&settings), settings))
}

pub fn set_theme(config: Config, theme: Theme) -> Result<Out<Settings>> {
    let mut settings = config.settings()?;
    settings.set_theme(theme);
    config.save_settings(&settings)?;
    Ok(Out::new(format!("Theme set to {theme}"), settings))
}

/// Sets the spending cap from user input. `none` removes it.
///
/// # Errors
///
/// - Returns an error if the cap is not a valid amount.
pub fn set_spending_cap(config: Config, cap: &str) -> Result<Out<Settings>> {
    let cap = cap.trim();
    let parsed = if cap.eq_ignore_ascii_case(NO_CAP) {
        None
    } else {
        let problems = validate_field(Field::Amount, cap);
        if !problems.is_empty() {
            bail!("Invalid spending cap: {}", problems.join(", "));
        }
        Some(Amount::from_str(cap)?)
    };

    let mut settings = config.settings()?;
    settings.set_spending_cap(parsed);
    config.save_settings(&settings)?;
    let message = match parsed {
        Some(cap) => format!(
            "Spending cap set to {} {}",
            cap.to_fixed(),
            settings.base_currency()
        ),
        None => "Spending cap removed".to_string(),
    };
    Ok(Out::new(message, settings))
}

fn describe(settings: &Settings) -> String {
    let cap = match settings.spending_cap() {
        Some(cap) => format!("{} {}", cap.to_fixed(), settings.base_currency()),
        None => NO_CAP.to_string(),
    };
    [
        format!("Theme: {}", settings.theme()),
        format!("Spending cap: {cap}"),
        format!("Base currency: {}", settings.base_currency()),
        format!("Categories: {}", settings.categories().join(", ")),
    ]
    .join("\n")
}
