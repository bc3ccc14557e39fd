//! Category list handlers. The list lives in the settings document.

use crate::commands::Out;
use crate::{Config, Result};
use anyhow::bail;

pub fn list_categories(config: Config) -> Result<Out<Vec<String>>> {
    let settings = config.settings()?;
    let categories = settings.categories().to_vec();
    Ok(Out::new(categories.join("\n"), categories))
}

/// Adds `name`, trimmed, to the category list.
///
/// # Errors
///
/// - Returns an error if the name is empty, not a valid category or already in the list.
pub fn add_category(config: Config, name: &str) -> Result<Out<Vec<String>>> {
    let mut settings = config.settings()?;
    let added = settings.add_category(name)?;
    config.save_settings(&settings)?;
    Ok(Out::new(
        format!("Added category '{added}'"),
        settings.categories().to_vec(),
    ))
}

pub fn remove_category(config: Config, name: &str) -> Result<Out<Vec<String>>> {
    let mut settings = config.settings()?;
    if !settings.remove_category(name) {
        bail!("Category not found: '{name}'");
    }
    config.save_settings(&settings)?;
    Ok(Out::new(
        format!("Removed category '{name}'"),
        settings.categories().to_vec(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DEFAULT_CATEGORIES;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_list_defaults() {
        let env = TestEnv::new().await;
        let out = list_categories(env.config()).unwrap();
        assert_eq!(out.structure().unwrap().len(), DEFAULT_CATEGORIES.len());
    }

    #[tokio::test]
    async fn test_add_and_remove() {
        let env = TestEnv::new().await;
        let out = add_category(env.config(), "  Pet Care ").unwrap();
        assert_eq!(out.message(), "Added category 'Pet Care'");
        assert!(list_categories(env.config())
            .unwrap()
            .structure()
            .unwrap()
            .contains(&"Pet Care".to_string()));

        let err_msg = add_category(env.config(), "Pet Care").unwrap_err().to_string();
        assert!(err_msg.contains("Category already exists"));

        remove_category(env.config(), "Pet Care").unwrap();
        let err_msg = remove_category(env.config(), "Pet Care")
            .unwrap_err()
            .to_string();
        assert!(err_msg.contains("Category not found"));
    }

    #[tokio::test]
    async fn test_add_invalid_name() {
        let env = TestEnv::new().await;
        let err_msg = add_category(env.config(), "Food & Drink")
            .unwrap_err()
            .to_string();
        assert!(err_msg.contains("Invalid category name"));
        let err_msg = add_category(env.config(), "   ").unwrap_err().to_string();
        assert_eq!(err_msg, "Please enter a category name");
    }
}
