//! Configuration path utilities for quiver.
//!
//! This module provides functions for resolving configuration file paths
//! and expanding shell variables like `~` in paths.

/// Default directory holding catalog sheet files
const DEFAULT_CATALOG_DIR: &str = "~/.quiver/catalog";
/// Default path for the persistent variables file
const DEFAULT_VARIABLES_PATH: &str = "~/.quiver/variables.yml";
/// Default path for the debug log file
const DEFAULT_LOG_PATH: &str = "~/.quiver/quiver.log";

pub const APP_NAME: &str = "quiver";

/// Maximum length of the search query
pub const SEARCH_CHAR_LIMIT: usize = 100;
/// Maximum length of a single argument value
pub const ARG_CHAR_LIMIT: usize = 200;

/// Formatted version for display, e.g. `v0.3.0`.
pub fn version_string() -> String {
    format!("v{}", env!("CARGO_PKG_VERSION"))
}

/// Resolves the catalog directory.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// catalog directory. Shell expansions like `~` are resolved.
pub fn get_catalog_dir(catalog_dir_arg: &Option<String>) -> String {
    let catalog_dir = match catalog_dir_arg {
        Some(catalog_dir) => catalog_dir,
        None => DEFAULT_CATALOG_DIR,
    };

    shellexpand::tilde(catalog_dir).to_string()
}

/// Resolves the variables file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// variables path. Shell expansions like `~` are resolved.
pub fn get_variables_path(variables_path_arg: &Option<String>) -> String {
    let variables_path = match variables_path_arg {
        Some(variables_path) => variables_path,
        None => DEFAULT_VARIABLES_PATH,
    };

    shellexpand::tilde(variables_path).to_string()
}

/// Resolves the log file path.
pub fn get_log_path(log_path_arg: &Option<String>) -> String {
    let log_path = match log_path_arg {
        Some(log_path) => log_path,
        None => DEFAULT_LOG_PATH,
    };

    shellexpand::tilde(log_path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_catalog_dir_with_custom_path() {
        let custom_path = Some("/custom/catalog".to_string());
        let result = get_catalog_dir(&custom_path);
        assert_eq!(result, "/custom/catalog");
    }

    #[test]
    fn test_get_catalog_dir_with_none() {
        let result = get_catalog_dir(&None);
        // Should expand the tilde in the default path
        assert!(result.contains("catalog"));
        assert!(!result.starts_with('~'));
    }

    #[test]
    fn test_get_catalog_dir_with_tilde() {
        let tilde_path = Some("~/my-catalog".to_string());
        let result = get_catalog_dir(&tilde_path);
        assert!(!result.starts_with('~'));
        assert!(result.ends_with("my-catalog"));
    }

    #[test]
    fn test_get_variables_path_with_custom_path() {
        let custom_path = Some("/custom/variables.yml".to_string());
        let result = get_variables_path(&custom_path);
        assert_eq!(result, "/custom/variables.yml");
    }

    #[test]
    fn test_get_variables_path_with_none() {
        let result = get_variables_path(&None);
        assert!(result.contains("variables.yml"));
        assert!(!result.starts_with('~'));
    }

    #[test]
    fn test_get_log_path_with_none() {
        let result = get_log_path(&None);
        assert!(result.ends_with("quiver.log"));
        assert!(!result.starts_with('~'));
    }

    #[test]
    fn test_version_string_format() {
        let version = version_string();
        assert!(version.starts_with('v'));
        assert!(version.len() > 1);
    }
}
