//! Command-line argument parsing.
//!
//! This module defines the command-line interface structure for the `qv`
//! binary using the `clap` crate.

use clap::Parser;

/// Command-line arguments for the quiver launcher.
///
/// All paths default to locations under `~/.quiver/` and support `~`
/// expansion.
#[derive(Parser, Debug)]
#[command(term_width = 0)] // Just to make testing across clap features easier
pub struct Args {
    /// Directory containing the catalog sheet YAML files.
    ///
    /// If not provided, defaults to `~/.quiver/catalog`.
    #[arg(long, short = 'c')]
    pub catalog_dir: Option<String>,

    /// Path to the file that stores persistent variables.
    ///
    /// If not provided, defaults to `~/.quiver/variables.yml`.
    #[arg(long)]
    pub variables_path: Option<String>,

    /// Path to the debug log file.
    ///
    /// If not provided, defaults to `~/.quiver/quiver.log`.
    #[arg(long)]
    pub log_path: Option<String>,

    /// Print the resolved command to stdout instead of injecting it into
    /// the terminal input buffer.
    #[arg(long, short = 'p', action)]
    pub print_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_args_default_values() {
        let args = Args::parse_from(["qv"]);

        assert!(args.catalog_dir.is_none());
        assert!(args.variables_path.is_none());
        assert!(args.log_path.is_none());
        assert!(!args.print_only);
    }

    #[test]
    fn test_args_short_flags() {
        let args = Args::parse_from(["qv", "-c", "/custom/catalog", "-p"]);

        assert_eq!(args.catalog_dir, Some("/custom/catalog".to_string()));
        assert!(args.print_only);
    }

    #[test]
    fn test_args_long_flags() {
        let args = Args::parse_from([
            "qv",
            "--catalog-dir",
            "/custom/catalog",
            "--variables-path",
            "/custom/variables.yml",
            "--log-path",
            "/custom/debug.log",
            "--print-only",
        ]);

        assert_eq!(args.catalog_dir, Some("/custom/catalog".to_string()));
        assert_eq!(
            args.variables_path,
            Some("/custom/variables.yml".to_string())
        );
        assert_eq!(args.log_path, Some("/custom/debug.log".to_string()));
        assert!(args.print_only);
    }
}
