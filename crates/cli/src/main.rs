use std::fs;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use log::{debug, info, warn};

use quiver_core::error::Result;
use quiver_core::variables::VariableStore;
use quiver_core::{config, loading};

use crate::cli_args::Args;
use crate::session::Outcome;

mod cli_args;
mod inject;
pub mod session;
pub mod ui;

fn execute() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_path);

    let catalog_dir = config::get_catalog_dir(&args.catalog_dir);
    debug!("catalog dir: `{catalog_dir}`");

    let (records, stats) = loading::load_catalog(&catalog_dir)?;
    info!(
        "loaded {} record(s) from {} file(s), {} failure(s)",
        records.len(),
        stats.files,
        stats.failed
    );

    let store = open_variable_store(&args.variables_path);

    match ui::run(&records, &store)? {
        Outcome::Cancelled => {
            info!("session cancelled, nothing to inject");
        }
        Outcome::Command(command) => {
            info!("resolved command: {command}");
            if args.print_only || !inject::inject_into_terminal(&command) {
                // The command is still usable even when injection is not
                println!("{command}");
            }
        }
    }

    Ok(())
}

/// Opens the variable store, degrading to a session-only in-memory store
/// when the config directory cannot be created or the existing file is
/// unreadable. A corrupt file is left on disk untouched.
fn open_variable_store(variables_path_arg: &Option<String>) -> VariableStore {
    let path = config::get_variables_path(variables_path_arg);

    if let Some(parent) = Path::new(&path).parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!(
                "cannot create config directory {}: {e}; variables will not persist",
                parent.display()
            );
            return VariableStore::in_memory();
        }
    }

    match VariableStore::open(&path) {
        Ok(store) => store,
        Err(e) => {
            warn!("failed to load variables, continuing with in-memory store: {e}");
            VariableStore::in_memory()
        }
    }
}

/// Directs the logger at a file: the UI owns the terminal, so logging to
/// stderr would corrupt the display. Falls back to the default target when
/// the log file cannot be opened.
fn init_logging(log_path_arg: &Option<String>) {
    let log_path = config::get_log_path(log_path_arg);
    if let Some(parent) = Path::new(&log_path).parent() {
        let _ = fs::create_dir_all(parent);
    }

    match fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => env_logger::Builder::from_default_env()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init(),
        Err(_) => env_logger::init(),
    }
}

fn main() -> ExitCode {
    match execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
