//! Catalog loading.
//!
//! Reads every YAML sheet under the catalog directory and flattens them into
//! command records. One unparsable sheet is skipped and counted, never fatal
//! to the rest of the catalog; a catalog with nothing loadable is.

use std::fs;
use std::path::Path;

use log::{info, warn};
use walkdir::WalkDir;

use crate::catalog::{CatalogSheet, CommandRecord};
use crate::error::{Error, Result};

/// Counters observable for diagnostics after a catalog load.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    /// Sheet files considered.
    pub files: usize,
    /// Records successfully loaded.
    pub loaded: usize,
    /// Sheets skipped because they could not be read or parsed.
    pub failed: usize,
}

/// Loads all catalog sheets under `catalog_dir`, recursively.
///
/// Sheets are visited in sorted path order so the catalog order is stable
/// across runs. Files without a `.yml`/`.yaml` extension are ignored.
///
/// # Errors
///
/// Returns an error if the catalog directory itself cannot be read, or if
/// no records could be loaded at all.
pub fn load_catalog(catalog_dir: &str) -> Result<(Vec<CommandRecord>, LoadStats)> {
    fs::metadata(catalog_dir).map_err(|e| {
        Error::io_error(
            "catalog directory".to_string(),
            catalog_dir.to_string(),
            e,
        )
    })?;

    let mut records = Vec::new();
    let mut stats = LoadStats::default();

    for entry in WalkDir::new(catalog_dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable catalog entry: {e}");
                stats.failed += 1;
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_sheet_file(entry.path()) {
            continue;
        }

        stats.files += 1;
        match load_sheet(entry.path()) {
            Ok(sheet_records) => {
                stats.loaded += sheet_records.len();
                records.extend(sheet_records);
            }
            Err(e) => {
                warn!("skipping catalog sheet: {e}");
                stats.failed += 1;
            }
        }
    }

    if records.is_empty() {
        return Err(Error::empty_catalog(catalog_dir.to_string()));
    }

    info!(
        "catalog loading complete: {} file(s) processed, {} record(s) loaded, {} error(s)",
        stats.files, stats.loaded, stats.failed
    );

    Ok((records, stats))
}

fn is_sheet_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml")
    )
}

fn load_sheet(path: &Path) -> Result<Vec<CommandRecord>> {
    let contents = fs::read_to_string(path).map_err(|e| {
        Error::io_error(
            "catalog sheet".to_string(),
            path.display().to_string(),
            e,
        )
    })?;

    let sheet: CatalogSheet = serde_yaml::from_str(&contents).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            "catalog sheet".to_string(),
            path.display().to_string(),
            e,
        )
    })?;

    Ok(sheet.into_records(&path.display().to_string()))
}
