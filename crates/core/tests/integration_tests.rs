//! Integration tests for quiver-core
//!
//! These tests verify that the core functionality works together correctly
//! by testing complete workflows end-to-end.

use quiver_core::{
    config::{get_catalog_dir, get_variables_path},
    loading::load_catalog,
    search::filter_indices,
    template::{build_command, extract_placeholders, has_incomplete},
    variables::VariableStore,
};
use std::fs;
use std::io::Write;
use tempfile::tempdir;

const CATALOG_SHEET: &str = r#"
tool: nmap
tags: [scan, recon]
actions:
  - title: Service scan
    desc: Version detection scan
    command: nmap -sV {{ip}}
  - title: Full port scan
    command: nmap -p- -T{{timing|4}} {{ip}}
  - title: List scan
    command: nmap -sL 10.0.0.0/24
"#;

fn write_sheet(dir: &std::path::Path, name: &str, contents: &str) {
    let mut file = fs::File::create(dir.join(name)).unwrap();
    write!(file, "{contents}").unwrap();
}

/// Test loading a catalog and resolving one of its commands end-to-end
#[test]
fn test_catalog_to_resolved_command_workflow() {
    let dir = tempdir().unwrap();
    write_sheet(dir.path(), "nmap.yml", CATALOG_SHEET);

    let (records, stats) = load_catalog(dir.path().to_str().unwrap()).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(stats.failed, 0);

    // Narrow to the service scan via a multi-term query
    let matches = filter_indices(&records, "nmap service");
    assert_eq!(matches.len(), 1);
    let record = &records[matches[0]];

    // Extract its placeholder and fill it like the argument screen would
    let mut placeholders = extract_placeholders(&record.command);
    assert_eq!(placeholders.len(), 1);
    assert_eq!(placeholders[0].name, "ip");
    assert!(has_incomplete(&placeholders));

    placeholders[0].value = "10.10.10.10".to_string();
    assert!(!has_incomplete(&placeholders));
    assert_eq!(
        build_command(&record.command, &placeholders),
        "nmap -sV 10.10.10.10"
    );
}

/// Test that stored variables pre-fill placeholders across store reopen
#[test]
fn test_variable_store_prefill_workflow() {
    let dir = tempdir().unwrap();
    let variables_path = dir.path().join("variables.yml");

    {
        let store = VariableStore::open(&variables_path).unwrap();
        store.set("ip", "10.0.0.1").unwrap();
    }

    // A freshly constructed store pointed at the same file sees the value
    let store = VariableStore::open(&variables_path).unwrap();
    assert_eq!(store.get("ip"), Some("10.0.0.1".to_string()));

    let (resolved, applied) = store.apply_to_command("nmap -sV {{ip}} -p {{port}}");
    assert_eq!(resolved, "nmap -sV 10.0.0.1 -p {{port}}");
    assert_eq!(applied, vec!["ip".to_string()]);

    // The still-missing placeholder is found by extraction afterwards
    let placeholders = extract_placeholders(&resolved);
    assert_eq!(placeholders.len(), 1);
    assert_eq!(placeholders[0].name, "port");
}

/// Test defaults flowing from extraction through building
#[test]
fn test_defaults_flow_through_build() {
    let template = "nmap -p- -T{{timing|4}} {{ip}}";
    let mut placeholders = extract_placeholders(template);

    // timing got its default, ip did not
    assert_eq!(placeholders[0].name, "timing");
    assert_eq!(placeholders[0].value, "4");
    assert_eq!(placeholders[1].name, "ip");
    assert!(has_incomplete(&placeholders));

    placeholders[1].value = "192.168.0.7".to_string();
    assert_eq!(
        build_command(template, &placeholders),
        "nmap -p- -T4 192.168.0.7"
    );
}

/// Test configuration path resolution workflow
#[test]
fn test_configuration_path_workflow() {
    // Test default paths
    let default_catalog = get_catalog_dir(&None);
    assert!(default_catalog.contains("catalog"));
    assert!(!default_catalog.starts_with('~')); // Should be expanded

    let default_variables = get_variables_path(&None);
    assert!(default_variables.contains("variables.yml"));
    assert!(!default_variables.starts_with('~')); // Should be expanded

    // Test custom paths
    let custom_catalog = get_catalog_dir(&Some("/custom/catalog".to_string()));
    assert_eq!(custom_catalog, "/custom/catalog");

    let custom_variables = get_variables_path(&Some("/custom/vars.yml".to_string()));
    assert_eq!(custom_variables, "/custom/vars.yml");
}

/// Test error recovery across a partially broken catalog
#[test]
fn test_partial_catalog_failure_workflow() {
    let dir = tempdir().unwrap();
    write_sheet(dir.path(), "good.yml", CATALOG_SHEET);
    write_sheet(dir.path(), "broken.yml", "tool: [unterminated");
    write_sheet(dir.path(), "empty.yml", "");

    let (records, stats) = load_catalog(dir.path().to_str().unwrap()).unwrap();
    // The good sheet still loads in full
    assert_eq!(records.len(), 3);
    assert_eq!(stats.files, 3);
    assert_eq!(stats.failed, 2);
}
