//! Quiver Core Library
//!
//! This crate provides the core functionality for quiver, an interactive
//! launcher that lets users browse a catalog of parameterized command
//! templates, fill in placeholders, and hand the resolved command back to
//! their shell.
//!
//! # Key Features
//!
//! - **Catalog Model**: Parse YAML catalog sheets into flat command records
//! - **Placeholder Templating**: Extract and substitute `{{name}}` and
//!   `{{name|default}}` arguments in command templates
//! - **Search**: Multi-term AND-of-substrings filtering over the catalog
//! - **Variable Store**: Durable key/value variables that pre-fill arguments
//!   across sessions
//! - **Error Handling**: One error type for all failure modes
//!
//! # Examples
//!
//! Loading the catalog from a sheet directory:
//!
//! ```no_run
//! use quiver_core::loading::load_catalog;
//!
//! let (records, stats) = load_catalog("~/.quiver/catalog")?;
//! println!("loaded {} record(s) from {} file(s)", records.len(), stats.files);
//! # Ok::<(), quiver_core::error::Error>(())
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod loading;
pub mod search;
pub mod template;
pub mod variables;
