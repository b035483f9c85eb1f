//! Quiver CLI Library
//!
//! This crate provides the interactive front end for quiver, a launcher for
//! parameterized command templates. It owns the session state machine, the
//! crossterm rendering, terminal injection and process wiring.
//!
//! # Key Features
//!
//! - **Interactive Search**: Multi-term filtering over the catalog with a
//!   scrolling, selectable list
//! - **Argument Entry**: Placeholder review and editing with cyclic focus
//! - **Directives**: `set`/`unset`/`variables`/`tools`/`help` typed straight
//!   into the search box
//! - **Terminal Injection**: The resolved command lands in the shell's input
//!   buffer, ready to review and run
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing
//! - [`session`]: The navigation state machine, modeled as value-semantics
//!   transitions over a [`session::Session`] state
//! - [`ui`]: Crossterm event loop and per-screen renderers
//! - [`inject`]: TIOCSTI-based terminal input injection
//!
//! # Examples
//!
//! ```bash
//! # Interactive mode with the default catalog
//! qv
//!
//! # A custom catalog directory, printing instead of injecting
//! qv -c ./sheets --print-only
//! ```

pub mod cli_args;
pub mod inject;
pub mod session;
pub mod ui;
