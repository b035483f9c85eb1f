//! Type definitions for the interactive session.
//!
//! This module defines the session state threaded through every transition,
//! the screen enum, and the final outcome handed back to `main`.

use quiver_core::catalog::CommandRecord;
use quiver_core::template::Placeholder;
use quiver_core::variables::VariableStore;

use super::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// The current screen of the interactive session.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Screen {
    /// Main search view
    Search,
    /// Argument input view
    ArgumentEntry,
    /// Stored variables view
    Variables,
    /// Tool list view
    Tools,
    /// Help screen
    Help,
}

/// The only externally visible result of a session.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Outcome {
    /// The fully resolved command, ready for terminal injection.
    Command(String),
    /// The user aborted; nothing is produced.
    Cancelled,
}

/// One-line user feedback shown above the search prompt.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
}

impl StatusLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Read-only collaborators every transition can consult.
pub struct SessionContext<'a> {
    pub records: &'a [CommandRecord],
    pub store: &'a VariableStore,
}

/// Complete state of the interactive session.
///
/// Transitions consume the previous value and return the next one, so there
/// is exactly one live session state at any point and redraws can compare
/// values to decide whether anything changed.
#[derive(Clone, PartialEq, Debug)]
pub struct Session {
    pub screen: Screen,
    /// Current search query text
    pub query: String,
    /// Indices into the catalog matching the query, in catalog order
    pub filtered: Vec<usize>,
    /// Cursor within `filtered`; `None` is the distinguished "nothing
    /// selected" position below the first item
    pub cursor: Option<usize>,
    /// Scroll offset of the visible list window
    pub offset: usize,
    /// Catalog index of the record being parameterized
    pub selected: Option<usize>,
    /// Placeholders of the selected record, in first-appearance order
    pub placeholders: Vec<Placeholder>,
    /// Focused placeholder in the argument entry screen
    pub focus: usize,
    pub status: Option<StatusLine>,
    /// Current tools page, remembered across visits within the session
    pub tools_page: usize,
    /// Highlighted row within the current tools page
    pub tools_cursor: usize,
    pub width: u16,
    pub height: u16,
}

impl Session {
    /// Fresh session showing the whole catalog with nothing selected.
    pub fn new(records: &[CommandRecord]) -> Self {
        Self {
            screen: Screen::Search,
            query: String::new(),
            filtered: (0..records.len()).collect(),
            cursor: None, // No item selected initially
            offset: 0,
            selected: None,
            placeholders: Vec::new(),
            focus: 0,
            status: None,
            tools_page: 0,
            tools_cursor: 0,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }

    /// The record currently under the cursor, if any.
    pub fn record_under_cursor<'a>(
        &self,
        records: &'a [CommandRecord],
    ) -> Option<&'a CommandRecord> {
        let cursor = self.cursor?;
        let record_index = *self.filtered.get(cursor)?;
        records.get(record_index)
    }
}
