//! Layout calculations.
//!
//! The visible list window is whatever terminal height remains after the
//! header, the optional status line, the optional detail box and the footer.
//! These heights must stay in sync with what the views actually draw, so the
//! views render exactly the lines computed here.

use quiver_core::catalog::CommandRecord;

use crate::session::{Session, DEFAULT_WIDTH, MIN_VISIBLE_ITEMS};

const MIN_WIDTH: usize = 40;

/// Usable terminal width; very narrow terminals fall back to the default.
pub fn effective_width(session: &Session) -> usize {
    let width = session.width as usize;
    if width < MIN_WIDTH {
        DEFAULT_WIDTH as usize
    } else {
        width
    }
}

/// Title bar plus one blank line.
pub fn header_height() -> usize {
    2
}

/// Status line plus one blank line, when a status is showing.
pub fn status_height(session: &Session) -> usize {
    if session.status.is_some() {
        2
    } else {
        0
    }
}

/// Lines of the detail box for the record under the cursor, plus one blank
/// line; zero when nothing is selected.
pub fn detail_height(session: &Session, records: &[CommandRecord]) -> usize {
    match session.record_under_cursor(records) {
        Some(record) => detail_lines(record, effective_width(session)).len() + 1,
        None => 0,
    }
}

/// Search prompt, one blank line and the footer bar.
pub fn footer_height() -> usize {
    3
}

/// Rows available for the list, never less than [`MIN_VISIBLE_ITEMS`].
pub fn max_visible_items(session: &Session, records: &[CommandRecord]) -> usize {
    let fixed = header_height()
        + status_height(session)
        + detail_height(session, records)
        + footer_height();

    (session.height as usize)
        .saturating_sub(fixed)
        .max(MIN_VISIBLE_ITEMS)
}

/// The text lines of the detail box: title, wrapped description, command.
pub fn detail_lines(record: &CommandRecord, width: usize) -> Vec<String> {
    let text_width = width.saturating_sub(4).max(20);

    let mut lines = vec![super::truncate(&record.title, text_width)];
    if let Some(description) = &record.description {
        lines.extend(super::word_wrap(description, text_width));
    }
    lines.push(super::truncate(&record.command, text_width));
    lines
}
