//! Crossterm-based interactive UI.
//!
//! [`run`] owns the event loop: it puts the terminal into raw mode on the
//! alternate screen, feeds key and resize events to the session transition
//! functions, and redraws whenever the state value changed. All rendering
//! reads the session; it never mutates it.

use std::io::stdout;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{terminal, ExecutableCommand};

use quiver_core::catalog::CommandRecord;
use quiver_core::error::Result;
use quiver_core::variables::VariableStore;

use crate::session::{Outcome, Session, SessionContext};

pub mod layout;
mod views;

struct RawModeGuard;

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        // Disable raw mode on drop
        let _ = disable_raw_mode();
        let mut stdout = stdout();
        let _ = stdout.execute(LeaveAlternateScreen);
    }
}

/// Runs the interactive session until the user confirms or cancels.
pub fn run(records: &[CommandRecord], store: &VariableStore) -> Result<Outcome> {
    let mut stdout = stdout();
    stdout.execute(EnterAlternateScreen)?;
    enable_raw_mode()?;
    let _raw_mode_guard = RawModeGuard; // Restores the terminal even on early return

    let ctx = SessionContext { records, store };

    let (width, height) = terminal::size()?;
    let mut session = Session::new(records);
    session.width = width;
    session.height = height;

    views::draw(&session, &ctx)?;

    loop {
        if !event::poll(Duration::from_millis(500))? {
            continue;
        }

        let previous = session.clone();

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let (next, outcome) = session.handle_key(key, &ctx);
                session = next;
                if let Some(outcome) = outcome {
                    return Ok(outcome);
                }
            }
            Event::Resize(width, height) => {
                session = session.handle_resize(width, height, &ctx);
            }
            _ => {}
        }

        if session != previous {
            views::draw(&session, &ctx)?;
        }
    }
}

/// Wraps text at word boundaries into lines of at most `width` characters.
///
/// Words longer than the width get a line of their own rather than being
/// split.
pub(crate) fn word_wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// Shortens text to at most `max` characters, marking the cut with `…`.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }

    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_wrap_short_text_single_line() {
        assert_eq!(word_wrap("short text", 40), vec!["short text"]);
    }

    #[test]
    fn test_word_wrap_breaks_at_word_boundaries() {
        let lines = word_wrap("one two three four", 9);
        assert_eq!(lines, vec!["one two", "three", "four"]);
    }

    #[test]
    fn test_word_wrap_long_word_gets_own_line() {
        let lines = word_wrap("a veryveryverylongword b", 6);
        assert_eq!(lines, vec!["a", "veryveryverylongword", "b"]);
    }

    #[test]
    fn test_word_wrap_empty_text() {
        assert_eq!(word_wrap("", 10), vec![""]);
    }

    #[test]
    fn test_truncate_leaves_short_text_alone() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("abcde", 5), "abcde");
    }

    #[test]
    fn test_truncate_marks_the_cut() {
        assert_eq!(truncate("abcdef", 5), "abcd…");
    }
}
