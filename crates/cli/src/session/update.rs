//! Session transition functions.
//!
//! Each handler consumes the previous [`Session`] value and returns the next
//! one, plus an optional [`Outcome`] that ends the session. Filtering and
//! template building are synchronous and bounded by catalog size, so no
//! transition blocks.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::debug;

use quiver_core::config::{ARG_CHAR_LIMIT, SEARCH_CHAR_LIMIT};
use quiver_core::{search, template};

use super::directives::{self, Directive};
use super::types::{Outcome, Screen, Session, SessionContext, StatusLine};
use super::{tool_info_list, tools_page_len, total_tool_pages, TOOLS_PAGE_SIZE};
use crate::ui::layout;

impl Session {
    /// Applies one key event, returning the next session state and an
    /// optional final outcome.
    pub fn handle_key(self, key: KeyEvent, ctx: &SessionContext) -> (Session, Option<Outcome>) {
        // The interrupt key finishes immediately from any screen
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            debug!("user cancelled (ctrl-c)");
            return (self, Some(Outcome::Cancelled));
        }

        match self.screen {
            Screen::Search => self.handle_search_key(key, ctx),
            Screen::ArgumentEntry => self.handle_argument_key(key, ctx),
            Screen::Variables => (self.handle_variables_key(key), None),
            Screen::Tools => (self.handle_tools_key(key, ctx), None),
            Screen::Help => (self.handle_help_key(key), None),
        }
    }

    /// Applies a terminal resize, keeping the cursor inside the new window.
    pub fn handle_resize(mut self, width: u16, height: u16, ctx: &SessionContext) -> Session {
        self.width = width;
        self.height = height;

        if let Some(cursor) = self.cursor {
            let max_visible = layout::max_visible_items(&self, ctx.records);
            if cursor < self.offset {
                self.offset = cursor;
            } else if cursor >= self.offset + max_visible {
                self.offset = cursor + 1 - max_visible;
            }
        }

        self
    }

    // =========================================================================
    // Search screen
    // =========================================================================

    fn handle_search_key(mut self, key: KeyEvent, ctx: &SessionContext) -> (Session, Option<Outcome>) {
        // Any key clears the previous status message
        self.status = None;

        match key.code {
            KeyCode::Esc => {
                debug!("user cancelled from search");
                (self, Some(Outcome::Cancelled))
            }
            KeyCode::Enter => self.handle_search_enter(ctx),
            KeyCode::Up => (self.move_cursor_up(), None),
            KeyCode::Down => (self.move_cursor_down(ctx), None),
            KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                (self.move_cursor_up(), None)
            }
            KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                (self.move_cursor_down(ctx), None)
            }
            KeyCode::PageUp => (self.page_up(ctx), None),
            KeyCode::PageDown => (self.page_down(ctx), None),
            KeyCode::Backspace => {
                if self.query.pop().is_some() {
                    self = self.refilter(ctx);
                }
                (self, None)
            }
            KeyCode::Char('?') if self.query.is_empty() => {
                self.screen = Screen::Help;
                (self, None)
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.query.chars().count() < SEARCH_CHAR_LIMIT {
                    self.query.push(c);
                    self = self.refilter(ctx);
                }
                (self, None)
            }
            _ => (self, None),
        }
    }

    fn handle_search_enter(mut self, ctx: &SessionContext) -> (Session, Option<Outcome>) {
        let query = self.query.trim().to_string();

        // Directives dispatch instead of selecting a record
        if let Some(directive) = directives::parse(&query) {
            return (self.apply_directive(directive, ctx), None);
        }

        let Some(cursor) = self.cursor else {
            return (self, None);
        };
        let Some(&record_index) = self.filtered.get(cursor) else {
            return (self, None);
        };
        let record = &ctx.records[record_index];
        debug!(
            "selected record: {} (tool: {}, source: {})",
            record.title, record.tool, record.source
        );

        let mut placeholders = template::extract_placeholders(&record.command);

        // Pre-fill from the variable store; defaults are already in place
        let mut applied = Vec::new();
        for placeholder in &mut placeholders {
            if let Some(value) = ctx.store.get(&placeholder.name) {
                placeholder.value = value;
                applied.push(placeholder.name.clone());
            }
        }
        if !applied.is_empty() {
            debug!("pre-filled {} argument(s) from variables: {applied:?}", applied.len());
        }

        // Without placeholders there is nothing to review; finish directly
        if placeholders.is_empty() {
            let command = template::build_command(&record.command, &placeholders);
            debug!("command ready (no arguments): {command}");
            return (self, Some(Outcome::Command(command)));
        }

        // Pre-filled values still get shown for review before confirming
        self.focus = placeholders
            .iter()
            .position(|p| p.value.is_empty())
            .unwrap_or(0);
        self.placeholders = placeholders;
        self.selected = Some(record_index);
        self.screen = Screen::ArgumentEntry;
        (self, None)
    }

    fn apply_directive(mut self, directive: Directive, ctx: &SessionContext) -> Session {
        match directive {
            Directive::Set { name, value } => {
                match ctx.store.set(&name, &value) {
                    Ok(()) => {
                        self.status = Some(StatusLine::info(format!("set {name} = {value}")));
                    }
                    Err(e) => {
                        self.status =
                            Some(StatusLine::error(format!("failed to save variable: {e}")));
                    }
                }
                self.clear_query(ctx)
            }
            Directive::Unset { name } => {
                match ctx.store.unset(&name) {
                    Ok(true) => {
                        self.status = Some(StatusLine::info(format!("unset {name}")));
                    }
                    Ok(false) => {
                        self.status =
                            Some(StatusLine::error(format!("variable `{name}` not found")));
                    }
                    Err(e) => {
                        self.status =
                            Some(StatusLine::error(format!("failed to save changes: {e}")));
                    }
                }
                self.clear_query(ctx)
            }
            Directive::Variables => {
                self.screen = Screen::Variables;
                self.clear_query(ctx)
            }
            Directive::Tools => {
                let pages = total_tool_pages(tool_info_list(ctx.records).len());
                self.tools_page = self.tools_page.min(pages - 1);
                self.tools_cursor = 0;
                self.screen = Screen::Tools;
                self.clear_query(ctx)
            }
            Directive::Help => {
                self.screen = Screen::Help;
                self.clear_query(ctx)
            }
            Directive::Invalid { usage } => {
                // Leave the query in place so the user can fix it
                self.status = Some(StatusLine::error(usage));
                self
            }
        }
    }

    fn clear_query(mut self, ctx: &SessionContext) -> Session {
        self.query.clear();
        self.filtered = (0..ctx.records.len()).collect();
        self.cursor = None;
        self.offset = 0;
        self
    }

    fn refilter(mut self, ctx: &SessionContext) -> Session {
        // Directive-shaped queries keep the list; they are commands, not filters
        if directives::is_directive_query(&self.query) {
            return self;
        }

        self.filtered = search::filter_indices(ctx.records, &self.query);
        self.cursor = None;
        self.offset = 0;
        self
    }

    fn move_cursor_up(mut self) -> Session {
        match self.cursor {
            // From the first item to the distinguished unselected position
            Some(0) => self.cursor = None,
            Some(i) => {
                let i = i - 1;
                self.cursor = Some(i);
                if i < self.offset {
                    self.offset = i;
                }
            }
            None => {}
        }
        self
    }

    fn move_cursor_down(mut self, ctx: &SessionContext) -> Session {
        match self.cursor {
            None => {
                if !self.filtered.is_empty() {
                    self.cursor = Some(0);
                    self.offset = 0;
                }
            }
            Some(i) if i + 1 < self.filtered.len() => {
                let i = i + 1;
                self.cursor = Some(i);
                let max_visible = layout::max_visible_items(&self, ctx.records);
                if i >= self.offset + max_visible {
                    self.offset = i + 1 - max_visible;
                }
            }
            Some(_) => {}
        }
        self
    }

    fn page_up(mut self, ctx: &SessionContext) -> Session {
        let Some(cursor) = self.cursor else {
            // Already at the top
            return self;
        };

        let max_visible = layout::max_visible_items(&self, ctx.records);
        if cursor < max_visible {
            self.cursor = None;
            self.offset = 0;
        } else {
            let cursor = cursor - max_visible;
            self.cursor = Some(cursor);
            self.offset = cursor;
        }
        self
    }

    fn page_down(mut self, ctx: &SessionContext) -> Session {
        if self.filtered.is_empty() {
            return self;
        }

        let max_visible = layout::max_visible_items(&self, ctx.records);
        match self.cursor {
            None => {
                self.cursor = Some(0);
                self.offset = 0;
            }
            Some(i) => {
                let cursor = (i + max_visible).min(self.filtered.len() - 1);
                self.cursor = Some(cursor);
                if cursor >= self.offset + max_visible {
                    self.offset = cursor + 1 - max_visible;
                }
            }
        }
        self
    }

    // =========================================================================
    // Argument entry screen
    // =========================================================================

    fn handle_argument_key(
        mut self,
        key: KeyEvent,
        ctx: &SessionContext,
    ) -> (Session, Option<Outcome>) {
        match key.code {
            KeyCode::Esc => {
                debug!("left argument entry, returning to search");
                self.placeholders.clear();
                self.selected = None;
                self.focus = 0;
                self.screen = Screen::Search;
                (self, None)
            }
            KeyCode::Enter => self.submit_arguments(ctx),
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % self.placeholders.len();
                (self, None)
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = if self.focus == 0 {
                    self.placeholders.len() - 1
                } else {
                    self.focus - 1
                };
                (self, None)
            }
            KeyCode::Backspace => {
                self.placeholders[self.focus].value.pop();
                (self, None)
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let value = &mut self.placeholders[self.focus].value;
                if value.chars().count() < ARG_CHAR_LIMIT {
                    value.push(c);
                }
                (self, None)
            }
            _ => (self, None),
        }
    }

    fn submit_arguments(self, ctx: &SessionContext) -> (Session, Option<Outcome>) {
        // Refuse to finish while any argument is empty; no error shown
        if template::has_incomplete(&self.placeholders) {
            debug!(
                "refusing to finish, empty argument(s): {:?}",
                template::incomplete_names(&self.placeholders)
            );
            return (self, None);
        }

        let Some(record_index) = self.selected else {
            return (self, None);
        };

        let command = template::build_command(&ctx.records[record_index].command, &self.placeholders);
        debug!("command built from arguments: {command}");
        (self, Some(Outcome::Command(command)))
    }

    // =========================================================================
    // Variables, tools, help screens
    // =========================================================================

    fn handle_variables_key(mut self, key: KeyEvent) -> Session {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                self.screen = Screen::Search;
            }
            _ => {}
        }
        self
    }

    fn handle_tools_key(mut self, key: KeyEvent, ctx: &SessionContext) -> Session {
        let tools = tool_info_list(ctx.records);
        let total_pages = total_tool_pages(tools.len());

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.screen = Screen::Search;
            }
            KeyCode::Enter => {
                // Search for the highlighted tool; plain exit otherwise
                let index = self.tools_page * TOOLS_PAGE_SIZE + self.tools_cursor;
                if let Some(tool) = tools.get(index) {
                    self.query = tool.name.clone();
                    self.filtered = search::filter_indices(ctx.records, &self.query);
                    self.cursor = None;
                    self.offset = 0;
                }
                self.screen = Screen::Search;
            }
            KeyCode::Left | KeyCode::Char('h') => {
                if self.tools_page > 0 {
                    self.tools_page -= 1;
                    self.tools_cursor = 0;
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.tools_page + 1 < total_pages {
                    self.tools_page += 1;
                    self.tools_cursor = 0;
                }
            }
            KeyCode::Up => {
                self.tools_cursor = self.tools_cursor.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.tools_cursor + 1 < tools_page_len(tools.len(), self.tools_page) {
                    self.tools_cursor += 1;
                }
            }
            _ => {}
        }
        self
    }

    fn handle_help_key(mut self, key: KeyEvent) -> Session {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?') => {
                self.screen = Screen::Search;
            }
            _ => {}
        }
        self
    }
}
