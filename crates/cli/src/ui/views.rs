//! Per-screen renderers.
//!
//! Every renderer queues a full redraw of its screen and reports where the
//! terminal cursor should sit (the search prompt or the focused argument
//! field), or nothing for the static screens.

use std::io::{stdout, Stdout, Write};

use crossterm::cursor::{self, MoveTo};
use crossterm::queue;
use crossterm::style::{
    Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{Clear, ClearType};
use itertools::Itertools;

use quiver_core::catalog::CommandRecord;
use quiver_core::config;
use quiver_core::error::Result;
use quiver_core::template;

use super::{layout, truncate};
use crate::session::{
    directives, tool_info_list, total_tool_pages, Screen, Session, SessionContext, StatusLine,
    TOOLS_PAGE_SIZE,
};

const TOOL_COLUMN_WIDTH: usize = 12;

/// Variable suggestions shown with the `set` directive hint.
const COMMON_VARIABLES: &[(&str, &str)] = &[
    ("domain", "Target domain (e.g. corp.local)"),
    ("hash", "NTLM hash"),
    ("ip", "Target IP address (e.g. 10.10.10.10)"),
    ("lhost", "Local host (your IP)"),
    ("lport", "Local port (for reverse shell)"),
    ("output", "Output file name"),
    ("pass", "Password"),
    ("port", "Port number (e.g. 445)"),
    ("url", "Target URL"),
    ("user", "Username (e.g. admin)"),
    ("wordlist", "Wordlist path"),
];

/// Redraws the whole screen for the current session state.
pub fn draw(session: &Session, ctx: &SessionContext) -> Result<()> {
    let mut stdout = stdout();
    queue!(stdout, cursor::Hide, Clear(ClearType::All))?;

    let cursor_position = match session.screen {
        Screen::Search => draw_search(&mut stdout, session, ctx)?,
        Screen::ArgumentEntry => draw_argument_entry(&mut stdout, session, ctx)?,
        Screen::Variables => {
            draw_variables(&mut stdout, session, ctx)?;
            None
        }
        Screen::Tools => {
            draw_tools(&mut stdout, session, ctx)?;
            None
        }
        Screen::Help => {
            draw_help(&mut stdout, session)?;
            None
        }
    };

    if let Some((column, row)) = cursor_position {
        queue!(stdout, MoveTo(column, row), cursor::Show)?;
    }

    stdout.flush()?;
    Ok(())
}

// =============================================================================
// Search view
// =============================================================================

fn draw_search(
    stdout: &mut Stdout,
    session: &Session,
    ctx: &SessionContext,
) -> Result<Option<(u16, u16)>> {
    let width = layout::effective_width(session);
    let mut row = draw_header(stdout, session)?;

    if let Some(status) = &session.status {
        draw_status(stdout, row, status)?;
        row += 2;
    }

    if let Some(record) = session.record_under_cursor(ctx.records) {
        row = draw_detail_box(stdout, row, record, width)?;
    }

    let prompt_row = row;
    queue!(
        stdout,
        MoveTo(0, prompt_row),
        SetForegroundColor(Color::Cyan),
        Print("❯ "),
        SetForegroundColor(Color::Reset),
        Print(&session.query)
    )?;
    row += 2;

    if directives::is_directive_query(&session.query) {
        draw_directive_hints(stdout, row, session, ctx)?;
    } else {
        draw_record_list(stdout, row, session, ctx, width)?;
    }

    draw_search_footer(stdout, session, ctx, width)?;

    let cursor_column = 2 + session.query.chars().count() as u16;
    Ok(Some((cursor_column, prompt_row)))
}

fn draw_record_list(
    stdout: &mut Stdout,
    start_row: u16,
    session: &Session,
    ctx: &SessionContext,
    width: usize,
) -> Result<()> {
    if session.filtered.is_empty() {
        queue!(
            stdout,
            MoveTo(0, start_row),
            SetForegroundColor(Color::Red),
            Print("No matching commands!"),
            SetForegroundColor(Color::Reset)
        )?;
        return Ok(());
    }

    let max_visible = layout::max_visible_items(session, ctx.records);
    let visible = session
        .filtered
        .iter()
        .enumerate()
        .skip(session.offset)
        .take(max_visible);

    for (i, &record_index) in visible {
        let y = start_row + (i - session.offset) as u16;
        let is_selected = session.cursor == Some(i);
        draw_record_row(stdout, y, &ctx.records[record_index], is_selected, width)?;
    }

    Ok(())
}

fn draw_record_row(
    stdout: &mut Stdout,
    row: u16,
    record: &CommandRecord,
    is_selected: bool,
    width: usize,
) -> Result<()> {
    let tool = format!(
        "{:<width$}",
        truncate(&record.tool, TOOL_COLUMN_WIDTH),
        width = TOOL_COLUMN_WIDTH
    );
    let title = truncate(
        &record.to_string(),
        width.saturating_sub(TOOL_COLUMN_WIDTH + 4),
    );

    queue!(stdout, MoveTo(0, row))?;

    if is_selected {
        let content = format!(" {tool} {title}");
        let padding = " ".repeat(width.saturating_sub(content.chars().count()));
        queue!(
            stdout,
            SetAttribute(Attribute::Bold),
            SetBackgroundColor(Color::DarkBlue),
            SetForegroundColor(Color::Yellow),
            Print(content),
            Print(padding),
            SetAttribute(Attribute::Reset),
            SetBackgroundColor(Color::Reset),
            SetForegroundColor(Color::Reset)
        )?;
    } else {
        queue!(
            stdout,
            Print(" "),
            SetForegroundColor(Color::DarkCyan),
            Print(tool),
            SetForegroundColor(Color::Reset),
            Print(" "),
            Print(title)
        )?;
    }

    Ok(())
}

fn draw_directive_hints(
    stdout: &mut Stdout,
    start_row: u16,
    session: &Session,
    ctx: &SessionContext,
) -> Result<()> {
    let mut lines: Vec<String> = Vec::new();

    match directives::parse(&session.query) {
        Some(directives::Directive::Set { .. }) | Some(directives::Directive::Invalid { .. })
            if session.query.trim().to_lowercase().starts_with("set") =>
        {
            lines.push("set <name>=<value>  store a variable for future commands".to_string());
            lines.push(String::new());
            lines.push("common names:".to_string());
            for (name, description) in COMMON_VARIABLES {
                lines.push(format!("  {name:<10} {description}"));
            }
        }
        Some(directives::Directive::Unset { .. })
        | Some(directives::Directive::Invalid { .. }) => {
            lines.push("unset <name>  remove a stored variable".to_string());
            let stored = ctx.store.all();
            if !stored.is_empty() {
                lines.push(String::new());
                lines.push(format!("stored: {}", stored.keys().join(", ")));
            }
        }
        Some(directives::Directive::Variables) => {
            lines.push("variables  list the stored variables".to_string());
        }
        Some(directives::Directive::Tools) => {
            lines.push("tools  browse tools with command counts".to_string());
        }
        Some(directives::Directive::Help) => {
            lines.push("help  show the help screen".to_string());
        }
        _ => {}
    }

    queue!(stdout, SetForegroundColor(Color::DarkGrey))?;
    for (i, line) in lines.iter().enumerate() {
        queue!(stdout, MoveTo(0, start_row + i as u16), Print(line))?;
    }
    queue!(stdout, SetForegroundColor(Color::Reset))?;

    Ok(())
}

fn draw_search_footer(
    stdout: &mut Stdout,
    session: &Session,
    ctx: &SessionContext,
    width: usize,
) -> Result<()> {
    let position = match session.cursor {
        Some(i) => i + 1,
        None => 0,
    };

    let mut segments = vec![format!("{position}/{}", session.filtered.len())];
    let variable_count = ctx.store.len();
    if variable_count > 0 {
        segments.push(format!("variables: {variable_count}"));
    }
    segments.push("↑/↓ nav".to_string());
    segments.push("set k=v".to_string());
    segments.push("unset k".to_string());
    segments.push("variables".to_string());
    segments.push("tools".to_string());
    segments.push("help".to_string());
    segments.push("esc quit".to_string());

    draw_footer_line(stdout, session, &truncate(&segments.join(" │ "), width))
}

// =============================================================================
// Argument entry view
// =============================================================================

fn draw_argument_entry(
    stdout: &mut Stdout,
    session: &Session,
    ctx: &SessionContext,
) -> Result<Option<(u16, u16)>> {
    let width = layout::effective_width(session);
    let mut row = draw_header(stdout, session)?;

    let Some(record_index) = session.selected else {
        return Ok(None);
    };
    let record = &ctx.records[record_index];

    queue!(
        stdout,
        MoveTo(0, row),
        SetAttribute(Attribute::Bold),
        Print(truncate(&record.title, width)),
        SetAttribute(Attribute::Reset)
    )?;
    row += 1;
    queue!(
        stdout,
        MoveTo(0, row),
        SetForegroundColor(Color::DarkGrey),
        Print(truncate(&record.command, width)),
        SetForegroundColor(Color::Reset)
    )?;
    row += 2;

    let name_width = session
        .placeholders
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(8)
        .min(24);

    let fields_start = row;
    for (i, placeholder) in session.placeholders.iter().enumerate() {
        let focused = i == session.focus;
        let marker = if focused { "❯ " } else { "  " };
        let name = format!("{:<width$}", placeholder.name, width = name_width);

        queue!(stdout, MoveTo(0, fields_start + i as u16), Print(marker))?;
        if focused {
            queue!(
                stdout,
                SetAttribute(Attribute::Bold),
                SetForegroundColor(Color::Yellow),
                Print(&name),
                SetAttribute(Attribute::Reset),
                SetForegroundColor(Color::Reset)
            )?;
        } else {
            queue!(stdout, Print(&name))?;
        }
        queue!(stdout, Print(": "), Print(&placeholder.value))?;

        if placeholder.value.is_empty() && !placeholder.default.is_empty() {
            queue!(
                stdout,
                SetForegroundColor(Color::DarkGrey),
                Print(format!("({})", placeholder.default)),
                SetForegroundColor(Color::Reset)
            )?;
        }
    }
    row = fields_start + session.placeholders.len() as u16 + 1;

    if template::has_incomplete(&session.placeholders) {
        let missing = template::incomplete_names(&session.placeholders).join(", ");
        queue!(
            stdout,
            MoveTo(0, row),
            SetForegroundColor(Color::DarkGrey),
            Print(truncate(&format!("missing: {missing}"), width)),
            SetForegroundColor(Color::Reset)
        )?;
    }

    draw_footer_line(
        stdout,
        session,
        "tab/↓ next │ shift-tab/↑ previous │ enter confirm │ esc back",
    )?;

    let value_length = session.placeholders[session.focus].value.chars().count();
    let cursor_column = (2 + name_width + 2 + value_length) as u16;
    let cursor_row = fields_start + session.focus as u16;
    Ok(Some((cursor_column, cursor_row)))
}

// =============================================================================
// Variables view
// =============================================================================

fn draw_variables(stdout: &mut Stdout, session: &Session, ctx: &SessionContext) -> Result<()> {
    let width = layout::effective_width(session);
    let mut row = draw_header(stdout, session)?;

    let variables = ctx.store.all();
    queue!(
        stdout,
        MoveTo(0, row),
        SetAttribute(Attribute::Bold),
        Print(format!("Variables ({})", variables.len())),
        SetAttribute(Attribute::Reset)
    )?;
    row += 2;

    if variables.is_empty() {
        queue!(
            stdout,
            MoveTo(0, row),
            SetForegroundColor(Color::DarkGrey),
            Print("No variables set"),
            SetForegroundColor(Color::Reset)
        )?;
    } else {
        let visible_rows = (session.height as usize).saturating_sub(row as usize + 2);
        let shown = variables.iter().take(visible_rows.max(1));
        let mut drawn = 0usize;
        for (name, value) in shown {
            queue!(
                stdout,
                MoveTo(0, row + drawn as u16),
                Print("  "),
                SetForegroundColor(Color::Cyan),
                Print(format!("{name:<16}")),
                SetForegroundColor(Color::Reset),
                Print(" = "),
                Print(truncate(value, width.saturating_sub(22)))
            )?;
            drawn += 1;
        }
        if variables.len() > drawn {
            queue!(
                stdout,
                MoveTo(0, row + drawn as u16),
                SetForegroundColor(Color::DarkGrey),
                Print(format!("… and {} more", variables.len() - drawn)),
                SetForegroundColor(Color::Reset)
            )?;
        }
    }

    draw_footer_line(stdout, session, "esc/enter back │ set k=v │ unset k")
}

// =============================================================================
// Tools view
// =============================================================================

fn draw_tools(stdout: &mut Stdout, session: &Session, ctx: &SessionContext) -> Result<()> {
    let mut row = draw_header(stdout, session)?;

    let tools = tool_info_list(ctx.records);
    let total_pages = total_tool_pages(tools.len());

    queue!(
        stdout,
        MoveTo(0, row),
        SetAttribute(Attribute::Bold),
        Print(format!("Tools ({})", tools.len())),
        SetAttribute(Attribute::Reset),
        SetForegroundColor(Color::DarkGrey),
        Print(format!("   page {}/{}", session.tools_page + 1, total_pages)),
        SetForegroundColor(Color::Reset)
    )?;
    row += 2;

    let page_tools = tools
        .iter()
        .skip(session.tools_page * TOOLS_PAGE_SIZE)
        .take(TOOLS_PAGE_SIZE);

    for (i, tool) in page_tools.enumerate() {
        let y = row + i as u16;
        let content = format!(" {:<24} {:>4} command(s)", tool.name, tool.count);

        queue!(stdout, MoveTo(0, y))?;
        if i == session.tools_cursor {
            queue!(
                stdout,
                SetAttribute(Attribute::Bold),
                SetBackgroundColor(Color::DarkBlue),
                SetForegroundColor(Color::Yellow),
                Print(&content),
                SetAttribute(Attribute::Reset),
                SetBackgroundColor(Color::Reset),
                SetForegroundColor(Color::Reset)
            )?;
        } else {
            queue!(stdout, Print(&content))?;
        }
    }

    draw_footer_line(
        stdout,
        session,
        "←/→ or h/l page │ ↑/↓ select │ enter search tool │ esc back",
    )
}

// =============================================================================
// Help view
// =============================================================================

fn draw_help(stdout: &mut Stdout, session: &Session) -> Result<()> {
    let row = draw_header(stdout, session)?;

    let lines = [
        "Navigation",
        "  ↑/↓, ctrl+p/ctrl+n    move the selection (↑ from the top clears it)",
        "  pgup/pgdn             move by a page",
        "  enter                 select the highlighted command",
        "  esc                   quit (from search) or go back",
        "  ctrl+c                quit from anywhere",
        "",
        "Search box directives",
        "  set <name>=<value>    store a variable; it pre-fills {{name}} everywhere",
        "  unset <name>          remove a stored variable",
        "  variables             list the stored variables",
        "  tools                 browse tools with command counts",
        "  help                  this screen",
        "",
        "Arguments",
        "  tab/↓, shift-tab/↑    cycle through the fields",
        "  enter                 confirm once every field is filled",
        "",
        "The final command is typed into your terminal for review;",
        "it is never executed on your behalf.",
    ];

    for (i, line) in lines.iter().enumerate() {
        queue!(stdout, MoveTo(0, row + i as u16), Print(line))?;
    }

    draw_footer_line(stdout, session, "esc/enter back")
}

// =============================================================================
// Shared pieces
// =============================================================================

/// Draws the title bar; returns the row content starts on.
fn draw_header(stdout: &mut Stdout, session: &Session) -> Result<u16> {
    let width = layout::effective_width(session);
    let text = format!(" {} {} ", config::APP_NAME, config::version_string());
    let padding = " ".repeat(width.saturating_sub(text.chars().count()));

    queue!(
        stdout,
        MoveTo(0, 0),
        SetBackgroundColor(Color::DarkGreen),
        Print(text),
        Print(padding),
        SetBackgroundColor(Color::Reset)
    )?;

    Ok(2)
}

fn draw_status(stdout: &mut Stdout, row: u16, status: &StatusLine) -> Result<()> {
    let color = if status.is_error {
        Color::Red
    } else {
        Color::Green
    };

    queue!(
        stdout,
        MoveTo(0, row),
        SetForegroundColor(color),
        Print(&status.text),
        SetForegroundColor(Color::Reset)
    )?;
    Ok(())
}

/// Draws the detail box lines; returns the next free row.
fn draw_detail_box(
    stdout: &mut Stdout,
    start_row: u16,
    record: &CommandRecord,
    width: usize,
) -> Result<u16> {
    let lines = layout::detail_lines(record, width);

    for (i, line) in lines.iter().enumerate() {
        let y = start_row + i as u16;
        queue!(stdout, MoveTo(0, y), Print("  "))?;
        if i == 0 {
            queue!(
                stdout,
                SetAttribute(Attribute::Bold),
                Print(line),
                SetAttribute(Attribute::Reset)
            )?;
        } else if i == lines.len() - 1 {
            queue!(
                stdout,
                SetForegroundColor(Color::Cyan),
                Print(line),
                SetForegroundColor(Color::Reset)
            )?;
        } else {
            queue!(
                stdout,
                SetForegroundColor(Color::DarkGrey),
                Print(line),
                SetForegroundColor(Color::Reset)
            )?;
        }
    }

    Ok(start_row + lines.len() as u16 + 1)
}

fn draw_footer_line(stdout: &mut Stdout, session: &Session, text: &str) -> Result<()> {
    queue!(
        stdout,
        MoveTo(0, session.height.saturating_sub(1)),
        SetForegroundColor(Color::DarkGrey),
        Print(text),
        SetForegroundColor(Color::Reset)
    )?;
    Ok(())
}
