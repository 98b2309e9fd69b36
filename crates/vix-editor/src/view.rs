//! Render model — from buffer state to drawable frame.
//!
//! The view layer is read-only: it walks the visible window, expands
//! tabs for display, composes the status line, and places the terminal
//! cursor. The host hands the resulting [`Frame`] to the screen writer
//! unchanged.
//!
//! Columns are byte columns in the buffer but *display* columns on
//! screen: a tab advances to the next multiple of [`TAB_WIDTH`], so the
//! cursor's screen column is the expanded width of the line's prefix.

use crate::buffer::{Buffer, LineId};
use crate::cursor::Cursor;
use crate::mode::Mode;
use vix_term::terminal::Size;

/// Display width of a tab stop.
pub const TAB_WIDTH: usize = 4;

/// One drawable frame: visible text, status line, cursor placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Tab-expanded text of the visible lines, top to bottom.
    pub lines: Vec<String>,
    /// Status line content (not yet padded to the screen width).
    pub status: String,
    /// Screen row for the terminal cursor.
    pub cursor_row: u16,
    /// Screen column for the terminal cursor.
    pub cursor_col: u16,
}

/// Produce the frame for the current editor state.
///
/// `message`, when present, takes over the left half of the status line
/// (error flashes, "not found"). In ex and search modes the terminal
/// cursor sits on the status line at the end of the echoed input.
#[must_use]
pub fn render(
    buf: &Buffer,
    cursor: &Cursor,
    mode: &Mode,
    message: Option<&str>,
    size: Size,
) -> Frame {
    let text_rows = usize::from(size.rows.saturating_sub(1));
    let lines = visible_lines(buf, cursor.top(), text_rows);
    let status = status_line(cursor, mode, message, usize::from(size.cols));

    let (cursor_row, cursor_col) = match mode {
        Mode::Ex(state) => (size.rows.saturating_sub(1), echo_col(&state.input)),
        Mode::Search(state) => (size.rows.saturating_sub(1), echo_col(&state.input)),
        Mode::Normal | Mode::Insert => {
            let row = clamp_u16(cursor.row());
            let col = clamp_u16(display_col(buf.line(cursor.line()).content(), cursor.col()));
            (row, col)
        }
    };

    Frame {
        lines,
        status,
        cursor_row,
        cursor_col,
    }
}

/// Collect up to `count` consecutive lines' display text starting at
/// `top`.
fn visible_lines(buf: &Buffer, top: LineId, count: usize) -> Vec<String> {
    let mut out = Vec::with_capacity(count);
    let mut id = Some(top);
    while let Some(current) = id {
        if out.len() == count {
            break;
        }
        out.push(expand_tabs(buf.line(current).content()));
        id = buf.next(current);
    }
    out
}

/// Compose the status line: mode indicator or flash message on the
/// left, `(column+1)-line_no` on the right.
fn status_line(cursor: &Cursor, mode: &Mode, message: Option<&str>, cols: usize) -> String {
    let left = match (message, mode) {
        (Some(msg), _) => msg.to_string(),
        (None, Mode::Insert) => "-- INSERT --".to_string(),
        (None, Mode::Ex(state)) => format!(":{}", state.input),
        (None, Mode::Search(state)) => format!("/{}", state.input),
        (None, Mode::Normal) => String::new(),
    };
    let right = format!("{}-{}", cursor.col() + 1, cursor.line_no());

    let used = left.chars().count() + right.chars().count();
    if used + 1 <= cols {
        let pad = cols - used;
        format!("{left}{}{right}", " ".repeat(pad))
    } else {
        left
    }
}

/// Expand tabs to the next multiple of [`TAB_WIDTH`]; other bytes map
/// one-to-one.
fn expand_tabs(content: &[u8]) -> String {
    let mut out = String::with_capacity(content.len());
    let mut width = 0;
    for &b in content {
        if b == b'\t' {
            let pad = TAB_WIDTH - (width % TAB_WIDTH);
            for _ in 0..pad {
                out.push(' ');
            }
            width += pad;
        } else {
            out.push(char::from(b));
            width += 1;
        }
    }
    out
}

/// Display column of byte column `col` within `content`.
fn display_col(content: &[u8], col: usize) -> usize {
    let mut width = 0;
    for &b in content.iter().take(col) {
        if b == b'\t' {
            width += TAB_WIDTH - (width % TAB_WIDTH);
        } else {
            width += 1;
        }
    }
    width
}

/// Cursor column on the status line: one past the `:` or `/` prefix
/// plus the echoed input.
fn echo_col(input: &str) -> u16 {
    clamp_u16(1 + input.chars().count())
}

fn clamp_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
