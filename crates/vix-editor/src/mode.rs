//! Editing modes as a tagged state.
//!
//! Each mode variant carries exactly the data that mode needs: ex mode
//! carries the command line being typed plus the cursor position to
//! revert to on commit; search mode likewise carries its in-progress
//! pattern and the position to restore when the search fails. Normal
//! and insert mode carry nothing — their state lives in the cursor and
//! registers.

use crate::cursor::Cursor;

/// In-progress `:` command line.
#[derive(Debug, Clone)]
pub struct ExState {
    /// Characters typed after `:`.
    pub input: String,
    /// Cursor position when `:` was pressed; restored on commit.
    pub saved: Cursor,
}

/// In-progress `/` pattern.
#[derive(Debug, Clone)]
pub struct SearchState {
    /// Characters typed after `/`.
    pub input: String,
    /// Cursor position when `/` was pressed; restored when the search
    /// finds nothing.
    pub saved: Cursor,
}

/// The current editing mode.
#[derive(Debug, Clone)]
pub enum Mode {
    /// Command dispatch; the initial mode.
    Normal,
    /// Text entry at the cursor.
    Insert,
    /// Typing a `:` command on the status line.
    Ex(ExState),
    /// Typing a `/` search pattern on the status line.
    Search(SearchState),
}

impl Mode {
    /// Whether this is normal mode.
    #[must_use]
    pub const fn is_normal(&self) -> bool {
        matches!(self, Self::Normal)
    }

    /// Whether this is insert mode.
    #[must_use]
    pub const fn is_insert(&self) -> bool {
        matches!(self, Self::Insert)
    }
}
