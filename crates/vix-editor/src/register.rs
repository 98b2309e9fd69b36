//! Clipboard and undo registers.
//!
//! Two independently owned scratch lines sit outside the buffer:
//!
//! - the **clipboard**: one detached deep copy of a line, written by
//!   `yy` and read by `p`;
//! - the **undo snapshot**: the content a line had when insert mode was
//!   last entered, swapped back in by `u`.
//!
//! Undo is one level deep by design. `u` *swaps* the current line with
//! the snapshot rather than overwriting it, so pressing `u` again
//! toggles the edit back — the snapshot always holds whatever the line
//! doesn't. Each new yank or snapshot replaces the previous scratch
//! copy wholesale.

use crate::line::Line;

/// The session's clipboard and undo slots.
#[derive(Debug, Default)]
pub struct Registers {
    /// Detached copy of the last yanked line.
    clipboard: Option<Line>,
    /// Pre-edit content of the last line entered for editing.
    before: Option<Line>,
}

impl Registers {
    /// Create empty registers.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clipboard: None,
            before: None,
        }
    }

    // -- Clipboard ----------------------------------------------------------

    /// Copy `line` into the clipboard, replacing any prior content.
    pub fn yank(&mut self, line: &Line) {
        self.clipboard = Some(line.clone());
    }

    /// A fresh detached copy of the clipboard, if one is held.
    #[must_use]
    pub fn paste(&self) -> Option<Line> {
        self.clipboard.clone()
    }

    /// Whether a yanked line is available.
    #[must_use]
    pub const fn has_clipboard(&self) -> bool {
        self.clipboard.is_some()
    }

    // -- Undo snapshot ------------------------------------------------------

    /// Record `line`'s current content as the undo snapshot, replacing
    /// any prior snapshot.
    pub fn snapshot(&mut self, line: &Line) {
        self.before = Some(line.clone());
    }

    /// Swap `line`'s content with the snapshot. Returns `false` (and
    /// leaves `line` untouched) when no snapshot is held.
    ///
    /// After a successful swap the snapshot holds the line's previous
    /// content, so a second call undoes the undo.
    pub fn swap_with(&mut self, line: &mut Line) -> bool {
        match self.before.as_mut() {
            Some(saved) => {
                saved.swap_contents(line);
                true
            }
            None => false,
        }
    }

    /// Whether an undo snapshot is available.
    #[must_use]
    pub const fn has_snapshot(&self) -> bool {
        self.before.is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
