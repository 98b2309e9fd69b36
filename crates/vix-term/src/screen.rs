// SPDX-License-Identifier: MIT
//
// Screen — full-frame drawing of the editor's render model.
//
// The editor hands over the visible line texts, a status line, and the
// cursor's screen position; this module turns that into one buffered
// ANSI write. Every frame is a full redraw: the document sizes this
// editor targets make per-cell diffing unnecessary, and a single
// buffered flush per keystroke keeps the output tear-free.
//
// Layout per frame, for a terminal of `rows` rows:
//
//   row 0 .. rows-2   text area (missing rows filled with `~`)
//   row rows-1        status line, reverse video, padded to full width

use std::io::{self, Write};

use crate::ansi;
use crate::terminal::Size;

/// Frame writer over stdout.
///
/// Stages the whole frame in an internal byte buffer and writes it with
/// a single syscall-sized flush. Reused across frames to avoid
/// reallocating.
#[derive(Debug, Default)]
pub struct Screen {
    buf: Vec<u8>,
}

impl Screen {
    /// Create a screen writer with an empty staging buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(4096),
        }
    }

    /// Draw one frame: text rows, status line, cursor placement.
    ///
    /// `lines` holds the visible line texts (already tab-expanded by the
    /// view layer); rows past the end of `lines` are drawn as `~`.
    /// `cursor` is `(row, col)` in screen coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn draw(
        &mut self,
        size: Size,
        lines: &[String],
        status: &str,
        cursor: (u16, u16),
    ) -> io::Result<()> {
        self.buf.clear();
        self.buf.extend_from_slice(ansi::HIDE_CURSOR.as_bytes());
        self.buf.extend_from_slice(ansi::CURSOR_HOME.as_bytes());

        let text_rows = size.rows.saturating_sub(1);
        for row in 0..text_rows {
            match lines.get(row as usize) {
                Some(line) => self.push_clipped(line, size.cols),
                None => self.buf.push(b'~'),
            }
            self.buf.extend_from_slice(ansi::CLEAR_TO_EOL.as_bytes());
            self.buf.extend_from_slice(b"\r\n");
        }

        // Status line: reverse video, padded to the full width so the
        // bar spans the screen.
        self.buf.extend_from_slice(ansi::REVERSE.as_bytes());
        self.push_clipped(status, size.cols);
        let used = status.chars().count().min(size.cols as usize);
        for _ in used..size.cols as usize {
            self.buf.push(b' ');
        }
        self.buf.extend_from_slice(ansi::RESET.as_bytes());

        let (row, col) = cursor;
        self.buf
            .extend_from_slice(ansi::cursor_to(row, col).as_bytes());
        self.buf.extend_from_slice(ansi::SHOW_CURSOR.as_bytes());

        let mut out = io::stdout().lock();
        out.write_all(&self.buf)?;
        out.flush()
    }

    /// Append `text` clipped to `cols` characters.
    fn push_clipped(&mut self, text: &str, cols: u16) {
        for ch in text.chars().take(cols as usize) {
            let mut utf8 = [0u8; 4];
            self.buf
                .extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn push_clipped_truncates() {
        let mut screen = Screen::new();
        screen.push_clipped("hello", 3);
        assert_eq!(screen.buf, b"hel");
    }

    #[test]
    fn push_clipped_short_text_unchanged() {
        let mut screen = Screen::new();
        screen.push_clipped("hi", 80);
        assert_eq!(screen.buf, b"hi");
    }
}
