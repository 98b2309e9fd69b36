//! Cursor — logical position plus the visible window.
//!
//! The cursor tracks the current line (by [`LineId`]), the byte column,
//! the 1-based line number, and the viewport: the line drawn at screen
//! row 0 (`top`) and the cursor's row within the text area. Motions
//! keep all of these in step, scrolling `top` when a vertical move
//! would leave the text area.
//!
//! # Sticky column
//!
//! Vertical motions re-clamp the column to `min(sticky, last_col)`,
//! where the sticky column is set by the last horizontal move. Moving
//! down through a short line and back up restores the original column.
//! `$` sets the sticky column to [`Sticky::EndOfLine`], so subsequent
//! vertical moves hug each line's end — a tagged value, not a sentinel
//! integer.
//!
//! # Column range
//!
//! In normal mode the cursor sits ON a character: columns are clamped
//! to `[0, last_col]`, which collapses to 0 on a line with no real
//! characters. Insert mode may also sit one past the last character;
//! [`clamp_insert`](Cursor::clamp_insert) and
//! [`clamp_normal`](Cursor::clamp_normal) apply the two limits.

use crate::buffer::{Buffer, LineId};

// ---------------------------------------------------------------------------
// Sticky
// ---------------------------------------------------------------------------

/// The preferred column carried across vertical motions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sticky {
    /// Prefer this column, clamped per line.
    Col(usize),
    /// Always hug the end of the line (`$`).
    EndOfLine,
}

impl Sticky {
    /// Resolve the preferred column against a line's last usable
    /// column.
    #[must_use]
    pub fn resolve(self, last_col: usize) -> usize {
        match self {
            Self::Col(n) => n.min(last_col),
            Self::EndOfLine => last_col,
        }
    }
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// Logical cursor position and viewport anchor.
#[derive(Debug, Clone)]
pub struct Cursor {
    /// The line the cursor is on.
    line: LineId,
    /// Byte column within the line.
    col: usize,
    /// Preferred column for vertical motion.
    sticky: Sticky,
    /// 1-based line number of `line`.
    line_no: usize,
    /// The line drawn at screen row 0.
    top: LineId,
    /// Cursor's screen row within the text area, `0..height`.
    row: usize,
}

impl Cursor {
    /// Create a cursor at the top of a buffer.
    #[must_use]
    pub fn new(buf: &Buffer) -> Self {
        Self {
            line: buf.head(),
            col: 0,
            sticky: Sticky::Col(0),
            line_no: 1,
            top: buf.head(),
            row: 0,
        }
    }

    // -- Accessors ----------------------------------------------------------

    /// The current line's id.
    #[inline]
    #[must_use]
    pub const fn line(&self) -> LineId {
        self.line
    }

    /// Current byte column.
    #[inline]
    #[must_use]
    pub const fn col(&self) -> usize {
        self.col
    }

    /// 1-based line number.
    #[inline]
    #[must_use]
    pub const fn line_no(&self) -> usize {
        self.line_no
    }

    /// The line drawn at screen row 0.
    #[inline]
    #[must_use]
    pub const fn top(&self) -> LineId {
        self.top
    }

    /// Screen row of the cursor within the text area.
    #[inline]
    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// The sticky (preferred) column.
    #[inline]
    #[must_use]
    pub const fn sticky(&self) -> Sticky {
        self.sticky
    }

    // -- Vertical motion ----------------------------------------------------

    /// Move down one line (`j`, Enter). No-op at the last line. Scrolls
    /// the viewport when the cursor is on the bottom row of a text area
    /// `height` rows tall.
    pub fn move_down(&mut self, buf: &Buffer, height: usize) {
        let Some(next) = buf.next(self.line) else {
            return;
        };
        self.line = next;
        self.line_no += 1;
        self.col = self.sticky.resolve(buf.line(next).last_col());

        if self.row + 1 < height.max(1) {
            self.row += 1;
        } else if let Some(new_top) = buf.next(self.top) {
            self.top = new_top;
        }
    }

    /// Move up one line (`k`). No-op at the first line. Scrolls the
    /// viewport when the cursor is on the top row.
    pub fn move_up(&mut self, buf: &Buffer) {
        let Some(prev) = buf.prev(self.line) else {
            return;
        };
        self.line = prev;
        self.line_no -= 1;
        self.col = self.sticky.resolve(buf.line(prev).last_col());

        if self.row > 0 {
            self.row -= 1;
        } else if let Some(new_top) = buf.prev(self.top) {
            self.top = new_top;
        }
    }

    // -- Horizontal motion --------------------------------------------------

    /// Move left one column (`h`). Clamped at column 0. Sets the sticky
    /// column.
    pub fn move_left(&mut self) {
        self.col = self.col.saturating_sub(1);
        self.sticky = Sticky::Col(self.col);
    }

    /// Move right one column (`l`, Space). Clamped at the last usable
    /// column. Sets the sticky column.
    pub fn move_right(&mut self, buf: &Buffer) {
        let line = buf.line(self.line);
        if !line.is_empty() && self.col < line.last_col() {
            self.col += 1;
        }
        self.sticky = Sticky::Col(self.col);
    }

    /// Jump to column 0 (`0`). Sets the sticky column.
    pub fn line_start(&mut self) {
        self.col = 0;
        self.sticky = Sticky::Col(0);
    }

    /// Jump to the last usable column (`$` / `E`). The sticky column
    /// becomes end-of-line, so vertical moves keep hugging line ends.
    pub fn line_end(&mut self, buf: &Buffer) {
        self.col = buf.line(self.line).last_col();
        self.sticky = Sticky::EndOfLine;
    }

    // -- Jumps --------------------------------------------------------------

    /// Jump to the first line (`gg`), resetting the viewport to the
    /// buffer head.
    pub fn goto_head(&mut self, buf: &Buffer) {
        self.line = buf.head();
        self.line_no = 1;
        self.top = buf.head();
        self.row = 0;
        self.col = self.sticky.resolve(buf.line(self.line).last_col());
    }

    /// Jump to the last line (`G`). The line number is recomputed by
    /// full traversal; the viewport is re-anchored so the cursor lands
    /// on the lowest usable row.
    pub fn goto_tail(&mut self, buf: &Buffer, height: usize) {
        self.line = buf.tail();
        self.line_no = buf.line_number(self.line);
        self.col = self.sticky.resolve(buf.line(self.line).last_col());

        // Walk the viewport top back so the tail sits on the bottom row
        // (or row line_no-1 for documents shorter than the window).
        self.row = (self.line_no - 1).min(height.max(1) - 1);
        let mut top = self.line;
        for _ in 0..self.row {
            match buf.prev(top) {
                Some(prev) => top = prev,
                None => break,
            }
        }
        self.top = top;
    }

    /// Place the cursor at `(id, col)` and reset the viewport so that
    /// line is at the top of the screen. Used by search hits.
    pub fn snap_to_top(&mut self, buf: &Buffer, id: LineId, col: usize) {
        self.line = id;
        self.line_no = buf.line_number(id);
        self.col = col.min(buf.line(id).last_col());
        self.sticky = Sticky::Col(self.col);
        self.top = id;
        self.row = 0;
    }

    /// Restore a previously captured position. The viewport snaps so
    /// the restored line is visible (at its old row when possible).
    pub fn restore(&mut self, buf: &Buffer, saved: &Self) {
        *self = saved.clone();
        self.col = self.col.min(buf.line(self.line).last_col());
    }

    // -- Column adjustment --------------------------------------------------

    /// Set the column directly, clamped for insert mode (may sit one
    /// past the last character). Sets the sticky column.
    pub fn set_col_insert(&mut self, buf: &Buffer, col: usize) {
        self.col = col.min(buf.line(self.line).usable_len());
        self.sticky = Sticky::Col(self.col);
    }

    /// Clamp the column to the insert-mode range `[0, usable_len]`.
    pub fn clamp_insert(&mut self, buf: &Buffer) {
        self.col = self.col.min(buf.line(self.line).usable_len());
    }

    /// Clamp the column to the normal-mode range `[0, last_col]` —
    /// stepping back off the one-past-end position when leaving insert
    /// mode.
    pub fn clamp_normal(&mut self, buf: &Buffer) {
        self.col = self.col.min(buf.line(self.line).last_col());
        self.sticky = Sticky::Col(self.col);
    }

    /// Move the column without clamping logic (caller guarantees
    /// range). Sets the sticky column.
    pub fn set_col_raw(&mut self, col: usize) {
        self.col = col;
        self.sticky = Sticky::Col(col);
    }

    // -- Structural fix-ups -------------------------------------------------

    /// Step onto a line just inserted *above* the current one (`O`).
    ///
    /// The new line takes over the current line number and screen row;
    /// everything below shifted down by one.
    pub fn enter_line_above(&mut self, buf: &Buffer) {
        let Some(prev) = buf.prev(self.line) else {
            return;
        };
        if self.top == self.line {
            self.top = prev;
        }
        self.line = prev;
        self.col = self.sticky.resolve(buf.line(prev).last_col());
    }

    /// Re-anchor after the cursor's line was removed from the buffer.
    ///
    /// `successor` is the line the cursor lands on; `moved_back` is
    /// true when the successor is the *previous* line (the removed line
    /// was the tail). Id comparisons against the dead id are fine; it
    /// is never dereferenced.
    pub fn after_remove(&mut self, buf: &Buffer, successor: LineId, moved_back: bool) {
        if self.top == self.line {
            self.top = successor;
            self.row = 0;
        } else if moved_back && self.row > 0 {
            self.row -= 1;
        }
        self.line = successor;
        if moved_back {
            self.line_no -= 1;
        }
        self.col = self.sticky.resolve(buf.line(successor).last_col());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEIGHT: usize = 5;

    fn buffer(text: &[u8]) -> Buffer {
        Buffer::from_reader(text).unwrap()
    }

    fn col_in_range(cursor: &Cursor, buf: &Buffer) -> bool {
        cursor.col() <= buf.line(cursor.line()).last_col()
    }

    // -- Vertical motion ----------------------------------------------------

    #[test]
    fn move_down_advances_line_no() {
        let buf = buffer(b"a\nb\nc\n");
        let mut cur = Cursor::new(&buf);
        cur.move_down(&buf, HEIGHT);
        assert_eq!(cur.line_no(), 2);
        assert_eq!(cur.row(), 1);
    }

    #[test]
    fn move_down_at_tail_is_noop() {
        let buf = buffer(b"a\n");
        let mut cur = Cursor::new(&buf);
        cur.move_down(&buf, HEIGHT);
        assert_eq!(cur.line_no(), 1);
        assert_eq!(cur.row(), 0);
    }

    #[test]
    fn move_up_at_head_is_noop() {
        let buf = buffer(b"a\nb\n");
        let mut cur = Cursor::new(&buf);
        cur.move_up(&buf);
        assert_eq!(cur.line_no(), 1);
    }

    #[test]
    fn move_down_scrolls_at_bottom_edge() {
        let buf = buffer(b"1\n2\n3\n4\n5\n6\n7\n");
        let mut cur = Cursor::new(&buf);
        // Fill the 5-row window: rows 0..4 hold lines 1..5.
        for _ in 0..4 {
            cur.move_down(&buf, HEIGHT);
        }
        assert_eq!(cur.row(), 4);
        assert_eq!(cur.top(), buf.head());

        // One more: the row pins, the top advances.
        cur.move_down(&buf, HEIGHT);
        assert_eq!(cur.row(), 4);
        assert_eq!(cur.line_no(), 6);
        assert_eq!(cur.top(), buf.next(buf.head()).unwrap());
    }

    #[test]
    fn move_up_scrolls_at_top_edge() {
        let buf = buffer(b"1\n2\n3\n4\n5\n6\n7\n");
        let mut cur = Cursor::new(&buf);
        for _ in 0..6 {
            cur.move_down(&buf, HEIGHT);
        }
        // Cursor on line 7, top on line 3. Climb back to the top row.
        for _ in 0..4 {
            cur.move_up(&buf);
        }
        assert_eq!(cur.row(), 0);
        let top_before = cur.top();

        cur.move_up(&buf);
        assert_eq!(cur.row(), 0);
        assert_eq!(cur.top(), buf.prev(top_before).unwrap());
    }

    // -- Sticky column ------------------------------------------------------

    #[test]
    fn sticky_column_restored_after_short_line() {
        let buf = buffer(b"abcdef\nxy\nabcdef\n");
        let mut cur = Cursor::new(&buf);
        for _ in 0..4 {
            cur.move_right(&buf);
        }
        assert_eq!(cur.col(), 4);

        // Down to "xy": clamped to its last column.
        cur.move_down(&buf, HEIGHT);
        assert_eq!(cur.col(), 1);
        assert!(col_in_range(&cur, &buf));

        // Back up: the original column returns.
        cur.move_up(&buf);
        assert_eq!(cur.col(), 4);
    }

    #[test]
    fn sticky_end_of_line_hugs_line_ends() {
        let buf = buffer(b"abc\nabcdef\nx\n");
        let mut cur = Cursor::new(&buf);
        cur.line_end(&buf);
        assert_eq!(cur.col(), 2);

        cur.move_down(&buf, HEIGHT);
        assert_eq!(cur.col(), 5);

        cur.move_down(&buf, HEIGHT);
        assert_eq!(cur.col(), 0);
    }

    #[test]
    fn horizontal_move_resets_sticky() {
        let buf = buffer(b"abcdef\nabcdef\n");
        let mut cur = Cursor::new(&buf);
        cur.line_end(&buf);
        assert_eq!(cur.sticky(), Sticky::EndOfLine);
        cur.move_left();
        assert_eq!(cur.sticky(), Sticky::Col(4));
    }

    // -- Horizontal clamping ------------------------------------------------

    #[test]
    fn move_right_stops_at_last_col() {
        let buf = buffer(b"ab\n");
        let mut cur = Cursor::new(&buf);
        cur.move_right(&buf);
        cur.move_right(&buf);
        cur.move_right(&buf);
        assert_eq!(cur.col(), 1);
    }

    #[test]
    fn move_right_on_empty_line_is_noop() {
        let buf = buffer(b"\n");
        let mut cur = Cursor::new(&buf);
        cur.move_right(&buf);
        assert_eq!(cur.col(), 0);
    }

    #[test]
    fn move_left_stops_at_zero() {
        let buf = buffer(b"ab\n");
        let mut cur = Cursor::new(&buf);
        cur.move_left();
        assert_eq!(cur.col(), 0);
    }

    #[test]
    fn column_stays_in_range_under_motion_script() {
        let buf = buffer(b"abcdef\n\nxy\nlongerline\n");
        let mut cur = Cursor::new(&buf);
        let script = "lllljjkkjjhhlkjl$jk0jG";
        for ch in script.chars() {
            match ch {
                'h' => cur.move_left(),
                'l' => cur.move_right(&buf),
                'j' => cur.move_down(&buf, HEIGHT),
                'k' => cur.move_up(&buf),
                '0' => cur.line_start(),
                '$' => cur.line_end(&buf),
                'G' => cur.goto_tail(&buf, HEIGHT),
                _ => unreachable!(),
            }
            assert!(col_in_range(&cur, &buf), "out of range after {ch:?}");
        }
    }

    // -- Jumps --------------------------------------------------------------

    #[test]
    fn goto_tail_recomputes_line_no() {
        let buf = buffer(b"abc\ndef\nghi\n");
        let mut cur = Cursor::new(&buf);
        cur.goto_tail(&buf, HEIGHT);
        assert_eq!(cur.line_no(), 3);
        assert_eq!(buf.line(cur.line()).text(), "ghi");
    }

    #[test]
    fn goto_tail_anchors_bottom_of_window() {
        let buf = buffer(b"1\n2\n3\n4\n5\n6\n7\n8\n");
        let mut cur = Cursor::new(&buf);
        cur.goto_tail(&buf, HEIGHT);
        assert_eq!(cur.row(), HEIGHT - 1);
        // Top is 4 lines above the tail: line 4.
        assert_eq!(buf.line(cur.top()).text(), "4");
    }

    #[test]
    fn goto_tail_short_document() {
        let buf = buffer(b"a\nb\n");
        let mut cur = Cursor::new(&buf);
        cur.goto_tail(&buf, HEIGHT);
        assert_eq!(cur.row(), 1);
        assert_eq!(cur.top(), buf.head());
    }

    #[test]
    fn goto_head_resets_viewport() {
        let buf = buffer(b"1\n2\n3\n4\n5\n6\n7\n");
        let mut cur = Cursor::new(&buf);
        cur.goto_tail(&buf, HEIGHT);
        cur.goto_head(&buf);
        assert_eq!(cur.line_no(), 1);
        assert_eq!(cur.row(), 0);
        assert_eq!(cur.top(), buf.head());
    }

    #[test]
    fn snap_to_top_puts_line_at_row_zero() {
        let buf = buffer(b"a\nbar\nc\n");
        let mut cur = Cursor::new(&buf);
        let second = buf.next(buf.head()).unwrap();
        cur.snap_to_top(&buf, second, 1);
        assert_eq!(cur.row(), 0);
        assert_eq!(cur.top(), second);
        assert_eq!(cur.col(), 1);
        assert_eq!(cur.line_no(), 2);
    }

    // -- after_remove -------------------------------------------------------

    #[test]
    fn after_remove_forward() {
        let mut buf = buffer(b"a\nb\nc\n");
        let mut cur = Cursor::new(&buf);
        cur.move_down(&buf, HEIGHT);

        let doomed = cur.line();
        let successor = buf.next(doomed).unwrap();
        buf.remove(doomed).unwrap();
        cur.after_remove(&buf, successor, false);

        assert_eq!(cur.line_no(), 2);
        assert_eq!(buf.line(cur.line()).text(), "c");
    }

    #[test]
    fn after_remove_at_tail_moves_back() {
        let mut buf = buffer(b"a\nb\n");
        let mut cur = Cursor::new(&buf);
        cur.move_down(&buf, HEIGHT);

        let doomed = cur.line();
        let successor = buf.prev(doomed).unwrap();
        buf.remove(doomed).unwrap();
        cur.after_remove(&buf, successor, true);

        assert_eq!(cur.line_no(), 1);
        assert_eq!(cur.row(), 0);
        assert_eq!(buf.line(cur.line()).text(), "a");
    }

    #[test]
    fn after_remove_fixes_top_when_top_removed() {
        let mut buf = buffer(b"a\nb\nc\n");
        let mut cur = Cursor::new(&buf);
        // Cursor and top both on the head line.
        let doomed = cur.line();
        let successor = buf.next(doomed).unwrap();
        buf.remove(doomed).unwrap();
        cur.after_remove(&buf, successor, false);

        assert_eq!(cur.top(), successor);
        assert_eq!(cur.row(), 0);
        assert_eq!(cur.line_no(), 1);
    }

    // -- Insert-mode clamps -------------------------------------------------

    #[test]
    fn set_col_insert_allows_one_past_end() {
        let buf = buffer(b"ab\n");
        let mut cur = Cursor::new(&buf);
        cur.set_col_insert(&buf, 2);
        assert_eq!(cur.col(), 2);
        cur.set_col_insert(&buf, 99);
        assert_eq!(cur.col(), 2);
    }

    #[test]
    fn clamp_normal_steps_back_from_past_end() {
        let buf = buffer(b"ab\n");
        let mut cur = Cursor::new(&buf);
        cur.set_col_insert(&buf, 2);
        cur.clamp_normal(&buf);
        assert_eq!(cur.col(), 1);
    }

    #[test]
    fn clamp_normal_on_empty_line_is_zero() {
        let buf = buffer(b"\n");
        let mut cur = Cursor::new(&buf);
        cur.clamp_normal(&buf);
        assert_eq!(cur.col(), 0);
    }
}
