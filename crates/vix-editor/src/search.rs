//! Forward substring search.
//!
//! Search is deliberately plain: an exact byte-substring scan, forward
//! only, starting at the line *after* the cursor, with no wraparound.
//! `/` records the pattern (so `n` can repeat it) and the scan walks
//! `next` links until a line's content contains the pattern or the tail
//! is passed.

use crate::buffer::{Buffer, LineId};

/// The session's remembered search pattern.
#[derive(Debug, Default)]
pub struct Search {
    pattern: Vec<u8>,
}

impl Search {
    /// Create with no remembered pattern.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pattern: Vec::new(),
        }
    }

    /// Replace the remembered pattern.
    pub fn set_pattern(&mut self, pattern: &[u8]) {
        self.pattern.clear();
        self.pattern.extend_from_slice(pattern);
    }

    /// The remembered pattern bytes.
    #[must_use]
    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    /// Whether a pattern has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// Scan forward from the line after `from` for the remembered
    /// pattern. Returns the matching line and the byte offset of the
    /// match, or `None` when no later line contains it.
    #[must_use]
    pub fn find_after(&self, buf: &Buffer, from: LineId) -> Option<(LineId, usize)> {
        if self.pattern.is_empty() {
            return None;
        }
        let mut id = buf.next(from)?;
        loop {
            if let Some(offset) = buf.line(id).find(&self.pattern, 0) {
                return Some((id, offset));
            }
            id = buf.next(id)?;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn buffer(text: &[u8]) -> Buffer {
        Buffer::from_reader(text).unwrap()
    }

    #[test]
    fn finds_first_match_after_cursor_line() {
        let buf = buffer(b"one\ntwo bar\nthree\nfour bar\n");
        let mut search = Search::new();
        search.set_pattern(b"bar");

        let (id, offset) = search.find_after(&buf, buf.head()).unwrap();
        assert_eq!(buf.line(id).text(), "two bar");
        assert_eq!(offset, 4);
    }

    #[test]
    fn skips_match_on_current_line() {
        let buf = buffer(b"bar here\nno\nbar again\n");
        let mut search = Search::new();
        search.set_pattern(b"bar");

        // The scan starts after the cursor line, so the first hit is
        // line 3, not line 1.
        let (id, _) = search.find_after(&buf, buf.head()).unwrap();
        assert_eq!(buf.line(id).text(), "bar again");
    }

    #[test]
    fn no_wraparound() {
        let buf = buffer(b"bar\nplain\n");
        let mut search = Search::new();
        search.set_pattern(b"bar");

        let second = buf.next(buf.head()).unwrap();
        assert_eq!(search.find_after(&buf, second), None);
    }

    #[test]
    fn missing_pattern_is_none() {
        let buf = buffer(b"a\nb\n");
        let mut search = Search::new();
        search.set_pattern(b"zzz");
        assert_eq!(search.find_after(&buf, buf.head()), None);
    }

    #[test]
    fn empty_pattern_never_matches() {
        let buf = buffer(b"a\nb\n");
        let search = Search::new();
        assert_eq!(search.find_after(&buf, buf.head()), None);
    }

    #[test]
    fn set_pattern_replaces() {
        let mut search = Search::new();
        search.set_pattern(b"old");
        search.set_pattern(b"new");
        assert_eq!(search.pattern(), b"new");
    }
}
