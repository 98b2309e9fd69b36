//! Buffer — the document as a doubly-linked sequence of lines.
//!
//! Lines live in an **arena**: a slot vector addressed by stable
//! [`LineId`] indices, with `prev`/`next` links stored as ids. The
//! arena is the single owner of every line; the rest of the editor
//! (cursor, clipboard) holds ids or detached copies, never references
//! into the list. Freed slots go on a free list and are reused.
//!
//! This gives the same O(1) splice/unlink behavior as a pointer-linked
//! list without raw cross-references — there is exactly one mutation
//! surface, and ids stay valid across unrelated edits.
//!
//! # Invariants
//!
//! - The list is acyclic and doubly consistent: `next(prev(a)) == a`
//!   for every adjacent pair.
//! - At least one line is always present. [`remove`](Buffer::remove)
//!   refuses to unlink the last line; callers degrade to truncation.
//!
//! # Lifecycle
//!
//! A buffer is built once at load time (one line per input record, or a
//! single empty line when there is no input), mutated through the
//! editing session, and written back eagerly by
//! [`write_to`](Buffer::write_to).

use std::fmt;
use std::io::{self, BufRead, Write};

use crate::line::Line;

// ---------------------------------------------------------------------------
// LineId
// ---------------------------------------------------------------------------

/// Stable handle to a line in a [`Buffer`]'s arena.
///
/// Ids remain valid until their line is removed; a removed line's id
/// may later be reused for a new line.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineId(usize);

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// One occupied arena slot: a line plus its structural links.
#[derive(Debug)]
struct Node {
    line: Line,
    prev: Option<LineId>,
    next: Option<LineId>,
}

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// The whole document: an ordered, doubly-linked sequence of [`Line`]s
/// owned by an id-addressed arena.
pub struct Buffer {
    /// Arena slots. `None` marks a freed slot awaiting reuse.
    slots: Vec<Option<Node>>,
    /// Freed slot indices, reused LIFO.
    free: Vec<usize>,
    head: LineId,
    tail: LineId,
    /// Number of lines currently linked.
    len: usize,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// Create a buffer holding a single empty line.
    #[must_use]
    pub fn new() -> Self {
        let slots = vec![Some(Node {
            line: Line::new(),
            prev: None,
            next: None,
        })];
        Self {
            slots,
            free: Vec::new(),
            head: LineId(0),
            tail: LineId(0),
            len: 1,
        }
    }

    /// Build a buffer from a line source, one line per input record,
    /// preserving order. An empty source yields a buffer with exactly
    /// one empty line.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the source fails.
    pub fn from_reader<R: BufRead>(mut reader: R) -> io::Result<Self> {
        let mut buf = Self::new();
        let mut first = true;
        let mut record = Vec::new();

        loop {
            record.clear();
            if reader.read_until(b'\n', &mut record)? == 0 {
                break;
            }
            let line = Line::from_bytes(&record);
            if first {
                // Replace the seed empty line with the first record.
                *buf.line_mut(buf.head) = line;
                first = false;
            } else {
                let tail = buf.tail;
                buf.insert_after(tail, line);
            }
        }

        Ok(buf)
    }

    /// Write every line's content, terminated by exactly one newline
    /// per line, in buffer order. The write is eager and total.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink refuses bytes; the in-memory buffer
    /// is never affected.
    pub fn write_to<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        let mut cursor = Some(self.head);
        while let Some(id) = cursor {
            sink.write_all(self.line(id).raw())?;
            cursor = self.next(id);
        }
        sink.flush()
    }

    // -- Access -------------------------------------------------------------

    /// Id of the first line.
    #[inline]
    #[must_use]
    pub const fn head(&self) -> LineId {
        self.head
    }

    /// Id of the last line.
    #[inline]
    #[must_use]
    pub const fn tail(&self) -> LineId {
        self.tail
    }

    /// Number of lines in the buffer. Always at least 1.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: a buffer holds at least one (possibly empty)
    /// line.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// The line behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not address a live line — ids are produced
    /// by this buffer and only invalidated by [`remove`](Self::remove),
    /// so a stale id is a caller bug, not a runtime condition.
    #[must_use]
    pub fn line(&self, id: LineId) -> &Line {
        &self.node(id).line
    }

    /// Mutable access to the line behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not address a live line.
    pub fn line_mut(&mut self, id: LineId) -> &mut Line {
        &mut self.node_mut(id).line
    }

    /// The line after `id`, if any.
    #[inline]
    #[must_use]
    pub fn next(&self, id: LineId) -> Option<LineId> {
        self.node(id).next
    }

    /// The line before `id`, if any.
    #[inline]
    #[must_use]
    pub fn prev(&self, id: LineId) -> Option<LineId> {
        self.node(id).prev
    }

    /// 1-based line number of `id`, by full traversal from the head.
    /// O(n), acceptable at the document sizes this editor targets.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not linked into the buffer.
    #[must_use]
    pub fn line_number(&self, id: LineId) -> usize {
        let mut no = 1;
        let mut cursor = Some(self.head);
        while let Some(cur) = cursor {
            if cur == id {
                return no;
            }
            no += 1;
            cursor = self.next(cur);
        }
        panic!("line id not linked into buffer");
    }

    /// Iterate lines in order, head to tail.
    pub fn iter(&self) -> impl Iterator<Item = (LineId, &Line)> {
        let mut cursor = Some(self.head);
        std::iter::from_fn(move || {
            let id = cursor?;
            cursor = self.next(id);
            Some((id, self.line(id)))
        })
    }

    // -- Structural mutation ------------------------------------------------

    /// Splice `line` in immediately after `at`. Returns the new line's
    /// id.
    pub fn insert_after(&mut self, at: LineId, line: Line) -> LineId {
        let after = self.node(at).next;
        let id = self.alloc(Node {
            line,
            prev: Some(at),
            next: after,
        });
        self.node_mut(at).next = Some(id);
        match after {
            Some(next) => self.node_mut(next).prev = Some(id),
            None => self.tail = id,
        }
        self.len += 1;
        id
    }

    /// Splice `line` in immediately before `at`. Returns the new line's
    /// id.
    pub fn insert_before(&mut self, at: LineId, line: Line) -> LineId {
        let before = self.node(at).prev;
        let id = self.alloc(Node {
            line,
            prev: before,
            next: Some(at),
        });
        self.node_mut(at).prev = Some(id);
        match before {
            Some(prev) => self.node_mut(prev).next = Some(id),
            None => self.head = id,
        }
        self.len += 1;
        id
    }

    /// Unlink and return the line at `id`, re-linking its neighbors.
    ///
    /// Returns `None` without touching anything when `id` is the only
    /// line left — the one-line minimum is enforced here, at the single
    /// mutation surface, so no caller can empty the buffer.
    pub fn remove(&mut self, id: LineId) -> Option<Line> {
        if self.len == 1 {
            return None;
        }

        let node = self.slots[id.0].take().expect("remove of dead line id");
        match node.prev {
            Some(prev) => self.node_mut(prev).next = node.next,
            None => self.head = node.next.expect("non-tail head removal"),
        }
        match node.next {
            Some(next) => self.node_mut(next).prev = node.prev,
            None => self.tail = node.prev.expect("non-head tail removal"),
        }

        self.free.push(id.0);
        self.len -= 1;
        Some(node.line)
    }

    /// Split the line at `id` at byte column `col`; the tail becomes a
    /// new line spliced in immediately after. Returns the new line's
    /// id.
    pub fn split(&mut self, id: LineId, col: usize) -> LineId {
        let tail = self.line_mut(id).split_off(col);
        self.insert_after(id, tail)
    }

    // -- Internals ----------------------------------------------------------

    fn node(&self, id: LineId) -> &Node {
        self.slots[id.0].as_ref().expect("dead line id")
    }

    fn node_mut(&mut self, id: LineId) -> &mut Node {
        self.slots[id.0].as_mut().expect("dead line id")
    }

    /// Place a node in a free slot, or grow the arena.
    fn alloc(&mut self, node: Node) -> LineId {
        if let Some(idx) = self.free.pop() {
            debug_assert!(self.slots[idx].is_none());
            self.slots[idx] = Some(node);
            LineId(idx)
        } else {
            self.slots.push(Some(node));
            LineId(self.slots.len() - 1)
        }
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("lines", &self.len)
            .field("head", &self.head)
            .field("tail", &self.tail)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(buf: &Buffer) -> Vec<String> {
        buf.iter().map(|(_, line)| line.text()).collect()
    }

    /// Forward ids via `next` and backward ids via `prev` must be
    /// reverse-equal — the doubly-linked consistency law.
    fn assert_links_consistent(buf: &Buffer) {
        let mut forward = Vec::new();
        let mut cursor = Some(buf.head());
        while let Some(id) = cursor {
            forward.push(id);
            cursor = buf.next(id);
        }

        let mut backward = Vec::new();
        let mut cursor = Some(buf.tail());
        while let Some(id) = cursor {
            backward.push(id);
            cursor = buf.prev(id);
        }
        backward.reverse();

        assert_eq!(forward, backward);
        assert_eq!(forward.len(), buf.len());
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn new_buffer_has_one_empty_line() {
        let buf = Buffer::new();
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.head(), buf.tail());
        assert!(buf.line(buf.head()).is_empty());
        assert!(!buf.is_empty());
    }

    #[test]
    fn from_reader_one_line_per_record() {
        let buf = Buffer::from_reader(&b"abc\ndef\nghi\n"[..]).unwrap();
        assert_eq!(texts(&buf), vec!["abc", "def", "ghi"]);
        assert_links_consistent(&buf);
    }

    #[test]
    fn from_reader_empty_source_yields_single_empty_line() {
        let buf = Buffer::from_reader(&b""[..]).unwrap();
        assert_eq!(buf.len(), 1);
        assert!(buf.line(buf.head()).is_empty());
    }

    #[test]
    fn from_reader_no_trailing_newline() {
        let buf = Buffer::from_reader(&b"abc\ndef"[..]).unwrap();
        assert_eq!(texts(&buf), vec!["abc", "def"]);
    }

    #[test]
    fn from_reader_blank_lines_survive() {
        let buf = Buffer::from_reader(&b"a\n\nb\n"[..]).unwrap();
        assert_eq!(texts(&buf), vec!["a", "", "b"]);
    }

    // -- write_to -----------------------------------------------------------

    #[test]
    fn write_to_emits_one_newline_per_line() {
        let buf = Buffer::from_reader(&b"abc\ndef"[..]).unwrap();
        let mut out = Vec::new();
        buf.write_to(&mut out).unwrap();
        assert_eq!(out, b"abc\ndef\n");
    }

    #[test]
    fn load_save_round_trip() {
        let input = b"first\nsecond\n\nfourth\n";
        let buf = Buffer::from_reader(&input[..]).unwrap();
        let mut out = Vec::new();
        buf.write_to(&mut out).unwrap();
        assert_eq!(out, input);
    }

    // -- insert_after / insert_before ---------------------------------------

    #[test]
    fn insert_after_middle() {
        let mut buf = Buffer::from_reader(&b"a\nc\n"[..]).unwrap();
        let head = buf.head();
        buf.insert_after(head, Line::from_text("b"));
        assert_eq!(texts(&buf), vec!["a", "b", "c"]);
        assert_links_consistent(&buf);
    }

    #[test]
    fn insert_after_tail_updates_tail() {
        let mut buf = Buffer::new();
        let tail = buf.tail();
        let id = buf.insert_after(tail, Line::from_text("end"));
        assert_eq!(buf.tail(), id);
        assert_links_consistent(&buf);
    }

    #[test]
    fn insert_before_head_updates_head() {
        let mut buf = Buffer::new();
        let head = buf.head();
        let id = buf.insert_before(head, Line::from_text("start"));
        assert_eq!(buf.head(), id);
        assert_eq!(texts(&buf), vec!["start", ""]);
        assert_links_consistent(&buf);
    }

    #[test]
    fn insert_before_middle() {
        let mut buf = Buffer::from_reader(&b"a\nc\n"[..]).unwrap();
        let second = buf.next(buf.head()).unwrap();
        buf.insert_before(second, Line::from_text("b"));
        assert_eq!(texts(&buf), vec!["a", "b", "c"]);
        assert_links_consistent(&buf);
    }

    // -- remove -------------------------------------------------------------

    #[test]
    fn remove_middle_relinks_neighbors() {
        let mut buf = Buffer::from_reader(&b"a\nb\nc\n"[..]).unwrap();
        let second = buf.next(buf.head()).unwrap();
        let removed = buf.remove(second).unwrap();
        assert_eq!(removed.text(), "b");
        assert_eq!(texts(&buf), vec!["a", "c"]);
        assert_links_consistent(&buf);
    }

    #[test]
    fn remove_head_moves_head() {
        let mut buf = Buffer::from_reader(&b"a\nb\n"[..]).unwrap();
        let head = buf.head();
        buf.remove(head).unwrap();
        assert_eq!(texts(&buf), vec!["b"]);
        assert_eq!(buf.head(), buf.tail());
        assert_links_consistent(&buf);
    }

    #[test]
    fn remove_tail_moves_tail() {
        let mut buf = Buffer::from_reader(&b"a\nb\n"[..]).unwrap();
        let tail = buf.tail();
        buf.remove(tail).unwrap();
        assert_eq!(texts(&buf), vec!["a"]);
        assert_links_consistent(&buf);
    }

    #[test]
    fn remove_last_line_is_refused() {
        let mut buf = Buffer::new();
        let only = buf.head();
        assert!(buf.remove(only).is_none());
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn removed_slot_is_reused() {
        let mut buf = Buffer::from_reader(&b"a\nb\n"[..]).unwrap();
        let second = buf.next(buf.head()).unwrap();
        buf.remove(second).unwrap();

        let head = buf.head();
        let new_id = buf.insert_after(head, Line::from_text("c"));
        // The freed slot comes back for the new line.
        assert_eq!(new_id, second);
        assert_eq!(texts(&buf), vec!["a", "c"]);
        assert_links_consistent(&buf);
    }

    #[test]
    fn mixed_insert_remove_sequence_stays_consistent() {
        let mut buf = Buffer::from_reader(&b"1\n2\n3\n4\n"[..]).unwrap();

        let second = buf.next(buf.head()).unwrap();
        buf.remove(second).unwrap();
        assert_links_consistent(&buf);

        let head = buf.head();
        buf.insert_before(head, Line::from_text("0"));
        assert_links_consistent(&buf);

        let tail = buf.tail();
        buf.remove(tail).unwrap();
        assert_links_consistent(&buf);

        let tail = buf.tail();
        buf.insert_after(tail, Line::from_text("5"));
        assert_links_consistent(&buf);

        assert_eq!(texts(&buf), vec!["0", "1", "3", "5"]);
    }

    // -- split --------------------------------------------------------------

    #[test]
    fn split_links_tail_after_head() {
        let mut buf = Buffer::from_reader(&b"hello\nworld\n"[..]).unwrap();
        let head = buf.head();
        let new = buf.split(head, 2);
        assert_eq!(texts(&buf), vec!["he", "llo", "world"]);
        assert_eq!(buf.next(head), Some(new));
        assert_links_consistent(&buf);
    }

    #[test]
    fn split_at_end_inserts_empty_line() {
        let mut buf = Buffer::new();
        let head = buf.head();
        buf.line_mut(head).push_char(b'x');
        buf.split(head, 1);
        assert_eq!(texts(&buf), vec!["x", ""]);
    }

    // -- line_number --------------------------------------------------------

    #[test]
    fn line_number_is_one_based() {
        let buf = Buffer::from_reader(&b"a\nb\nc\n"[..]).unwrap();
        assert_eq!(buf.line_number(buf.head()), 1);
        assert_eq!(buf.line_number(buf.tail()), 3);
        let second = buf.next(buf.head()).unwrap();
        assert_eq!(buf.line_number(second), 2);
    }
}
