//! Line — one editable row of text.
//!
//! A `Line` owns a growable byte sequence whose last byte is always the
//! `\n` sentinel. `len` counts the sentinel, so a freshly created line
//! is non-empty: it contains exactly one newline. Columns are byte
//! offsets — this editor's column arithmetic is deliberately
//! single-byte (no Unicode widths, no grapheme clusters).
//!
//! # Storage
//!
//! Capacity doubles whenever an insertion would overflow, giving
//! amortized O(1) appends; single-character insert and remove shift the
//! tail by one byte (O(len), fine at line sizes). The doubling is done
//! explicitly rather than left to `Vec`'s growth policy so the
//! amortization contract is part of this module, not an implementation
//! detail of the standard library.
//!
//! # Removal contract
//!
//! `remove_char` does the whole job — shifts the tail *and* fixes the
//! length — so callers never share bookkeeping responsibility with the
//! line. Cursor adjustment stays with the caller, where the cursor
//! lives.

use std::fmt;

/// One editable text row: content bytes followed by a `\n` sentinel.
///
/// Invariants: the byte sequence is never empty and its last byte is
/// always `\n`. `Clone` deep-copies, producing a structurally detached
/// line (used for yank and undo snapshots).
#[derive(Clone, PartialEq, Eq)]
pub struct Line {
    /// Content bytes plus the trailing sentinel.
    data: Vec<u8>,
}

impl Line {
    /// Create an empty line: exactly one newline, capacity 1.
    #[must_use]
    pub fn new() -> Self {
        let mut data = Vec::with_capacity(1);
        data.push(b'\n');
        Self { data }
    }

    /// Create a line from content bytes. A trailing `\n` in `content`
    /// is taken as the sentinel; otherwise one is appended.
    #[must_use]
    pub fn from_bytes(content: &[u8]) -> Self {
        let mut data = Vec::with_capacity(content.len() + 1);
        data.extend_from_slice(content);
        if data.last() != Some(&b'\n') {
            data.push(b'\n');
        }
        Self { data }
    }

    /// Create a line from a text slice (convenience for tests and yank).
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    // -- Accessors ----------------------------------------------------------

    /// Total byte length, sentinel included. Always at least 1.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Allocated capacity in bytes.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Number of real (non-sentinel) characters.
    #[inline]
    #[must_use]
    pub fn usable_len(&self) -> usize {
        self.data.len() - 1
    }

    /// True when the line holds only the sentinel.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.len() == 1
    }

    /// Column of the last real character. A line with no real
    /// characters reports column 0 — the normal-mode cursor has nowhere
    /// else to sit.
    #[inline]
    #[must_use]
    pub fn last_col(&self) -> usize {
        self.usable_len().saturating_sub(1)
    }

    /// Content bytes without the sentinel.
    #[inline]
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.data[..self.data.len() - 1]
    }

    /// Content bytes including the sentinel — the persisted form.
    #[inline]
    #[must_use]
    pub fn raw(&self) -> &[u8] {
        &self.data
    }

    /// Content as text, sentinel excluded. Bytes that are not valid
    /// UTF-8 render as replacement characters; the buffer itself is
    /// byte-faithful.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(self.content()).into_owned()
    }

    /// The byte at column `col`, if it is a real character.
    #[inline]
    #[must_use]
    pub fn byte(&self, col: usize) -> Option<u8> {
        if col < self.usable_len() {
            Some(self.data[col])
        } else {
            None
        }
    }

    /// Byte offset of the first occurrence of `pattern` at or after
    /// `from`, searching real characters only.
    #[must_use]
    pub fn find(&self, pattern: &[u8], from: usize) -> Option<usize> {
        if pattern.is_empty() {
            return None;
        }
        let content = self.content();
        if from >= content.len() {
            return None;
        }
        content[from..]
            .windows(pattern.len())
            .position(|w| w == pattern)
            .map(|i| from + i)
    }

    // -- Mutation -----------------------------------------------------------

    /// Append a character just before the sentinel.
    pub fn push_char(&mut self, c: u8) {
        let at = self.usable_len();
        self.insert_char(at, c);
    }

    /// Insert `c` at column `col`, shifting the tail right.
    ///
    /// `col` is clamped to the content length, so the worst an
    /// out-of-range caller gets is an append.
    pub fn insert_char(&mut self, col: usize, c: u8) {
        let col = col.min(self.usable_len());
        self.grow_if_full();
        self.data.insert(col, c);
    }

    /// Remove the character at column `col`, shifting the tail left and
    /// fixing the length. No-op when `col` addresses no real character.
    /// Returns the removed byte.
    pub fn remove_char(&mut self, col: usize) -> Option<u8> {
        if col < self.usable_len() {
            Some(self.data.remove(col))
        } else {
            None
        }
    }

    /// Overwrite the character at column `col`. No-op past the content.
    /// Returns `true` if a character was replaced.
    pub fn overwrite(&mut self, col: usize, c: u8) -> bool {
        if col < self.usable_len() {
            self.data[col] = c;
            true
        } else {
            false
        }
    }

    /// Toggle the case of an alphabetic character at `col`. Returns
    /// `true` if the byte changed.
    pub fn toggle_case(&mut self, col: usize) -> bool {
        if col < self.usable_len() && self.data[col].is_ascii_alphabetic() {
            self.data[col] ^= 0x20;
            true
        } else {
            false
        }
    }

    /// Cut the line at column `col`: everything from `col` to the end
    /// of the content becomes a new, detached line; this line keeps the
    /// head and is re-terminated with its sentinel.
    #[must_use]
    pub fn split_off(&mut self, col: usize) -> Self {
        let col = col.min(self.usable_len());
        let tail = Self::from_bytes(&self.data[col..self.data.len() - 1]);
        self.data.truncate(col);
        self.data.push(b'\n');
        tail
    }

    /// Drop all content, keeping only the sentinel. This is `D`.
    pub fn truncate_all(&mut self) {
        self.data.clear();
        self.data.push(b'\n');
    }

    /// Exchange contents with another line. Used by the one-level undo:
    /// swapping twice restores the original, so `u` toggles.
    pub fn swap_contents(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.data, &mut other.data);
    }

    /// Double the capacity when the next insertion would overflow.
    fn grow_if_full(&mut self) {
        if self.data.len() == self.data.capacity() {
            self.data.reserve_exact(self.data.capacity().max(1));
        }
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line({:?})", self.text())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
