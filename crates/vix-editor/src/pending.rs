//! Pending-keystroke accumulator for multi-key commands.
//!
//! Normal mode has a handful of commands that only resolve after a
//! second keystroke: `dd`, `yy`, `gg`, and `r` followed by its
//! replacement character. The first key of such a sequence lands here;
//! the dispatcher consults the accumulator on the next keystroke to
//! decide whether a sequence completed. Anything that is not a valid
//! continuation clears the accumulator and the key is handled fresh.
//!
//! The buffer is capacity-bounded: once full, further keys are dropped
//! rather than grown, so a runaway sequence can never allocate without
//! bound.

/// Maximum number of buffered keystrokes.
const CAPACITY: usize = 80;

/// Append-only, capacity-bounded keystroke buffer.
#[derive(Debug, Default)]
pub struct Accumulator {
    keys: Vec<char>,
}

impl Accumulator {
    /// Create an empty accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self { keys: Vec::new() }
    }

    /// Append a keystroke. Returns `false` (and drops the key) when the
    /// buffer is full.
    pub fn push(&mut self, ch: char) -> bool {
        if self.keys.len() >= CAPACITY {
            return false;
        }
        self.keys.push(ch);
        true
    }

    /// Whether no command is in progress.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The first buffered keystroke, if any.
    #[must_use]
    pub fn first(&self) -> Option<char> {
        self.keys.first().copied()
    }

    /// Number of buffered keystrokes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Abandon the in-progress command.
    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_empty() {
        let acc = Accumulator::new();
        assert!(acc.is_empty());
        assert_eq!(acc.first(), None);
    }

    #[test]
    fn push_and_clear() {
        let mut acc = Accumulator::new();
        assert!(acc.push('d'));
        assert_eq!(acc.first(), Some('d'));
        assert_eq!(acc.len(), 1);
        acc.clear();
        assert!(acc.is_empty());
    }

    #[test]
    fn drops_keys_past_capacity() {
        let mut acc = Accumulator::new();
        for _ in 0..CAPACITY {
            assert!(acc.push('x'));
        }
        assert!(!acc.push('y'));
        assert_eq!(acc.len(), CAPACITY);
    }
}
