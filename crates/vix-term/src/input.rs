// SPDX-License-Identifier: MIT
//
// Terminal input — raw stdin bytes to structured key events.
//
// Two layers:
//
// - [`Parser`]: a pure byte-stream parser. Feed it chunks of raw bytes,
//   collect [`KeyEvent`]s. Escape sequences can span `read()` calls, so
//   incomplete input stays buffered until more bytes arrive. A lone ESC
//   is ambiguous (Escape key vs. start of a CSI sequence); the parser
//   holds it as pending until [`Parser::flush`] is called after a short
//   timeout.
//
// - [`Reader`]: the blocking "next keystroke" operation the editor's
//   event loop sits on. One `read(2)` at a time on stdin, single
//   threaded. A `read` interrupted by SIGWINCH surfaces as
//   [`Key::Resize`] so the loop can re-query the terminal size.
#![cfg_attr(unix, allow(unsafe_code))]

use std::io;

use bitflags::bitflags;

use crate::terminal;

// ─── Key Events ─────────────────────────────────────────────────────────────

/// Identity of a key.
///
/// Printable characters use [`Char`](Key::Char); the named keys are the
/// small set the editor dispatches on. Arrow keys are parsed from CSI
/// sequences and mapped to motions by the editor core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character.
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Up,
    Down,
    Left,
    Right,
    /// The terminal was resized (synthesized from SIGWINCH, not a key).
    Resize,
}

bitflags! {
    /// Keyboard modifier flags, matching the xterm CSI modifier encoding
    /// (`param = 1 + bitmask`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

/// A key with its active modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A plain, unmodified key.
    #[must_use]
    pub const fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
        }
    }

    /// A plain printable character.
    #[must_use]
    pub const fn char(ch: char) -> Self {
        Self::plain(Key::Char(ch))
    }
}

impl From<Key> for KeyEvent {
    fn from(key: Key) -> Self {
        Self::plain(key)
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Byte-stream key parser.
///
/// Feed raw bytes via [`advance`](Parser::advance) and collect events.
/// Incomplete escape sequences are kept in the internal buffer; call
/// [`flush`](Parser::flush) after a read timeout to emit a pending lone
/// ESC as a real Escape keypress.
#[derive(Debug, Default)]
pub struct Parser {
    /// Accumulated raw bytes waiting to be parsed.
    buf: Vec<u8>,
}

impl Parser {
    /// Create a parser with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(16),
        }
    }

    /// True when bytes are buffered waiting for the rest of a sequence.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Feed raw bytes and return all events that parse completely.
    pub fn advance(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match parse_one(&self.buf[pos..]) {
                Parsed::Event(ev, used) => {
                    events.push(ev);
                    pos += used;
                }
                Parsed::Skip(used) => pos += used,
                Parsed::Incomplete => break,
            }
        }

        self.buf.drain(..pos);
        events
    }

    /// Emit buffered bytes as literal events after a timeout.
    ///
    /// A lone ESC held in the buffer becomes an Escape keypress; a
    /// truncated sequence is dropped. Returns the flushed events.
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        let mut events = Vec::new();
        if self.buf.first() == Some(&0x1b) {
            events.push(KeyEvent::plain(Key::Escape));
        }
        self.buf.clear();
        events
    }
}

/// Outcome of parsing the front of the byte buffer.
enum Parsed {
    /// A complete event consuming `usize` bytes.
    Event(KeyEvent, usize),
    /// Unrecognized input to discard.
    Skip(usize),
    /// The buffer ends mid-sequence; wait for more bytes.
    Incomplete,
}

/// Parse one event from the front of `bytes`.
fn parse_one(bytes: &[u8]) -> Parsed {
    match bytes[0] {
        0x1b => parse_escape(bytes),
        b'\r' | b'\n' => Parsed::Event(KeyEvent::plain(Key::Enter), 1),
        b'\t' => Parsed::Event(KeyEvent::plain(Key::Tab), 1),
        0x7f | 0x08 => Parsed::Event(KeyEvent::plain(Key::Backspace), 1),
        // Remaining C0 controls arrive as Ctrl+letter.
        b @ 0x01..=0x1a => Parsed::Event(
            KeyEvent {
                key: Key::Char((b + b'a' - 1) as char),
                modifiers: Modifiers::CTRL,
            },
            1,
        ),
        b @ 0x20..=0x7e => Parsed::Event(KeyEvent::char(b as char), 1),
        // Non-ASCII and unassigned controls are dropped; the editor's
        // column arithmetic is single-byte throughout.
        _ => Parsed::Skip(1),
    }
}

/// Parse a sequence starting with ESC: CSI, Alt+key, or a lone Escape.
fn parse_escape(bytes: &[u8]) -> Parsed {
    debug_assert_eq!(bytes[0], 0x1b);

    match bytes.get(1) {
        // Lone ESC so far — ambiguous until more bytes or a timeout.
        None => Parsed::Incomplete,
        Some(b'[') => parse_csi(bytes),
        // ESC + printable = Alt+key.
        Some(&b @ 0x20..=0x7e) => Parsed::Event(
            KeyEvent {
                key: Key::Char(b as char),
                modifiers: Modifiers::ALT,
            },
            2,
        ),
        // ESC ESC and friends: treat the first as a real Escape.
        Some(_) => Parsed::Event(KeyEvent::plain(Key::Escape), 1),
    }
}

/// Parse a CSI sequence: `ESC [ params final`.
///
/// Only the arrow finals (`A`–`D`) produce events; every other complete
/// CSI sequence is consumed and discarded. Modifier parameters use the
/// xterm `1;N` encoding where `N - 1` is the modifier bitmask.
fn parse_csi(bytes: &[u8]) -> Parsed {
    // Scan past parameter bytes (0x30–0x3f) and intermediates (0x20–0x2f)
    // to the final byte (0x40–0x7e).
    let mut i = 2;
    while i < bytes.len() {
        match bytes[i] {
            0x30..=0x3f | 0x20..=0x2f => i += 1,
            0x40..=0x7e => {
                let key = match bytes[i] {
                    b'A' => Key::Up,
                    b'B' => Key::Down,
                    b'C' => Key::Right,
                    b'D' => Key::Left,
                    _ => return Parsed::Skip(i + 1),
                };
                let modifiers = csi_modifiers(&bytes[2..i]);
                return Parsed::Event(KeyEvent { key, modifiers }, i + 1);
            }
            _ => return Parsed::Skip(i + 1),
        }
    }
    Parsed::Incomplete
}

/// Decode modifiers from CSI parameter bytes (`1;N` → bitmask `N - 1`).
fn csi_modifiers(params: &[u8]) -> Modifiers {
    let mut fields = params.split(|&b| b == b';');
    let _first = fields.next();
    let Some(second) = fields.next() else {
        return Modifiers::empty();
    };
    let mut n: u8 = 0;
    for &b in second {
        if b.is_ascii_digit() {
            n = n.wrapping_mul(10).wrapping_add(b - b'0');
        }
    }
    Modifiers::from_bits_truncate(n.saturating_sub(1))
}

// ─── Reader ─────────────────────────────────────────────────────────────────

/// Milliseconds to wait for the rest of an escape sequence after a lone
/// ESC byte. Past this, the ESC is delivered as a real Escape keypress.
const ESC_TIMEOUT_MS: i32 = 25;

/// Blocking keystroke source over stdin.
///
/// The editor's event loop calls [`next_key`](Reader::next_key), which
/// blocks until one key event is available. Single-threaded by design:
/// the engine has exactly one suspension point, and it is here.
#[derive(Debug, Default)]
pub struct Reader {
    parser: Parser,
    queued: Vec<KeyEvent>,
}

impl Reader {
    /// Create a reader with nothing buffered.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
            queued: Vec::new(),
        }
    }

    /// Block until the next key event arrives.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from stdin fails for a reason other
    /// than signal interruption, or if stdin reaches end of file.
    pub fn next_key(&mut self) -> io::Result<KeyEvent> {
        loop {
            if !self.queued.is_empty() {
                return Ok(self.queued.remove(0));
            }

            // A pending lone ESC: give the rest of the sequence a short
            // window to arrive, then flush it as a real Escape.
            if self.parser.has_pending() && !poll_stdin(ESC_TIMEOUT_MS)? {
                self.queued.extend(self.parser.flush());
                continue;
            }

            let mut buf = [0u8; 64];
            match read_stdin(&mut buf) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "stdin closed",
                    ));
                }
                Ok(n) => self.queued.extend(self.parser.advance(&buf[..n])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                    if terminal::take_resize_flag() {
                        return Ok(KeyEvent::plain(Key::Resize));
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// One blocking `read(2)` on stdin.
#[cfg(unix)]
fn read_stdin(buf: &mut [u8]) -> io::Result<usize> {
    let n = unsafe {
        libc::read(
            libc::STDIN_FILENO,
            buf.as_mut_ptr().cast::<libc::c_void>(),
            buf.len(),
        )
    };
    if n < 0 {
        Err(io::Error::last_os_error())
    } else {
        #[allow(clippy::cast_sign_loss)]
        Ok(n as usize)
    }
}

#[cfg(not(unix))]
fn read_stdin(buf: &mut [u8]) -> io::Result<usize> {
    use std::io::Read;
    io::stdin().read(buf)
}

/// Wait up to `timeout_ms` for stdin to become readable.
#[cfg(unix)]
fn poll_stdin(timeout_ms: i32) -> io::Result<bool> {
    let mut fds = libc::pollfd {
        fd: libc::STDIN_FILENO,
        events: libc::POLLIN,
        revents: 0,
    };
    let rc = unsafe { libc::poll(&mut fds, 1, timeout_ms) };
    match rc {
        -1 => {
            let e = io::Error::last_os_error();
            if e.kind() == io::ErrorKind::Interrupted {
                Ok(false)
            } else {
                Err(e)
            }
        }
        0 => Ok(false),
        _ => Ok(true),
    }
}

#[cfg(not(unix))]
fn poll_stdin(_timeout_ms: i32) -> io::Result<bool> {
    Ok(true)
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse_all(data: &[u8]) -> Vec<KeyEvent> {
        Parser::new().advance(data)
    }

    #[test]
    fn printable_ascii() {
        assert_eq!(parse_all(b"x"), vec![KeyEvent::char('x')]);
        assert_eq!(
            parse_all(b"hi"),
            vec![KeyEvent::char('h'), KeyEvent::char('i')]
        );
    }

    #[test]
    fn named_keys() {
        assert_eq!(parse_all(b"\r"), vec![KeyEvent::plain(Key::Enter)]);
        assert_eq!(parse_all(b"\n"), vec![KeyEvent::plain(Key::Enter)]);
        assert_eq!(parse_all(b"\t"), vec![KeyEvent::plain(Key::Tab)]);
        assert_eq!(parse_all(b"\x7f"), vec![KeyEvent::plain(Key::Backspace)]);
        assert_eq!(parse_all(b"\x08"), vec![KeyEvent::plain(Key::Backspace)]);
    }

    #[test]
    fn ctrl_letters() {
        // Ctrl-D = 0x04.
        assert_eq!(
            parse_all(b"\x04"),
            vec![KeyEvent {
                key: Key::Char('d'),
                modifiers: Modifiers::CTRL,
            }]
        );
    }

    #[test]
    fn arrows() {
        assert_eq!(parse_all(b"\x1b[A"), vec![KeyEvent::plain(Key::Up)]);
        assert_eq!(parse_all(b"\x1b[B"), vec![KeyEvent::plain(Key::Down)]);
        assert_eq!(parse_all(b"\x1b[C"), vec![KeyEvent::plain(Key::Right)]);
        assert_eq!(parse_all(b"\x1b[D"), vec![KeyEvent::plain(Key::Left)]);
    }

    #[test]
    fn modified_arrow() {
        // Ctrl+Up: CSI 1;5A.
        assert_eq!(
            parse_all(b"\x1b[1;5A"),
            vec![KeyEvent {
                key: Key::Up,
                modifiers: Modifiers::CTRL,
            }]
        );
        // Shift+Alt+Right: CSI 1;4C.
        assert_eq!(
            parse_all(b"\x1b[1;4C"),
            vec![KeyEvent {
                key: Key::Right,
                modifiers: Modifiers::SHIFT | Modifiers::ALT,
            }]
        );
    }

    #[test]
    fn alt_key() {
        assert_eq!(
            parse_all(b"\x1bx"),
            vec![KeyEvent {
                key: Key::Char('x'),
                modifiers: Modifiers::ALT,
            }]
        );
    }

    #[test]
    fn lone_esc_is_incomplete_then_flushes() {
        let mut parser = Parser::new();
        assert_eq!(parser.advance(b"\x1b"), vec![]);
        assert!(parser.has_pending());
        assert_eq!(parser.flush(), vec![KeyEvent::plain(Key::Escape)]);
        assert!(!parser.has_pending());
    }

    #[test]
    fn split_sequence_across_reads() {
        let mut parser = Parser::new();
        assert_eq!(parser.advance(b"\x1b["), vec![]);
        assert_eq!(parser.advance(b"B"), vec![KeyEvent::plain(Key::Down)]);
    }

    #[test]
    fn unknown_csi_is_discarded() {
        // Delete key: CSI 3~. Not in the editor's key set.
        assert_eq!(parse_all(b"\x1b[3~x"), vec![KeyEvent::char('x')]);
    }

    #[test]
    fn non_ascii_bytes_are_dropped() {
        assert_eq!(parse_all(b"\xc3\xa9a"), vec![KeyEvent::char('a')]);
    }

    #[test]
    fn esc_esc_yields_escape() {
        let events = parse_all(b"\x1b\x1bq");
        assert_eq!(events[0], KeyEvent::plain(Key::Escape));
    }

    #[test]
    fn key_event_from_key() {
        let ev: KeyEvent = Key::Enter.into();
        assert_eq!(ev, KeyEvent::plain(Key::Enter));
    }
}
