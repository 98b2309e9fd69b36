// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode, alternate screen, and RAII cleanup.
//
// Safety: this module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, sigaction, and raw fd writes.
// These are the standard POSIX interfaces for terminal control — there
// is no safe alternative. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// This module owns the terminal's raw state: it enters raw mode via
// termios, switches to the alternate screen, and guarantees cleanup on
// drop — even if the editor panics mid-frame. The panic hook writes a
// pre-built restore sequence directly to fd 1, bypassing Rust's stdout
// lock, so a panic during a frame flush still leaves the user with a
// working terminal and a readable error message.
//
// Signals: SIGWINCH sets an atomic flag that the input reader turns
// into a resize event. SIGINT is ignored for the whole session, so an
// accidental Ctrl-C cannot kill an unsaved buffer.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, Once};

use crate::ansi;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal or the query fails.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Signals ────────────────────────────────────────────────────────────────

/// Set by the SIGWINCH handler; drained by [`take_resize_flag`].
static RESIZE_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Drain the resize flag. Returns `true` if a SIGWINCH arrived since the
/// last call. Used by the input reader when a blocking read is
/// interrupted by a signal.
pub fn take_resize_flag() -> bool {
    RESIZE_RECEIVED.swap(false, Ordering::Relaxed)
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    RESIZE_RECEIVED.store(true, Ordering::Relaxed);
}

/// Install the session's signal handlers.
///
/// SIGWINCH sets the resize flag, deliberately *without* `SA_RESTART` so
/// the blocking stdin read returns `EINTR` and the event loop notices
/// the resize immediately. SIGINT is ignored: interrupting an editing
/// session must not discard the buffer.
#[cfg(unix)]
fn install_signal_handlers() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = 0;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());

        let mut ignore: libc::sigaction = std::mem::zeroed();
        ignore.sa_sigaction = libc::SIG_IGN;
        ignore.sa_flags = 0;
        libc::sigemptyset(&raw mut ignore.sa_mask);
        libc::sigaction(libc::SIGINT, &raw const ignore, std::ptr::null_mut());
    }
}

#[cfg(not(unix))]
fn install_signal_handlers() {
    // No-op on non-unix platforms.
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of original termios for panic recovery.
///
/// The [`Terminal`] struct owns its own copy, but the panic hook can't
/// access it. This global backup — behind a [`Mutex`], not `static mut`
/// — lets the hook restore cooked mode without the struct.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
            }
        }
    }
}

/// Complete terminal restore sequence for emergency use: reset SGR
/// attributes, show the cursor, exit the alternate screen. Alternate
/// screen exit is last so the restored shell content has no artifacts.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[0m\x1b[?25h\x1b[?1049l";

/// Panic hook guard — the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the
/// error. Writes [`EMERGENCY_RESTORE`] directly to fd 1 (bypassing
/// Rust's stdout lock to avoid deadlock), restores termios, then
/// delegates to the original panic handler.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Write the restore sequence directly to stdout's file descriptor.
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Terminal handle with RAII cleanup.
///
/// Call [`enter`](Self::enter) to switch to editing mode (raw mode plus
/// alternate screen). The terminal is restored automatically when the
/// handle is dropped — even on panic.
pub struct Terminal {
    /// Original termios saved before entering raw mode.
    #[cfg(unix)]
    original_termios: Option<libc::termios>,

    /// Current terminal size (cached; refresh with [`refresh_size`](Self::refresh_size)).
    size: Size,

    /// Whether we're in raw mode + alternate screen.
    active: bool,
}

impl Terminal {
    /// Create a terminal handle and query the current size.
    ///
    /// Does **not** enter raw mode — call [`enter`](Self::enter) for
    /// that. Falls back to 80×24 if the size cannot be determined
    /// (tests, piped environments).
    ///
    /// # Errors
    ///
    /// Currently infallible; returns `Result` so the call site reads
    /// like the rest of the I/O seam.
    pub fn new() -> io::Result<Self> {
        let size = get_size().unwrap_or(Size { cols: 80, rows: 24 });

        Ok(Self {
            #[cfg(unix)]
            original_termios: None,
            size,
            active: false,
        })
    }

    /// Current terminal size (columns, rows).
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Re-query the terminal size from the OS.
    ///
    /// Call this after a resize event to pick up the new dimensions.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(s) = get_size() {
            self.size = s;
        }
        self.size
    }

    /// Enter editing mode: raw termios, alternate screen, signal
    /// handlers, panic hook.
    ///
    /// # Errors
    ///
    /// Returns an error if termios state cannot be read or written.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }

        self.enter_raw_mode()?;
        install_signal_handlers();
        install_panic_hook();

        let mut out = io::stdout().lock();
        out.write_all(ansi::ENTER_ALT_SCREEN.as_bytes())?;
        out.write_all(ansi::CLEAR_SCREEN.as_bytes())?;
        out.write_all(ansi::CURSOR_HOME.as_bytes())?;
        out.flush()?;

        self.active = true;
        Ok(())
    }

    /// Leave editing mode, restoring cooked mode and the main screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the restore sequence cannot be written.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }

        let mut out = io::stdout().lock();
        out.write_all(ansi::SHOW_CURSOR.as_bytes())?;
        out.write_all(ansi::EXIT_ALT_SCREEN.as_bytes())?;
        out.flush()?;

        self.restore_cooked_mode();
        self.active = false;
        Ok(())
    }

    /// Switch stdin to raw (cbreak-style) mode: no canonical line
    /// buffering, no echo, byte-at-a-time reads. Keyboard signal
    /// generation stays enabled — SIGINT is separately ignored.
    #[cfg(unix)]
    fn enter_raw_mode(&mut self) -> io::Result<()> {
        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(libc::STDIN_FILENO, &mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            self.original_termios = Some(termios);
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(termios);
            }

            termios.c_lflag &= !(libc::ICANON | libc::ECHO);
            termios.c_iflag &= !(libc::IXON | libc::ICRNL);
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;

            if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn enter_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Restore the saved termios state. Best-effort.
    #[cfg(unix)]
    fn restore_cooked_mode(&mut self) {
        if let Some(original) = self.original_termios.take() {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &original);
            }
        }
    }

    #[cfg(not(unix))]
    fn restore_cooked_mode(&mut self) {}
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
