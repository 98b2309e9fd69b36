// SPDX-License-Identifier: MIT
//
// ANSI escape sequences.
//
// Const sequences for the fixed commands, small `format!` builders for
// the parameterized ones. Cursor coordinates are 0-indexed on the Rust
// side and converted to the terminal's 1-indexed form here — callers
// never see the off-by-one.

/// Switch to the alternate screen buffer (`CSI ? 1049 h`).
pub const ENTER_ALT_SCREEN: &str = "\x1b[?1049h";

/// Return to the main screen buffer (`CSI ? 1049 l`).
pub const EXIT_ALT_SCREEN: &str = "\x1b[?1049l";

/// Erase the entire screen (`CSI 2 J`).
pub const CLEAR_SCREEN: &str = "\x1b[2J";

/// Erase from the cursor to the end of the line (`CSI K`).
pub const CLEAR_TO_EOL: &str = "\x1b[K";

/// Move the cursor to the top-left corner (`CSI H`).
pub const CURSOR_HOME: &str = "\x1b[H";

/// Hide the text cursor (`CSI ? 25 l`).
pub const HIDE_CURSOR: &str = "\x1b[?25l";

/// Show the text cursor (`CSI ? 25 h`).
pub const SHOW_CURSOR: &str = "\x1b[?25h";

/// Enable reverse video (`SGR 7`). Used for the status line.
pub const REVERSE: &str = "\x1b[7m";

/// Reset all SGR attributes (`SGR 0`).
pub const RESET: &str = "\x1b[0m";

/// Move the cursor to `(row, col)`, both 0-indexed.
#[must_use]
pub fn cursor_to(row: u16, col: u16) -> String {
    format!("\x1b[{};{}H", row + 1, col + 1)
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cursor_to_is_one_indexed() {
        assert_eq!(cursor_to(0, 0), "\x1b[1;1H");
        assert_eq!(cursor_to(4, 9), "\x1b[5;10H");
    }

    #[test]
    fn const_sequences_start_with_esc() {
        for seq in [
            ENTER_ALT_SCREEN,
            EXIT_ALT_SCREEN,
            CLEAR_SCREEN,
            CLEAR_TO_EOL,
            CURSOR_HOME,
            HIDE_CURSOR,
            SHOW_CURSOR,
            REVERSE,
            RESET,
        ] {
            assert!(seq.starts_with('\x1b'));
        }
    }
}
