// SPDX-License-Identifier: MIT
//
// vix-term — Terminal host for vix.
//
// Everything the editor core treats as an external collaborator lives
// here: raw mode and RAII restore, blocking keystroke acquisition with
// escape-sequence parsing, and full-frame ANSI drawing. Direct termios
// and escape sequences, no TUI framework — the editor is small enough
// that every byte sent to the terminal can be accounted for.

pub mod ansi;
pub mod input;
pub mod screen;
pub mod terminal;
