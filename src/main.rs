// SPDX-License-Identifier: MIT
//
// vix — a small modal terminal text editor.
//
// This binary wires the two crates together:
//
//   vix-term   → raw mode, alternate screen, input parsing, drawing
//   vix-editor → line buffer, cursor, modes, render model
//
// Each keypress flows through:
//
//   stdin → Reader → Editor::step → buffer/cursor mutation
//   Editor::frame → Screen::draw → stdout
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ text area                    │  ← rows - 1 (missing rows drawn ~)
//   ├──────────────────────────────┤
//   │ status line (reverse video)  │  ← 1 row
//   └──────────────────────────────┘

use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;

use vix_editor::buffer::Buffer;
use vix_editor::editor::{Action, Editor};
use vix_term::input::{Key, Reader};
use vix_term::screen::Screen;
use vix_term::terminal::{self, Terminal};

/// Load the buffer for `path`, or start empty.
///
/// An unreadable or missing file is not fatal: the session opens on a
/// single empty line and `:w` will create the file.
fn load_buffer(path: Option<&PathBuf>) -> Buffer {
    let Some(path) = path else {
        return Buffer::new();
    };
    match File::open(path) {
        Ok(file) => Buffer::from_reader(BufReader::new(file)).unwrap_or_else(|_| Buffer::new()),
        Err(_) => Buffer::new(),
    }
}

fn run(path: Option<PathBuf>) -> io::Result<()> {
    let mut terminal = Terminal::new()?;
    let buffer = load_buffer(path.as_ref());
    let mut editor = Editor::new(buffer, path, terminal.size());

    terminal.enter()?;
    let mut screen = Screen::new();
    let mut reader = Reader::new();

    loop {
        let frame = editor.frame();
        screen.draw(
            terminal.size(),
            &frame.lines,
            &frame.status,
            (frame.cursor_row, frame.cursor_col),
        )?;

        let event = reader.next_key()?;
        if matches!(event.key, Key::Resize) {
            editor.resize(terminal.refresh_size());
        }
        if editor.step(event) == Action::Quit {
            break;
        }
    }

    terminal.leave()
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    if !terminal::is_tty() {
        eprintln!("vix: standard input is not a terminal");
        process::exit(1);
    }

    let path = env::args_os().nth(1).map(PathBuf::from);
    if let Err(e) = run(path) {
        eprintln!("vix: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_starts_empty() {
        let path = PathBuf::from("/nonexistent/definitely-not-here");
        let buf = load_buffer(Some(&path));
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.line(buf.head()).usable_len(), 0);
    }

    #[test]
    fn no_path_starts_empty() {
        let buf = load_buffer(None);
        assert_eq!(buf.len(), 1);
    }
}
