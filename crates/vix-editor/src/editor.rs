//! The modal state machine.
//!
//! [`Editor`] owns the whole session: buffer, cursor, registers,
//! search pattern, pending-keystroke accumulator, and the current
//! [`Mode`]. Each keystroke goes through [`step`](Editor::step), which
//! mutates state in place and returns an [`Action`] telling the host
//! whether to keep looping.
//!
//! Normal mode is the dispatch hub:
//!
//! | Key            | Effect                                     |
//! |----------------|--------------------------------------------|
//! | `h j k l`, arrows, Space, Enter | cursor motion             |
//! | `0`, `$`, `E`  | column jump                                |
//! | `gg`, `G`      | buffer-start / buffer-end jump             |
//! | `i a A o O`    | enter insert mode (snapshotting the line)  |
//! | `x r ~ D`      | single-line edits                          |
//! | `dd`           | delete the current line                    |
//! | `yy`, `p`      | yank / paste one line                      |
//! | `u`            | swap the line with its pre-edit snapshot   |
//! | `/`, `n`       | search forward                             |
//! | `:`            | ex command line (`q`, `w`, line number)    |
//!
//! Out-of-range motions are no-ops, never errors; the only fallible
//! operation is `:w`, whose failure lands on the status line rather
//! than tearing down the session.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use vix_term::input::{Key, KeyEvent, Modifiers};
use vix_term::terminal::Size;

use crate::buffer::Buffer;
use crate::command::{self, ExCommand};
use crate::cursor::Cursor;
use crate::line::Line;
use crate::mode::{ExState, Mode, SearchState};
use crate::pending::Accumulator;
use crate::register::Registers;
use crate::search::Search;
use crate::view::{self, Frame};

/// What the host loop should do after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep looping.
    Continue,
    /// End the session.
    Quit,
}

/// One editing session.
#[derive(Debug)]
pub struct Editor {
    buffer: Buffer,
    cursor: Cursor,
    mode: Mode,
    pending: Accumulator,
    registers: Registers,
    search: Search,
    /// Status-line flash; cleared by the next keystroke.
    message: Option<String>,
    /// When set, the next keystroke only acknowledges the flash.
    awaiting_ack: bool,
    /// Target for `:w`.
    path: Option<PathBuf>,
    size: Size,
}

impl Editor {
    /// Create a session over a loaded buffer.
    ///
    /// `path` is the `:w` target; `None` means writes are refused with
    /// a status message.
    #[must_use]
    pub fn new(buffer: Buffer, path: Option<PathBuf>, size: Size) -> Self {
        let cursor = Cursor::new(&buffer);
        Self {
            buffer,
            cursor,
            mode: Mode::Normal,
            pending: Accumulator::new(),
            registers: Registers::new(),
            search: Search::new(),
            message: None,
            awaiting_ack: false,
            path,
            size,
        }
    }

    // -- Host interface -----------------------------------------------------

    /// Process one keystroke.
    pub fn step(&mut self, event: KeyEvent) -> Action {
        if matches!(event.key, Key::Resize) {
            return Action::Continue;
        }
        // A flash that demanded acknowledgement swallows exactly one
        // keystroke.
        if self.awaiting_ack {
            self.awaiting_ack = false;
            self.message = None;
            return Action::Continue;
        }
        self.message = None;

        match std::mem::replace(&mut self.mode, Mode::Normal) {
            Mode::Normal => self.handle_normal(event),
            Mode::Insert => {
                self.mode = Mode::Insert;
                self.handle_insert(event)
            }
            Mode::Ex(state) => self.handle_ex(state, event),
            Mode::Search(state) => self.handle_search(state, event),
        }
    }

    /// Produce the render model for the current state.
    #[must_use]
    pub fn frame(&self) -> Frame {
        view::render(
            &self.buffer,
            &self.cursor,
            &self.mode,
            self.message.as_deref(),
            self.size,
        )
    }

    /// Adopt a new terminal size (after a resize event).
    pub fn resize(&mut self, size: Size) {
        self.size = size;
    }

    /// The document buffer.
    #[must_use]
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// The cursor.
    #[must_use]
    pub const fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// The current mode.
    #[must_use]
    pub const fn mode(&self) -> &Mode {
        &self.mode
    }

    /// The current status-line flash, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    // -- Normal mode --------------------------------------------------------

    fn handle_normal(&mut self, event: KeyEvent) -> Action {
        if event.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) {
            return Action::Continue;
        }
        // Resolve a buffered first keystroke before anything else.
        if let Some(first) = self.pending.first() {
            self.pending.clear();
            match (first, event.key) {
                ('d', Key::Char('d')) => {
                    self.delete_line();
                    return Action::Continue;
                }
                ('y', Key::Char('y')) => {
                    self.registers.yank(self.buffer.line(self.cursor.line()));
                    return Action::Continue;
                }
                ('g', Key::Char('g')) => {
                    self.cursor.goto_head(&self.buffer);
                    return Action::Continue;
                }
                ('r', Key::Char(c)) if printable(c) => {
                    let id = self.cursor.line();
                    let _ = self.buffer.line_mut(id).overwrite(self.cursor.col(), c as u8);
                    return Action::Continue;
                }
                // `r` consumed its operand even when it cancels.
                ('r', _) => return Action::Continue,
                // Abandoned sequence; handle the key fresh below.
                _ => {}
            }
        }

        match event.key {
            Key::Char(c) => self.normal_char(c),
            Key::Up => self.cursor.move_up(&self.buffer),
            Key::Down | Key::Enter => self.cursor.move_down(&self.buffer, self.text_height()),
            Key::Left | Key::Backspace => self.cursor.move_left(),
            Key::Right => self.cursor.move_right(&self.buffer),
            Key::Escape | Key::Tab | Key::Resize => {}
        }
        Action::Continue
    }

    #[allow(clippy::too_many_lines)]
    fn normal_char(&mut self, c: char) {
        match c {
            'h' => self.cursor.move_left(),
            'j' => self.cursor.move_down(&self.buffer, self.text_height()),
            'k' => self.cursor.move_up(&self.buffer),
            'l' | ' ' => self.cursor.move_right(&self.buffer),
            '0' => self.cursor.line_start(),
            '$' | 'E' => self.cursor.line_end(&self.buffer),
            'G' => self.cursor.goto_tail(&self.buffer, self.text_height()),
            'g' | 'd' | 'y' | 'r' => {
                let _ = self.pending.push(c);
            }
            'i' => self.enter_insert_at(self.cursor.col()),
            'a' => self.enter_insert_at(self.cursor.col() + 1),
            'A' => {
                let end = self.buffer.line(self.cursor.line()).usable_len();
                self.enter_insert_at(end);
            }
            'o' => {
                self.buffer.insert_after(self.cursor.line(), Line::new());
                self.cursor.move_down(&self.buffer, self.text_height());
                self.enter_insert_at(0);
            }
            'O' => {
                self.buffer.insert_before(self.cursor.line(), Line::new());
                self.cursor.enter_line_above(&self.buffer);
                self.enter_insert_at(0);
            }
            'x' => {
                let id = self.cursor.line();
                if self.buffer.line(id).usable_len() > 0 {
                    let _ = self.buffer.line_mut(id).remove_char(self.cursor.col());
                    self.cursor.clamp_normal(&self.buffer);
                }
            }
            '~' => {
                let id = self.cursor.line();
                if self.buffer.line(id).usable_len() > 0 {
                    let _ = self.buffer.line_mut(id).toggle_case(self.cursor.col());
                    self.cursor.move_right(&self.buffer);
                }
            }
            'D' => {
                let id = self.cursor.line();
                self.buffer.line_mut(id).truncate_all();
                self.cursor.clamp_normal(&self.buffer);
            }
            'p' => {
                if let Some(line) = self.registers.paste() {
                    self.buffer.insert_after(self.cursor.line(), line);
                    self.cursor.move_down(&self.buffer, self.text_height());
                }
            }
            'u' => {
                let id = self.cursor.line();
                if self.registers.swap_with(self.buffer.line_mut(id)) {
                    self.cursor.clamp_normal(&self.buffer);
                }
            }
            'n' => self.repeat_search(),
            '/' => {
                self.mode = Mode::Search(SearchState {
                    input: String::new(),
                    saved: self.cursor.clone(),
                });
            }
            ':' => {
                self.mode = Mode::Ex(ExState {
                    input: String::new(),
                    saved: self.cursor.clone(),
                });
            }
            other => self.flash(format!("Not an editor command: {other}")),
        }
    }

    /// Snapshot the current line and enter insert mode with the column
    /// clamped to the insert range (one past the last character is
    /// allowed).
    fn enter_insert_at(&mut self, col: usize) {
        self.registers.snapshot(self.buffer.line(self.cursor.line()));
        self.cursor.set_col_insert(&self.buffer, col);
        self.mode = Mode::Insert;
    }

    /// `dd`. Refuses to empty the buffer: on the only remaining line it
    /// degrades to `D` (truncate in place).
    fn delete_line(&mut self) {
        if self.buffer.len() == 1 {
            let id = self.cursor.line();
            self.buffer.line_mut(id).truncate_all();
            self.cursor.clamp_normal(&self.buffer);
            return;
        }

        let doomed = self.cursor.line();
        let (successor, moved_back) = match self.buffer.next(doomed) {
            Some(next) => (next, false),
            None => match self.buffer.prev(doomed) {
                Some(prev) => (prev, true),
                None => return,
            },
        };
        let _ = self.buffer.remove(doomed);
        self.cursor.after_remove(&self.buffer, successor, moved_back);
    }

    fn repeat_search(&mut self) {
        if self.search.is_empty() {
            self.flash("No previous search");
            return;
        }
        match self.search.find_after(&self.buffer, self.cursor.line()) {
            Some((id, offset)) => self.cursor.snap_to_top(&self.buffer, id, offset),
            None => {
                let pattern = String::from_utf8_lossy(self.search.pattern()).into_owned();
                self.flash(format!("Pattern not found: {pattern}"));
                self.awaiting_ack = true;
            }
        }
    }

    // -- Insert mode --------------------------------------------------------

    fn handle_insert(&mut self, event: KeyEvent) -> Action {
        if event.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) {
            return Action::Continue;
        }
        let id = self.cursor.line();
        match event.key {
            Key::Char(c) if printable(c) => {
                let col = self.cursor.col();
                self.buffer.line_mut(id).insert_char(col, c as u8);
                self.cursor.set_col_raw(col + 1);
            }
            Key::Tab => {
                // Literal four-space indent.
                let col = self.cursor.col();
                for offset in 0..4 {
                    self.buffer.line_mut(id).insert_char(col + offset, b' ');
                }
                self.cursor.set_col_raw(col + 4);
            }
            Key::Enter => {
                self.buffer.split(id, self.cursor.col());
                self.cursor.move_down(&self.buffer, self.text_height());
                self.cursor.line_start();
            }
            Key::Backspace => {
                let col = self.cursor.col();
                if col > 0 {
                    let _ = self.buffer.line_mut(id).remove_char(col - 1);
                    self.cursor.set_col_raw(col - 1);
                }
            }
            Key::Escape => {
                // Step back to sit on, not past, the last character.
                self.mode = Mode::Normal;
                self.cursor.set_col_raw(self.cursor.col().saturating_sub(1));
                self.cursor.clamp_normal(&self.buffer);
            }
            _ => {}
        }
        Action::Continue
    }

    // -- Ex mode ------------------------------------------------------------

    fn handle_ex(&mut self, mut state: ExState, event: KeyEvent) -> Action {
        if event.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) {
            self.mode = Mode::Ex(state);
            return Action::Continue;
        }
        match event.key {
            Key::Char(c) if printable(c) => {
                state.input.push(c);
                self.mode = Mode::Ex(state);
            }
            Key::Backspace => {
                state.input.pop();
                self.mode = Mode::Ex(state);
            }
            Key::Escape => {
                self.cursor.restore(&self.buffer, &state.saved);
            }
            Key::Enter => {
                self.cursor.restore(&self.buffer, &state.saved);
                return self.run_ex(&state.input);
            }
            _ => self.mode = Mode::Ex(state),
        }
        Action::Continue
    }

    fn run_ex(&mut self, input: &str) -> Action {
        match command::parse(input) {
            ExCommand::Quit => return Action::Quit,
            ExCommand::Write => match self.save() {
                Ok(()) => {
                    if let Some(path) = &self.path {
                        self.flash(format!("\"{}\" written", path.display()));
                    }
                }
                Err(err) => self.flash(format!("Unable to write: {err}")),
            },
            ExCommand::Goto(n) => {
                // Replay the down motion until the target line.
                let height = self.text_height();
                for _ in self.cursor.line_no()..n {
                    self.cursor.move_down(&self.buffer, height);
                }
            }
            ExCommand::Unknown => {
                let trimmed = input.trim();
                if !trimmed.is_empty() {
                    self.flash(format!("Not an editor command: {trimmed}"));
                }
            }
        }
        Action::Continue
    }

    /// Write the buffer to the session's file target.
    fn save(&mut self) -> io::Result<()> {
        match &self.path {
            Some(path) => {
                let file = File::create(path)?;
                let mut writer = BufWriter::new(file);
                self.buffer.write_to(&mut writer)
            }
            None => Err(io::Error::new(io::ErrorKind::InvalidInput, "no file name")),
        }
    }

    // -- Search mode --------------------------------------------------------

    fn handle_search(&mut self, mut state: SearchState, event: KeyEvent) -> Action {
        if event.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) {
            self.mode = Mode::Search(state);
            return Action::Continue;
        }
        match event.key {
            Key::Char(c) if printable(c) => {
                state.input.push(c);
                self.mode = Mode::Search(state);
            }
            Key::Backspace => {
                state.input.pop();
                self.mode = Mode::Search(state);
            }
            Key::Escape => {
                self.cursor.restore(&self.buffer, &state.saved);
            }
            Key::Enter => {
                if state.input.is_empty() {
                    return Action::Continue;
                }
                self.search.set_pattern(state.input.as_bytes());
                match self.search.find_after(&self.buffer, self.cursor.line()) {
                    Some((id, offset)) => self.cursor.snap_to_top(&self.buffer, id, offset),
                    None => {
                        self.cursor.restore(&self.buffer, &state.saved);
                        self.flash(format!("Pattern not found: {}", state.input));
                        self.awaiting_ack = true;
                    }
                }
            }
            _ => self.mode = Mode::Search(state),
        }
        Action::Continue
    }

    // -- Helpers ------------------------------------------------------------

    fn text_height(&self) -> usize {
        usize::from(self.size.rows.saturating_sub(1)).max(1)
    }

    fn flash(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }
}

/// Keys that insert as themselves.
const fn printable(c: char) -> bool {
    c == ' ' || c.is_ascii_graphic()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
