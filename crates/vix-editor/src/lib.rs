//! # vix-editor — Editing engine for vix
//!
//! This crate contains the whole editing core, independent of any
//! terminal:
//!
//! - **[`line`]** — one editable text row, a growable byte sequence
//!   terminated by a sentinel newline
//! - **[`buffer`]** — the document: a doubly-linked sequence of lines
//!   in an id-addressed arena
//! - **[`cursor`]** — logical position, sticky column, and the
//!   scrolling viewport
//! - **[`pending`]** — accumulator for multi-key commands (`dd`, `gg`)
//! - **[`register`]** — the yank clipboard and one-level undo snapshot
//! - **[`search`]** — forward substring search
//! - **[`command`]** — ex (`:`) command parsing
//! - **[`mode`]** — the modal states and their per-mode data
//! - **[`editor`]** — the keystroke-to-mutation state machine
//! - **[`view`]** — the render model handed to the terminal host
//!
//! The host feeds [`editor::Editor::step`] one keystroke at a time and
//! draws the [`view::Frame`] it gets back; everything in between is
//! plain synchronous state.

pub mod buffer;
pub mod command;
pub mod cursor;
pub mod editor;
pub mod line;
pub mod mode;
pub mod pending;
pub mod register;
pub mod search;
pub mod view;
