//! Ex command-line parsing.
//!
//! Keystrokes after `:` accumulate into a plain string echoed on the
//! status line; Enter commits it here. The recognized vocabulary is
//! tiny: `q` quits, `w` writes, and a bare decimal number jumps to that
//! (1-based) line. Everything else flashes "not an editor command".

/// A committed ex command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExCommand {
    /// `:q` — end the session.
    Quit,
    /// `:w` — write the buffer to the session's file target.
    Write,
    /// `:N` — jump to 1-based line `N`.
    Goto(usize),
    /// Anything else.
    Unknown,
}

/// Parse a committed ex command line.
///
/// The input must parse *fully*: `12x` is not a line jump. Leading and
/// trailing whitespace is tolerated; an empty command is `Unknown`.
#[must_use]
pub fn parse(input: &str) -> ExCommand {
    let input = input.trim();
    match input {
        "q" => ExCommand::Quit,
        "w" => ExCommand::Write,
        _ => match input.parse::<usize>() {
            Ok(n) if n > 0 => ExCommand::Goto(n),
            _ => ExCommand::Unknown,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
