//! Error types raised by the parser core.

use core::fmt;
use thiserror::Error;

/// A 1-based line/character location within the input stream.
///
/// `line` counts logical lines observed so far (starting at 1); `character`
/// is a 1-based byte offset within that line.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// 1-based byte offset within `line`.
    pub character: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(line {}, character {})", self.line, self.character)
    }
}

/// Errors surfaced through [`Sink::on_error`](crate::sink::Sink::on_error) or by
/// rejecting an adapter's pending request.
///
/// All variants are terminal: once one is raised, the originating
/// [`Reader`](crate::reader::Reader) emits no further cells and every adapter built
/// on top of it permanently returns `None` (or the already-delivered error) from then on.
#[derive(Error, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ParseError {
    /// The byte source was exhausted while a quoted cell was still open.
    #[error("unterminated quote {position}")]
    UnterminatedQuote {
        /// Where the stream ended.
        position: Position,
    },

    /// A closing quote was followed by a byte that doesn't start a column or
    /// line separator.
    #[error("unexpected character after closing quote {position}: {}", display_offending_byte(*offending))]
    UnexpectedAfterQuote {
        /// Where the offending byte was found.
        position: Position,
        /// The byte immediately following the closing quote.
        offending: u8,
    },

    /// A `quote` byte sequence started inside an unquoted field.
    #[error("unexpected quote inside unquoted field {position}")]
    UnexpectedQuoteInUnquoted {
        /// Where the stray quote was found.
        position: Position,
    },

    /// The parser reached a state the 16-rule loop considers unreachable.
    ///
    /// Seeing this is a defect in the parser itself, not malformed input.
    #[error("internal parser defect {position}")]
    Unexpected {
        /// Where the defect was detected.
        position: Position,
    },

    /// The byte source itself failed. Not named by spec.md's error-kind
    /// table (which only covers syntax faults), but a real byte source can
    /// fail, and the parser has nowhere else to surface that.
    #[error("byte source error at byte offset {offset}: {message}")]
    Source {
        /// Absolute byte offset at which the read was attempted.
        offset: u64,
        /// Rendered `std::io::Error` message.
        message: String,
    },
}

impl ParseError {
    /// The position at which this error was raised.
    pub fn position(&self) -> Option<Position> {
        match *self {
            ParseError::UnterminatedQuote { position }
            | ParseError::UnexpectedAfterQuote { position, .. }
            | ParseError::UnexpectedQuoteInUnquoted { position }
            | ParseError::Unexpected { position } => Some(position),
            ParseError::Source { .. } => None,
        }
    }
}

/// `\r` gets a friendly rendering plus a hint, since it's overwhelmingly caused by
/// configuring `lineSeparator: "\n"` against CRLF input.
fn display_offending_byte(byte: u8) -> String {
    if byte == 0x0D {
        r#"'\r' (hint: this file may use CRLF line endings, try lineSeparator: "\r\n")"#
            .to_string()
    } else if byte.is_ascii_graphic() || byte == b' ' {
        format!("'{}'", byte as char)
    } else {
        format!("byte 0x{byte:02X}")
    }
}

/// Errors raised while validating an [`Options`](crate::options::Options) configuration.
#[derive(Error, Clone, Eq, PartialEq, Hash, Debug)]
pub enum OptionsError {
    /// One of `columnSeparator`, `lineSeparator`, or `quote` was empty.
    #[error("{field} must not be empty")]
    EmptyDelimiter {
        /// Which option was empty.
        field: &'static str,
    },

    /// Two configured delimiters share a prefix, which the parser core cannot
    /// disambiguate (spec.md §9, Open Question (a)).
    #[error("{first} and {second} share a prefix, which is undefined behavior; configure non-overlapping delimiters")]
    AmbiguousDelimiters {
        /// Name of the first conflicting option.
        first: &'static str,
        /// Name of the second conflicting option.
        second: &'static str,
    },

    /// `lineSeparator` or `columnSeparator` begins with `quote`.
    #[error("{field} must not begin with the configured quote sequence")]
    SeparatorStartsWithQuote {
        /// Which option begins with `quote`.
        field: &'static str,
    },

    /// `fromLine` is greater than `toLine`.
    #[error("fromLine ({from_line}) must not exceed toLine ({to_line})")]
    InvalidLineRange {
        /// The configured `fromLine`.
        from_line: usize,
        /// The configured `toLine`.
        to_line: usize,
    },
}
