//! The token stream adapter (spec.md §4.4): cells and row boundaries as a
//! flat sequence.

use tokio::io::AsyncRead;

use crate::error::ParseError;
use crate::options::ParserConfig;
use crate::reader::Reader;
use crate::sink::{Event, Mailbox};
use crate::stats::Stats;

/// One item of the flat token stream: a decoded cell, or the `NEW_LINE`
/// sentinel marking a row boundary.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Token {
    /// A decoded cell.
    Cell(String),
    /// Marks the end of a row.
    NewLine,
}

/// Yields [`Token`]s in strict input order.
///
/// Built by [`crate::tokens`]. Single-use: once `next()` returns `None` or an
/// `Err`, every later call also returns `None`.
pub struct Tokens<R> {
    reader: Reader<R, Mailbox>,
}

impl<R: AsyncRead + Unpin> Tokens<R> {
    pub(crate) fn new(byte_source: R, config: ParserConfig) -> Self {
        Tokens {
            reader: Reader::new(byte_source, config, Mailbox::new()),
        }
    }

    pub(crate) fn stats(&self) -> Stats {
        self.reader.stats()
    }

    pub(crate) fn current_pos(&self) -> u64 {
        self.reader.current_pos()
    }

    /// Pulls the next token, driving the parser core forward as needed.
    pub async fn next(&mut self) -> Option<Result<Token, ParseError>> {
        loop {
            if let Some(err) = self.reader.sink_mut().take_error() {
                return Some(Err(err));
            }
            if let Some(event) = self.reader.sink_mut().take_event() {
                return match event {
                    Event::Cell(text) => Some(Ok(Token::Cell(text))),
                    Event::RowEnd => Some(Ok(Token::NewLine)),
                    Event::End => None,
                };
            }
            if self.reader.sink().is_done() {
                return None;
            }
            self.reader.sink_mut().unpause();
            self.reader.read().await;
        }
    }
}
