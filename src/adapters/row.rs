//! The row-of-strings adapter (spec.md §4.4): cells accumulated into a
//! vector per row.

use core::ops::Range;

use tokio::io::AsyncRead;

use super::token::{Token, Tokens};
use crate::error::ParseError;
use crate::options::ParserConfig;
use crate::stats::Stats;

/// Yields one `Vec<String>` per row.
///
/// Built by [`crate::rows`].
pub struct Rows<R> {
    tokens: Tokens<R>,
}

impl<R: AsyncRead + Unpin> Rows<R> {
    pub(crate) fn new(byte_source: R, config: ParserConfig) -> Self {
        Rows {
            tokens: Tokens::new(byte_source, config),
        }
    }

    /// Observability counters accumulated so far.
    pub fn stats(&self) -> Stats {
        self.tokens.stats()
    }

    /// Pulls the next row.
    pub async fn next(&mut self) -> Option<Result<Vec<String>, ParseError>> {
        let mut row = Vec::new();
        loop {
            match self.tokens.next().await {
                None => return None,
                Some(Err(e)) => return Some(Err(e)),
                Some(Ok(Token::Cell(text))) => row.push(text),
                Some(Ok(Token::NewLine)) => return Some(Ok(row)),
            }
        }
    }

    /// Wraps this adapter so each row is paired with the `Range<u64>` of
    /// absolute byte offsets it spanned.
    ///
    /// Not named by spec.md; carried forward from the teacher crate's later
    /// `into_rows_with_range()` (see SPEC_FULL.md §9).
    pub fn with_byte_ranges(self) -> RowsWithRanges<R> {
        RowsWithRanges { rows: self }
    }
}

/// Yields `(row, byte_range)` pairs. Built with [`Rows::with_byte_ranges`].
pub struct RowsWithRanges<R> {
    rows: Rows<R>,
}

impl<R: AsyncRead + Unpin> RowsWithRanges<R> {
    /// Pulls the next `(row, byte_range)` pair.
    pub async fn next(&mut self) -> Option<Result<(Vec<String>, Range<u64>), ParseError>> {
        let start = self.rows.tokens.current_pos();
        let result = self.rows.next().await;
        let end = self.rows.tokens.current_pos();
        result.map(|res| res.map(|row| (row, start..end)))
    }

    /// Observability counters accumulated so far.
    pub fn stats(&self) -> Stats {
        self.rows.stats()
    }
}
