//! The header-keyed object stream adapter (spec.md §4.4): a thin projection
//! over [`super::row::Rows`] that treats the first row as a header.

use std::collections::HashMap;

use tokio::io::AsyncRead;

use super::row::Rows;
use crate::error::ParseError;
use crate::options::ParserConfig;

/// Yields one `HashMap<String, String>` per data row, keyed by the first
/// row's cells.
///
/// Built by [`crate::objects`]. If the stream has no rows at all, `next()`
/// returns `None` immediately (there is no header to project against).
pub struct Objects<R> {
    rows: Rows<R>,
    header: Option<Vec<String>>,
    exhausted: bool,
}

impl<R: AsyncRead + Unpin> Objects<R> {
    pub(crate) fn new(byte_source: R, config: ParserConfig) -> Self {
        Objects {
            rows: Rows::new(byte_source, config),
            header: None,
            exhausted: false,
        }
    }

    /// Pulls the next mapped row.
    pub async fn next(&mut self) -> Option<Result<HashMap<String, String>, ParseError>> {
        if self.exhausted {
            return None;
        }
        if self.header.is_none() {
            match self.rows.next().await {
                None => {
                    self.exhausted = true;
                    return None;
                }
                Some(Err(e)) => {
                    self.exhausted = true;
                    return Some(Err(e));
                }
                Some(Ok(header)) => self.header = Some(header),
            }
        }

        match self.rows.next().await {
            None => {
                self.exhausted = true;
                None
            }
            Some(Err(e)) => {
                self.exhausted = true;
                Some(Err(e))
            }
            Some(Ok(row)) => {
                let header = self.header.as_ref().expect("header populated above");
                let map = header.iter().cloned().zip(row).collect();
                Some(Ok(map))
            }
        }
    }
}
