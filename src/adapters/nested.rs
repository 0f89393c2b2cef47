//! The row-of-cell-iterators adapter (spec.md §4.4, §9 "Nested lazy rows"):
//! each row is itself a lazily-pulled stream of cells, avoiding the
//! allocation a [`super::row::Rows`] buffers per row.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tokio::io::AsyncRead;

use super::token::{Token, Tokens};
use crate::error::ParseError;
use crate::options::ParserConfig;

/// Yields one [`RowCells`] per row.
///
/// Built by [`crate::nested_rows`]. If a consumer abandons a [`RowCells`]
/// before exhausting it, the *next* call to [`NestedRows::next`] first drains
/// the parser to that row's boundary so the underlying parser never stalls
/// mid-row: see spec.md §9.
pub struct NestedRows<R> {
    tokens: Rc<RefCell<Tokens<R>>>,
    row_active: Rc<Cell<bool>>,
    exhausted: bool,
}

impl<R: AsyncRead + Unpin> NestedRows<R> {
    pub(crate) fn new(byte_source: R, config: ParserConfig) -> Self {
        NestedRows {
            tokens: Rc::new(RefCell::new(Tokens::new(byte_source, config))),
            row_active: Rc::new(Cell::new(false)),
            exhausted: false,
        }
    }

    /// Pulls the next row's cell iterator, or `None` at end of stream.
    pub async fn next(&mut self) -> Option<RowCells<R>> {
        if self.exhausted {
            return None;
        }
        if self.row_active.get() {
            self.drain_current_row().await;
        }

        let lookahead = self.tokens.borrow_mut().next().await;
        match lookahead {
            None => {
                self.exhausted = true;
                None
            }
            Some(Err(e)) => {
                self.exhausted = true;
                self.row_active.set(true);
                Some(RowCells::prefetched(
                    Rc::clone(&self.tokens),
                    Rc::clone(&self.row_active),
                    Err(e),
                ))
            }
            Some(Ok(Token::NewLine)) => {
                // The engine never emits two row boundaries back to back
                // (spec.md §4.3 rules 8/9: `onRowEnd` only fires when a cell
                // was seen), so this would indicate a parser defect rather
                // than valid input. Surface it as an empty row so the
                // consumer sees *something* rather than this adapter
                // silently skipping a boundary.
                self.row_active.set(true);
                Some(RowCells::prefetched(
                    Rc::clone(&self.tokens),
                    Rc::clone(&self.row_active),
                    Ok(Token::NewLine),
                ))
            }
            Some(Ok(tok @ Token::Cell(_))) => {
                self.row_active.set(true);
                Some(RowCells::prefetched(
                    Rc::clone(&self.tokens),
                    Rc::clone(&self.row_active),
                    Ok(tok),
                ))
            }
        }
    }

    async fn drain_current_row(&mut self) {
        loop {
            match self.tokens.borrow_mut().next().await {
                Some(Ok(Token::Cell(_))) => continue,
                Some(Ok(Token::NewLine)) | None | Some(Err(_)) => break,
            }
        }
        self.row_active.set(false);
    }
}

/// A single row's cells, pulled lazily from the shared token stream.
///
/// Terminates on the `NEW_LINE` sentinel (or end-of-stream/error).
pub struct RowCells<R> {
    tokens: Rc<RefCell<Tokens<R>>>,
    active: Rc<Cell<bool>>,
    prefetched: Option<Result<Token, ParseError>>,
    done: bool,
}

impl<R: AsyncRead + Unpin> RowCells<R> {
    fn prefetched(
        tokens: Rc<RefCell<Tokens<R>>>,
        active: Rc<Cell<bool>>,
        first: Result<Token, ParseError>,
    ) -> Self {
        RowCells {
            tokens,
            active,
            prefetched: Some(first),
            done: false,
        }
    }

    /// Pulls the next cell in this row.
    pub async fn next(&mut self) -> Option<Result<String, ParseError>> {
        if self.done {
            return None;
        }
        let tok = match self.prefetched.take() {
            Some(t) => t,
            None => match self.tokens.borrow_mut().next().await {
                Some(t) => t,
                None => {
                    self.done = true;
                    self.active.set(false);
                    return None;
                }
            },
        };
        match tok {
            Ok(Token::Cell(text)) => Some(Ok(text)),
            Ok(Token::NewLine) => {
                self.done = true;
                self.active.set(false);
                None
            }
            Err(e) => {
                self.done = true;
                self.active.set(false);
                Some(Err(e))
            }
        }
    }
}
