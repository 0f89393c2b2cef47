//! The resumable state machine (spec.md §4.3): buffer management, delimiter
//! recognition, quote handling, position tracking, error reporting, line
//! skipping.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::buffer::{ColumnBuffer, InputBuffer};
use crate::error::{ParseError, Position};
use crate::options::ParserConfig;
use crate::scan::{find_read_till_index, find_read_till_index_quoted, find_read_till_line_separator_index, Boundary};
use crate::sink::Sink;
use crate::stats::Stats;

const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// The parser core. Generic over the byte source; driven by repeated calls
/// to [`Engine::run`] with a [`Sink`] supplying the callback hooks.
///
/// A single `Engine` is single-use: once it delivers `on_end` or `on_error`
/// to a sink it is terminal, and every subsequent `run()` call is a no-op.
pub(crate) struct Engine<R> {
    reader: R,
    config: ParserConfig,
    input: InputBuffer,
    column: ColumnBuffer,

    in_column: bool,
    in_quote: bool,
    empty_line: bool,
    reader_empty: bool,
    terminal: bool,
    /// Set after a row's trailing cell has been flushed but before
    /// `on_row_end` has been signaled to the sink. The mailbox only holds one
    /// pending emission at a time, so a row boundary that both flushes a cell
    /// and signals row-end must do so across two separate, separately-paused
    /// iterations of the loop in [`Engine::run`] rather than in one.
    pending_row_end: bool,

    current_pos: u64,
    lines_processed: usize,
    last_line_start_pos: u64,

    stats: Stats,
}

impl<R: AsyncRead + Unpin> Engine<R> {
    pub(crate) fn new(reader: R, config: ParserConfig) -> Self {
        let column_step = config.column_buffer_min_step_size;
        Engine {
            reader,
            config,
            input: InputBuffer::new(),
            column: ColumnBuffer::new(column_step),
            in_column: false,
            in_quote: false,
            empty_line: true,
            reader_empty: false,
            terminal: false,
            pending_row_end: false,
            current_pos: 0,
            lines_processed: 0,
            last_line_start_pos: 0,
            stats: Stats::default(),
        }
    }

    pub(crate) fn stats(&self) -> Stats {
        self.stats
    }

    /// Absolute byte offset since the start of the stream.
    pub(crate) fn current_pos(&self) -> u64 {
        self.current_pos
    }

    pub(crate) fn position(&self) -> Position {
        Position {
            line: self.lines_processed + 1,
            character: (self.current_pos - self.last_line_start_pos) as usize + 1,
        }
    }

    /// The look-ahead required before rule 1 is willing to stop refilling.
    ///
    /// Widened to at least 3 bytes while at the very start of the stream so
    /// the BOM check (rule 6) always has enough lookahead, even when
    /// `min_possible_buffer_reserve` is smaller than 3 (see SPEC_FULL.md §4.3).
    fn required_reserve(&self) -> usize {
        if self.current_pos == 0 {
            self.config.min_possible_buffer_reserve.max(BOM.len())
        } else {
            self.config.min_possible_buffer_reserve
        }
    }

    /// Drives the 16-rule loop until the sink pauses the engine or the parse
    /// reaches a terminal state. The only suspension point is the byte
    /// source read in rule 1.
    pub(crate) async fn run(&mut self, sink: &mut impl Sink) {
        if self.terminal {
            return;
        }
        loop {
            if sink.is_paused() {
                return;
            }

            // Deferred row-end signal (see rules 7/8): checked unconditionally,
            // ahead of every numbered rule, since the condition that triggered
            // it (EOF, or a line separator) may itself have already been
            // consumed by the time this flag is set.
            if self.pending_row_end {
                sink.on_row_end();
                self.pending_row_end = false;
                continue;
            }

            // Rule 1: refill.
            if !self.reader_empty && self.input.unprocessed() < self.required_reserve() {
                let mut chunk = vec![0u8; self.config.reader_iterator_buffer_size.max(1)];
                match self.reader.read(&mut chunk).await {
                    Ok(0) => self.reader_empty = true,
                    Ok(n) => {
                        self.stats.reads += 1;
                        self.input.append(&chunk[..n]);
                    }
                    Err(e) => {
                        self.terminal = true;
                        sink.on_error(ParseError::Source {
                            offset: self.current_pos,
                            message: e.to_string(),
                        });
                        return;
                    }
                }
                continue;
            }

            // Rule 2: compact input.
            if self.input.read_index() >= self.config.input_buffer_index_limit {
                self.input.compact();
                self.stats.input_buffer_shrinks += 1;
                continue;
            }

            // Rule 3: grow column buffer.
            if self.column.free() < self.config.column_buffer_reserve {
                self.column.grow(self.config.column_buffer_min_step_size);
                self.stats.column_buffer_expands += 1;
                continue;
            }

            // Rule 4: fast skip to `fromLine`.
            if !self.in_column && self.lines_processed < self.config.from_line {
                let slice = self.input.unprocessed_slice();
                match find_read_till_line_separator_index(slice, &self.config.line_separator) {
                    Some(idx) => {
                        let skip = idx + self.config.line_separator.len();
                        self.input.advance(skip);
                        self.current_pos += skip as u64;
                        self.lines_processed += 1;
                        self.last_line_start_pos = self.current_pos;
                        self.empty_line = true;
                    }
                    None => {
                        let skip = self.input.unprocessed();
                        self.input.advance(skip);
                        self.current_pos += skip as u64;
                    }
                }
                continue;
            }

            // Rule 5: reach `toLine`.
            if !self.in_column && self.lines_processed >= self.config.to_line {
                self.terminal = true;
                sink.on_end();
                return;
            }

            // Rule 6: UTF-8 BOM.
            if !self.in_column && self.current_pos == 0 {
                let slice = self.input.unprocessed_slice();
                if slice.len() >= BOM.len() && slice[..BOM.len()] == BOM {
                    self.input.advance(BOM.len());
                    self.current_pos += BOM.len() as u64;
                    continue;
                }
            }

            // Rule 7: EOF.
            if !self.in_column && self.input.unprocessed() == 0 && self.reader_empty {
                if !self.empty_line {
                    self.emit_cell(sink);
                    self.empty_line = true;
                    self.pending_row_end = true;
                    continue;
                }
                self.terminal = true;
                sink.on_end();
                return;
            }

            // Rule 8: line separator (outside column).
            if !self.in_column && self.input.unprocessed_slice().starts_with(&self.config.line_separator) {
                // Consume the separator itself eagerly, before the deferred
                // cell/row-end signals: it's plain buffer/position
                // bookkeeping with no sink call involved, so folding it in
                // here keeps `current_pos` lined up with where it would land
                // in a single-pass version of this rule, rather than leaving
                // it stale until a later resumption.
                let had_content = !self.empty_line;
                let len = self.config.line_separator.len();
                self.input.advance(len);
                self.current_pos += len as u64;
                self.lines_processed += 1;
                self.last_line_start_pos = self.current_pos;
                self.empty_line = true;

                if had_content {
                    self.emit_cell(sink);
                    self.pending_row_end = true;
                }
                continue;
            }

            // Rule 9: column separator (outside column).
            if !self.in_column && self.input.unprocessed_slice().starts_with(&self.config.column_separator) {
                self.empty_line = false;
                self.emit_cell(sink);
                let len = self.config.column_separator.len();
                self.input.advance(len);
                self.current_pos += len as u64;
                continue;
            }

            // Rule 10: begin column.
            if !self.in_column {
                self.in_column = true;
                self.empty_line = false;
                if self.input.unprocessed_slice().starts_with(&self.config.quote) {
                    self.in_quote = true;
                    let len = self.config.quote.len();
                    self.input.advance(len);
                    self.current_pos += len as u64;
                }
                continue;
            }

            // Rule 11: doubled quote.
            if self.in_column
                && self.in_quote
                && self.input.unprocessed_slice().starts_with(&self.config.double_quote)
            {
                let quote = self.config.quote.clone();
                self.column.append(&quote);
                let len = self.config.double_quote.len();
                self.input.advance(len);
                self.current_pos += len as u64;
                continue;
            }

            // Rule 12: end of quoted column.
            if self.in_column
                && self.in_quote
                && self.input.unprocessed_slice().starts_with(&self.config.quote)
            {
                self.in_quote = false;
                self.in_column = false;
                let len = self.config.quote.len();
                self.input.advance(len);
                self.current_pos += len as u64;

                let rest = self.input.unprocessed_slice();
                let starts_line = rest.starts_with(&self.config.line_separator);
                let starts_column = rest.starts_with(&self.config.column_separator);
                if !rest.is_empty() && !starts_line && !starts_column {
                    self.terminal = true;
                    sink.on_error(ParseError::UnexpectedAfterQuote {
                        position: self.position(),
                        offending: rest[0],
                    });
                    return;
                }
                continue;
            }

            // Rule 13: end of unquoted column by look-ahead.
            if self.in_column && !self.in_quote {
                let slice = self.input.unprocessed_slice();
                if slice.is_empty()
                    || slice.starts_with(&self.config.line_separator)
                    || slice.starts_with(&self.config.column_separator)
                {
                    self.in_column = false;
                    continue;
                }
            }

            // Rule 14: bulk body read.
            if self.in_column && self.input.unprocessed() > 0 {
                let limit = self
                    .input
                    .unprocessed()
                    .saturating_sub(self.config.min_possible_buffer_reserve)
                    .min(self.column.free());

                if self.in_quote {
                    self.bulk_read_quoted(limit);
                } else {
                    if self.input.unprocessed_slice().starts_with(&self.config.quote) {
                        self.terminal = true;
                        sink.on_error(ParseError::UnexpectedQuoteInUnquoted {
                            position: self.position(),
                        });
                        return;
                    }
                    self.bulk_read_unquoted(limit);
                }
                continue;
            }

            // Rule 15: unterminated quote.
            if self.in_quote && self.input.unprocessed() == 0 && self.reader_empty {
                self.terminal = true;
                sink.on_error(ParseError::UnterminatedQuote {
                    position: self.position(),
                });
                return;
            }

            // Rule 16: unreachable.
            self.terminal = true;
            sink.on_error(ParseError::Unexpected {
                position: self.position(),
            });
            return;
        }
    }

    fn bulk_read_unquoted(&mut self, limit: usize) {
        let n = if limit <= 1 {
            self.input.unprocessed().min(1)
        } else {
            let (idx, which) = find_read_till_index(
                self.input.unprocessed_slice(),
                limit,
                &self.config.line_separator,
                &self.config.column_separator,
                &self.config.quote,
            );
            debug_assert!(which != Boundary::Quote || idx != 0, "caller must pre-check offset-0 quotes");
            idx
        };
        self.copy_bulk(n);
    }

    fn bulk_read_quoted(&mut self, limit: usize) {
        if limit <= 1 {
            self.copy_bulk(self.input.unprocessed().min(1));
            return;
        }
        let scan = find_read_till_index_quoted(
            self.input.unprocessed_slice(),
            limit,
            &self.config.quote,
            &self.config.line_separator,
        );
        let start_pos = self.current_pos;
        self.copy_bulk(scan.index);
        if scan.new_lines_seen > 0 {
            self.lines_processed += scan.new_lines_seen;
            if let Some(offset) = scan.last_line_end_offset {
                self.last_line_start_pos = start_pos + offset as u64;
            }
        }
    }

    fn copy_bulk(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        let bytes = &self.input.unprocessed_slice()[..n];
        self.column.append(bytes);
        self.input.advance(n);
        self.current_pos += n as u64;
    }

    fn emit_cell(&mut self, sink: &mut impl Sink) {
        let bytes = self.column.take(self.config.column_buffer_min_step_size);
        let text = String::from_utf8_lossy(&bytes).into_owned();
        sink.on_cell(text);
    }
}
