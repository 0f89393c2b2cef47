//! Configuration plumbing and derived constants (spec.md §4.5).

use crate::error::OptionsError;

/// Mutable builder for parser configuration.
///
/// Construct with [`Options::default()`], chain `with_*` calls, then call
/// [`Options::build()`] to validate and obtain an immutable [`ParserConfig`].
///
/// # Example
///
/// ```
/// use csv_stream::Options;
///
/// let config = Options::default()
///     .with_column_separator(b"\t")
///     .with_line_separator(b"\r\n")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Options {
    column_separator: Vec<u8>,
    line_separator: Vec<u8>,
    quote: Vec<u8>,
    from_line: usize,
    to_line: usize,
    reader_iterator_buffer_size: usize,
    column_buffer_min_step_size: usize,
    input_buffer_index_limit: usize,
    column_buffer_reserve: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            column_separator: b",".to_vec(),
            line_separator: b"\n".to_vec(),
            quote: b"\"".to_vec(),
            from_line: 0,
            to_line: usize::MAX,
            reader_iterator_buffer_size: 1024,
            column_buffer_min_step_size: 1024,
            input_buffer_index_limit: 1024,
            column_buffer_reserve: 64,
        }
    }
}

impl Options {
    /// Sets the byte sequence that separates cells within a row. Default: `,`.
    pub fn with_column_separator(mut self, sep: impl Into<Vec<u8>>) -> Self {
        self.column_separator = sep.into();
        self
    }

    /// Sets the byte sequence that separates rows. Default: `\n`.
    pub fn with_line_separator(mut self, sep: impl Into<Vec<u8>>) -> Self {
        self.line_separator = sep.into();
        self
    }

    /// Sets the byte sequence that begins and ends a quoted cell. Default: `"`.
    pub fn with_quote(mut self, quote: impl Into<Vec<u8>>) -> Self {
        self.quote = quote.into();
        self
    }

    /// Sets the first line index to emit, inclusive. Lines are numbered from
    /// 0 in input order. Default: `0`.
    pub fn with_from_line(mut self, from_line: usize) -> Self {
        self.from_line = from_line;
        self
    }

    /// Sets the first line index *not* to emit, exclusive. Default: unbounded.
    pub fn with_to_line(mut self, to_line: usize) -> Self {
        self.to_line = to_line;
        self
    }

    /// Sets the target chunk size requested from the byte source. Default: `1024`.
    pub fn with_reader_buffer_size(mut self, size: usize) -> Self {
        self.reader_iterator_buffer_size = size;
        self
    }

    /// Sets the minimum growth increment for the column buffer. Default: `1024`.
    pub fn with_column_buffer_min_step_size(mut self, size: usize) -> Self {
        self.column_buffer_min_step_size = size;
        self
    }

    /// Sets the threshold of consumed bytes at which the input buffer is
    /// compacted. Default: `1024`.
    pub fn with_input_buffer_index_limit(mut self, limit: usize) -> Self {
        self.input_buffer_index_limit = limit;
        self
    }

    /// Sets the minimum free tail kept in the column buffer before growth is
    /// triggered. Default: `64`.
    pub fn with_column_buffer_reserve(mut self, reserve: usize) -> Self {
        self.column_buffer_reserve = reserve;
        self
    }

    /// Validates this configuration and produces an immutable [`ParserConfig`].
    ///
    /// Rejects configurations the spec leaves as undefined behavior (§9, Open
    /// Question (a)): any of the three delimiters empty, one delimiter a
    /// strict prefix of another, or `lineSeparator`/`columnSeparator`
    /// beginning with `quote`. Also rejects `fromLine > toLine`.
    pub fn build(self) -> Result<ParserConfig, OptionsError> {
        if self.column_separator.is_empty() {
            return Err(OptionsError::EmptyDelimiter {
                field: "columnSeparator",
            });
        }
        if self.line_separator.is_empty() {
            return Err(OptionsError::EmptyDelimiter {
                field: "lineSeparator",
            });
        }
        if self.quote.is_empty() {
            return Err(OptionsError::EmptyDelimiter { field: "quote" });
        }
        if self.from_line > self.to_line {
            return Err(OptionsError::InvalidLineRange {
                from_line: self.from_line,
                to_line: self.to_line,
            });
        }

        let double_quote = [self.quote.as_slice(), self.quote.as_slice()].concat();
        let delimiters: [(&'static str, &[u8]); 3] = [
            ("columnSeparator", &self.column_separator),
            ("lineSeparator", &self.line_separator),
            ("quote", &self.quote),
        ];
        for i in 0..delimiters.len() {
            for j in 0..delimiters.len() {
                if i == j {
                    continue;
                }
                let (name_a, a) = delimiters[i];
                let (name_b, b) = delimiters[j];
                if a.len() < b.len() && b.starts_with(a) {
                    return Err(OptionsError::AmbiguousDelimiters {
                        first: name_a,
                        second: name_b,
                    });
                }
            }
        }
        if starts_with(&self.line_separator, &self.quote) {
            return Err(OptionsError::SeparatorStartsWithQuote {
                field: "lineSeparator",
            });
        }
        if starts_with(&self.column_separator, &self.quote) {
            return Err(OptionsError::SeparatorStartsWithQuote {
                field: "columnSeparator",
            });
        }

        let min_possible_buffer_reserve = [
            self.column_separator.len(),
            self.line_separator.len(),
            double_quote.len(),
            1,
        ]
        .into_iter()
        .max()
        .unwrap();

        Ok(ParserConfig {
            column_separator: self.column_separator,
            line_separator: self.line_separator,
            quote: self.quote,
            double_quote,
            from_line: self.from_line,
            to_line: self.to_line,
            reader_iterator_buffer_size: self.reader_iterator_buffer_size,
            column_buffer_min_step_size: self.column_buffer_min_step_size,
            input_buffer_index_limit: self.input_buffer_index_limit,
            column_buffer_reserve: self.column_buffer_reserve,
            min_possible_buffer_reserve,
        })
    }
}

fn starts_with(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.len() >= needle.len() && &haystack[..needle.len()] == needle
}

/// Validated, immutable configuration produced by [`Options::build()`].
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ParserConfig {
    pub(crate) column_separator: Vec<u8>,
    pub(crate) line_separator: Vec<u8>,
    pub(crate) quote: Vec<u8>,
    pub(crate) double_quote: Vec<u8>,
    pub(crate) from_line: usize,
    pub(crate) to_line: usize,
    pub(crate) reader_iterator_buffer_size: usize,
    pub(crate) column_buffer_min_step_size: usize,
    pub(crate) input_buffer_index_limit: usize,
    pub(crate) column_buffer_reserve: usize,
    pub(crate) min_possible_buffer_reserve: usize,
}
