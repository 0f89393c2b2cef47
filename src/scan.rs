//! Bounded prefix-match and fast-skip scanners over the input buffer
//! (spec.md §4.2).
//!
//! These are pure functions: they never touch parser state, only the slice
//! and patterns handed to them. Multi-byte patterns are matched with
//! [`memchr::memmem`], generalizing the teacher crate's single-byte
//! `memchr`/`memchr3` scans to runtime-configured byte sequences.

use memchr::memmem;

/// Which delimiter (if any) [`find_read_till_index`] stopped at.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum Boundary {
    /// No delimiter was found before `limit`; the caller should bulk-copy
    /// `limit` bytes and continue.
    Limit,
    /// Stopped at the start of a line separator.
    Line,
    /// Stopped at the start of a column separator.
    Column,
    /// Stopped at the start of a quote.
    Quote,
}

/// Finds the first occurrence of `line_sep`, `col_sep`, or `quote` in `slice`,
/// used while scanning an unquoted field.
///
/// Returns the byte index of the first match and which pattern matched, or
/// `(limit, Boundary::Limit)` if none occurs before `limit`. A match at or
/// beyond `limit` is treated the same as no match: the caller only needs to
/// know it's safe to bulk-copy `limit` bytes.
pub(crate) fn find_read_till_index(
    slice: &[u8],
    limit: usize,
    line_sep: &[u8],
    col_sep: &[u8],
    quote: &[u8],
) -> (usize, Boundary) {
    let candidates = [
        (memmem::find(slice, line_sep), Boundary::Line),
        (memmem::find(slice, col_sep), Boundary::Column),
        (memmem::find(slice, quote), Boundary::Quote),
    ];
    candidates
        .into_iter()
        .filter_map(|(idx, which)| idx.map(|idx| (idx, which)))
        .filter(|(idx, _)| *idx < limit)
        .min_by_key(|(idx, _)| *idx)
        .unwrap_or((limit, Boundary::Limit))
}

/// Result of scanning inside a quoted field with [`find_read_till_index_quoted`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) struct QuotedScan {
    /// Byte index at which the scan stopped: either the start of `quote`, or
    /// `limit` if no closing quote was found in range.
    pub index: usize,
    /// Number of `line_sep` occurrences traversed while scanning (they're
    /// part of the cell's content but still count as line breaks for
    /// position bookkeeping).
    pub new_lines_seen: usize,
    /// Byte index just past the last `line_sep` traversed, if any.
    pub last_line_end_offset: Option<usize>,
}

/// Finds the next `quote` inside a quoted field, counting any `line_sep`
/// occurrences seen along the way.
///
/// Returns `limit` as the index if neither a closing quote nor further
/// progress can be made within it.
pub(crate) fn find_read_till_index_quoted(
    slice: &[u8],
    limit: usize,
    quote: &[u8],
    line_sep: &[u8],
) -> QuotedScan {
    let mut pos = 0usize;
    let mut new_lines_seen = 0usize;
    let mut last_line_end_offset = None;

    loop {
        let window = &slice[pos..];
        let quote_hit = memmem::find(window, quote);
        let line_hit = memmem::find(window, line_sep);

        let line_is_first = match (quote_hit, line_hit) {
            (Some(q), Some(l)) => l < q,
            (None, Some(_)) => true,
            _ => false,
        };

        if line_is_first {
            let l = line_hit.unwrap();
            pos += l + line_sep.len();
            new_lines_seen += 1;
            last_line_end_offset = Some(pos);
            if pos >= limit {
                return QuotedScan {
                    index: limit,
                    new_lines_seen,
                    last_line_end_offset,
                };
            }
            continue;
        }

        return match quote_hit {
            Some(q) => {
                let idx = pos + q;
                QuotedScan {
                    index: if idx < limit { idx } else { limit },
                    new_lines_seen,
                    last_line_end_offset,
                }
            }
            None => QuotedScan {
                index: limit,
                new_lines_seen,
                last_line_end_offset,
            },
        };
    }
}

/// Finds the next `line_sep` in `slice`, used only by the `fromLine`
/// skip-ahead path (rule 4).
pub(crate) fn find_read_till_line_separator_index(slice: &[u8], line_sep: &[u8]) -> Option<usize> {
    memmem::find(slice, line_sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_earliest_boundary() {
        let (idx, which) = find_read_till_index(b"abc,def\n\"", 100, b"\n", b",", b"\"");
        assert_eq!((idx, which), (3, Boundary::Column));
    }

    #[test]
    fn respects_limit() {
        let (idx, which) = find_read_till_index(b"abcdef,", 3, b"\n", b",", b"\"");
        assert_eq!((idx, which), (3, Boundary::Limit));
    }

    #[test]
    fn quoted_scan_counts_embedded_newlines() {
        let scan = find_read_till_index_quoted(b"ab\ncd\"", 100, b"\"", b"\n");
        assert_eq!(scan.index, 5);
        assert_eq!(scan.new_lines_seen, 1);
        assert_eq!(scan.last_line_end_offset, Some(3));
    }

    #[test]
    fn line_separator_scan() {
        assert_eq!(find_read_till_line_separator_index(b"a,b\nc,d", b"\n"), Some(3));
        assert_eq!(find_read_till_line_separator_index(b"a,b", b"\n"), None);
    }
}
