//! A resumable, bounded-memory CSV parser for asynchronous byte sources.
//!
//! # Primary Focuses
//!
//! `csv_stream` is a pull-based parser core built around a single resumable
//! state machine. It never buffers more of the input than it needs to: the
//! input buffer is a sliding window that's refilled from the byte source and
//! compacted as it's consumed, and the column buffer backing the cell
//! currently being assembled is freed and reallocated fresh every time a
//! cell is emitted. Four equivalent view adapters sit on top of the same
//! core, so picking one over another is purely a matter of the shape your
//! caller wants, not a performance trade-off.
//!
//! - **Bounded memory**: steady-state memory is `O(chunk size + longest cell)`,
//!   independent of total input size.
//! - **Multi-byte delimiters**: `columnSeparator`, `lineSeparator`, and
//!   `quote` are each arbitrary non-empty byte sequences, not single
//!   characters.
//! - **Resumable**: the core suspends only while awaiting a chunk from the
//!   byte source; everything else runs to the next emission without
//!   yielding.
//! - **Positioned errors**: syntax faults report `(line, character)`.
//!
//! # Supported Features
//!
//! `csv_stream` implements RFC 4180-style CSV with user-chosen delimiters:
//!
//! - Doubled-quote escaping (`""` inside a quoted cell means one literal
//!   quote) is always recognized.
//! - A UTF-8 BOM at the absolute start of the stream is consumed silently.
//! - Blank lines between data rows are skipped without emission. A row
//!   consisting only of column separators (e.g. `,,`) is *not* blank and is
//!   preserved as empty-string cells.
//! - A trailing line separator does not produce an extra empty row.
//!
//! # Examples
//!
//! ```
//! use csv_stream::{rows, Options};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut rows = rows(b"a,b,c\n1,2,3\n".as_slice(), Options::default())?;
//! while let Some(row) = rows.next().await {
//!     let row = row?;
//!     println!("{row:?}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Or, avoiding the per-row `Vec` allocation by pulling cells lazily:
//!
//! ```
//! use csv_stream::{nested_rows, Options};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut rows = nested_rows(b"a,b,c\n1,2,3\n".as_slice(), Options::default())?;
//! while let Some(mut cells) = rows.next().await {
//!     while let Some(cell) = cells.next().await {
//!         print!("{} ", cell?);
//!     }
//!     println!();
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Crate modules
//!
//! * **[`options`]**: configuration and derived constants (§4.5).
//! * **[`error`]**: [`ParseError`] and [`OptionsError`].
//! * **[`sink`]**: the [`sink::Sink`] trait and the low-level [`Reader`]
//!   entry point, for integrations that want callbacks instead of an
//!   iterator.
//! * **[`adapters`]**: the four view adapters: [`Tokens`], [`Rows`],
//!   [`NestedRows`], [`Objects`].

#![deny(missing_docs)]

mod buffer;
mod engine;
mod scan;

pub mod adapters;
pub mod error;
pub mod options;
mod reader;
pub mod sink;
mod stats;

pub use adapters::{NestedRows, Objects, RowCells, Rows, RowsWithRanges, Token, Tokens};
pub use error::{OptionsError, ParseError, Position};
pub use options::Options;
pub use reader::Reader;
pub use stats::Stats;

use tokio::io::AsyncRead;

/// Opens a flat token stream: cells and row boundaries in strict input order.
///
/// See the [crate-level documentation](crate) for more details.
pub fn tokens<R: AsyncRead + Unpin>(
    byte_source: R,
    options: Options,
) -> Result<Tokens<R>, OptionsError> {
    Ok(Tokens::new(byte_source, options.build()?))
}

/// Opens a row stream: one `Vec<String>` per row.
///
/// See the [crate-level documentation](crate) for more details.
pub fn rows<R: AsyncRead + Unpin>(
    byte_source: R,
    options: Options,
) -> Result<Rows<R>, OptionsError> {
    Ok(Rows::new(byte_source, options.build()?))
}

/// Opens a lazy row stream: one per-row cell iterator per row, avoiding the
/// per-row buffering [`rows`] does.
///
/// See the [crate-level documentation](crate) for more details.
pub fn nested_rows<R: AsyncRead + Unpin>(
    byte_source: R,
    options: Options,
) -> Result<NestedRows<R>, OptionsError> {
    Ok(NestedRows::new(byte_source, options.build()?))
}

/// Opens a header-keyed object stream: the first row becomes the header,
/// each subsequent row a `header[i] -> row[i]` map.
///
/// See the [crate-level documentation](crate) for more details.
pub fn objects<R: AsyncRead + Unpin>(
    byte_source: R,
    options: Options,
) -> Result<Objects<R>, OptionsError> {
    Ok(Objects::new(byte_source, options.build()?))
}
