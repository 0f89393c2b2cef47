//! The low-level, class-style entry point (spec.md §6): manual read/pause
//! plus the four callback hooks, for integrations that don't want an
//! iterator.

use tokio::io::AsyncRead;

use crate::engine::Engine;
use crate::options::ParserConfig;
use crate::sink::Sink;
use crate::stats::Stats;

/// Drives an [`Engine`] against a caller-supplied [`Sink`].
///
/// Most callers want [`crate::tokens`], [`crate::rows`], [`crate::nested_rows`],
/// or [`crate::objects`] instead: `Reader` is for integrations that want to
/// receive `on_cell`/`on_row_end`/`on_end`/`on_error` directly rather than
/// pulling from an iterator.
///
/// # Example
///
/// ```
/// use csv_stream::{Options, Reader};
/// use csv_stream::sink::Sink;
/// use csv_stream::error::ParseError;
///
/// #[derive(Default)]
/// struct Collector {
///     cells: Vec<String>,
///     paused: bool,
/// }
///
/// impl Sink for Collector {
///     fn on_cell(&mut self, text: String) {
///         self.cells.push(text);
///     }
///     fn on_row_end(&mut self) {}
///     fn on_end(&mut self) {
///         self.paused = true;
///     }
///     fn on_error(&mut self, _err: ParseError) {
///         self.paused = true;
///     }
///     fn is_paused(&self) -> bool {
///         self.paused
///     }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let config = Options::default().build().unwrap();
/// let mut reader = Reader::new(std::io::Cursor::new(b"a,b\n".to_vec()), config, Collector::default());
/// reader.read().await;
/// assert_eq!(reader.sink().cells, vec!["a", "b"]);
/// # }
/// ```
pub struct Reader<R, K> {
    engine: Engine<R>,
    sink: K,
}

impl<R: AsyncRead + Unpin, K: Sink> Reader<R, K> {
    /// Builds a reader from a validated [`ParserConfig`] and a `Sink`.
    pub fn new(byte_source: R, config: ParserConfig, sink: K) -> Self {
        Reader {
            engine: Engine::new(byte_source, config),
            sink,
        }
    }

    /// Resumes the parser loop until the sink pauses it again or the parse
    /// reaches a terminal state.
    pub async fn read(&mut self) {
        self.engine.run(&mut self.sink).await;
    }

    /// Observability counters accumulated so far.
    pub fn stats(&self) -> Stats {
        self.engine.stats()
    }

    /// Absolute byte offset the parser has consumed so far.
    pub(crate) fn current_pos(&self) -> u64 {
        self.engine.current_pos()
    }

    /// Shared access to the sink (e.g. to inspect buffered state between
    /// `read()` calls).
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Mutable access to the sink.
    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }
}
