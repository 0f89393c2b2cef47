//! The push-style callback surface the engine drives, and the single-slot
//! mailbox that bridges it to the pull-style adapters (spec.md §4.4, §9).

use crate::error::ParseError;

/// Capability set a parser core emission can land on: cell, row-end, end, or
/// error, spec.md §9's "polymorphism over the capability set
/// `{column-emit, row-emit, end-emit, error-emit}`", realized as a trait
/// rather than an inheritance hierarchy.
///
/// [`Engine::run`](crate::engine::Engine::run) is generic over `Sink`: the
/// four view adapters and the low-level [`Reader`](crate::reader::Reader)
/// each supply their own implementation.
pub trait Sink {
    /// A cell was fully decoded.
    fn on_cell(&mut self, text: String);
    /// The current row ended.
    fn on_row_end(&mut self);
    /// The stream is exhausted; no further cells or rows will be emitted.
    fn on_end(&mut self);
    /// A syntax fault was detected. Terminal: no further callbacks follow.
    fn on_error(&mut self, err: ParseError);
    /// Whether the engine loop should return control to the caller before
    /// its next iteration.
    ///
    /// Adapters set this after storing one emission in their mailbox; the
    /// engine checks it at the top of the loop (the "latch pause" of
    /// spec.md's glossary) so at most one emission is ever buffered ahead of
    /// the consumer.
    fn is_paused(&self) -> bool;
}

/// One event emitted by the parser core.
#[derive(Clone, Eq, PartialEq, Debug)]
pub(crate) enum Event {
    Cell(String),
    RowEnd,
    End,
}

/// The one-slot mailbox discipline shared by every view adapter: store at
/// most one pending emission, and pause the engine the moment one lands.
///
/// Once an error or [`Event::End`] has been recorded, the mailbox stays
/// latched: further engine progress isn't possible on a terminal
/// [`Reader`](crate::reader::Reader) anyway, but this also means a
/// already-delivered terminal outcome is never silently lost if `next()` is
/// called again after exhaustion.
pub(crate) struct Mailbox {
    slot: Option<Event>,
    error: Option<ParseError>,
    paused: bool,
    done: bool,
}

impl Mailbox {
    pub(crate) fn new() -> Self {
        Mailbox {
            slot: None,
            error: None,
            paused: false,
            done: false,
        }
    }

    /// Clears the pause latch so the engine resumes on the next `run()` call.
    pub(crate) fn unpause(&mut self) {
        self.paused = false;
    }

    /// Takes the pending emission, if any.
    pub(crate) fn take_event(&mut self) -> Option<Event> {
        self.slot.take()
    }

    /// Takes the pending error, if any.
    pub(crate) fn take_error(&mut self) -> Option<ParseError> {
        self.error.take()
    }

    pub(crate) fn is_done(&self) -> bool {
        self.done
    }
}

impl Sink for Mailbox {
    fn on_cell(&mut self, text: String) {
        self.slot = Some(Event::Cell(text));
        self.paused = true;
    }

    fn on_row_end(&mut self) {
        self.slot = Some(Event::RowEnd);
        self.paused = true;
    }

    fn on_end(&mut self) {
        self.slot = Some(Event::End);
        self.paused = true;
        self.done = true;
    }

    fn on_error(&mut self, err: ParseError) {
        self.error = Some(err);
        self.paused = true;
        self.done = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}
