//! The sliding input buffer and the growable column buffer (spec.md §3).

/// A sliding window over bytes pulled from the byte source.
///
/// Bytes before `read_index` have been consumed by the parser and are
/// reclaimed by [`InputBuffer::compact`].
pub(crate) struct InputBuffer {
    bytes: Vec<u8>,
    read_index: usize,
}

impl InputBuffer {
    pub(crate) fn new() -> Self {
        InputBuffer {
            bytes: Vec::new(),
            read_index: 0,
        }
    }

    /// Bytes available to the parser that haven't been consumed yet.
    pub(crate) fn unprocessed(&self) -> usize {
        self.bytes.len() - self.read_index
    }

    pub(crate) fn unprocessed_slice(&self) -> &[u8] {
        &self.bytes[self.read_index..]
    }

    pub(crate) fn read_index(&self) -> usize {
        self.read_index
    }

    pub(crate) fn append(&mut self, chunk: &[u8]) {
        self.bytes.extend_from_slice(chunk);
    }

    /// Marks `n` unprocessed bytes as consumed.
    pub(crate) fn advance(&mut self, n: usize) {
        debug_assert!(n <= self.unprocessed());
        self.read_index += n;
    }

    /// Drops the consumed prefix, copying the remaining bytes forward to the
    /// start of the backing vector.
    pub(crate) fn compact(&mut self) {
        self.bytes.drain(..self.read_index);
        self.read_index = 0;
    }
}

/// A growable buffer holding the raw bytes of the cell currently being
/// assembled.
///
/// At least `reserve` bytes of free tail are kept available before further
/// appending via geometric growth in `step`-sized increments (see
/// [`ColumnBuffer::grow`]). The buffer is never shrunk in place: once a cell
/// is emitted, [`ColumnBuffer::take`] swaps in a fresh, empty buffer so large
/// cells don't keep their backing allocation alive.
pub(crate) struct ColumnBuffer {
    bytes: Vec<u8>,
}

impl ColumnBuffer {
    pub(crate) fn new(step: usize) -> Self {
        ColumnBuffer {
            bytes: Vec::with_capacity(step),
        }
    }

    pub(crate) fn free(&self) -> usize {
        self.bytes.capacity() - self.bytes.len()
    }

    pub(crate) fn append(&mut self, data: &[u8]) {
        self.bytes.extend_from_slice(data);
    }

    pub(crate) fn grow(&mut self, step: usize) {
        // `Vec::reserve` guarantees `capacity >= len + additional`, which is
        // relative to `len`, not `capacity`; once `free() >= step` it's a
        // no-op. Pad the request by `free()` so capacity itself grows by at
        // least `step`.
        self.bytes.reserve(self.free() + step);
    }

    /// Removes the accumulated bytes, replacing the buffer with a fresh one
    /// pre-sized to `step`.
    pub(crate) fn take(&mut self, step: usize) -> Vec<u8> {
        core::mem::replace(&mut self.bytes, Vec::with_capacity(step))
    }
}
