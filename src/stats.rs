//! Purely additive observability counters (spec.md §3, "Stats counter").

/// Counters incremented by the parser core for observability.
///
/// Every field is monotonically non-decreasing for the lifetime of a
/// [`Reader`](crate::reader::Reader); none of them affect parsing behavior.
#[derive(Copy, Clone, Eq, PartialEq, Default, Debug)]
pub struct Stats {
    /// Number of times the byte source was polled for a chunk.
    pub reads: u64,
    /// Number of times the input buffer was compacted (rule 2).
    pub input_buffer_shrinks: u64,
    /// Number of times the column buffer was grown (rule 3).
    pub column_buffer_expands: u64,
}
