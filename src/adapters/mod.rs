//! Four equivalent view adapters over the parser core (spec.md §4.4).

pub mod nested;
pub mod object;
pub mod row;
pub mod token;

pub use nested::{NestedRows, RowCells};
pub use object::Objects;
pub use row::{Rows, RowsWithRanges};
pub use token::{Token, Tokens};
