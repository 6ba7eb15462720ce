//! RFQ line matching
//!
//! Splits RFQ text into line items, extracts quantities and ranks
//! catalog matches for each line

mod matcher;
mod quantity;
mod types;

pub use matcher::{split_rfq, RfqMatcher, TOP_K};
pub use quantity::extract_quantity;
pub use types::{MatchResult, RfqLine, RfqMatchReport};
