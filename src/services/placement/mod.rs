pub mod category;
pub mod homepage;
pub mod search;

pub use category::CategoryAssembler;
pub use homepage::HomepageAssembler;
pub use search::SearchAssembler;

use crate::models::Listing;
use std::cmp::Ordering;

/// A listing paired with its computed display score.
#[derive(Debug, Clone)]
pub(crate) struct Scored {
    pub listing: Listing,
    pub score: f64,
}

/// Stable descending sort; ties keep input order, NaN treated as equal.
pub(crate) fn sort_desc_by_score(items: &mut [Scored]) {
    items.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}
