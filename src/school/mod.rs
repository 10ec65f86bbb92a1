//! The school dataset: records, search, comparison and routing.

mod catalog;
pub mod compare;
mod filter;
mod record;

pub use catalog::{Catalog, round_km};
pub use compare::{Comparison, compare};
pub use filter::{KNOWN_LEVELS, Page, SearchHit, SearchQuery};
pub use record::{School, or_na, parse_schools};
