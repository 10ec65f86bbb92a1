//! Configuration section definitions.
//!
//! Each module corresponds to a section in `schoolfinder.toml`:
//!
//! | Module   | TOML Section | Purpose                                |
//! |----------|--------------|----------------------------------------|
//! | `cache`  | `[cache]`    | Local dataset cache                    |
//! | `search` | `[search]`   | Result paging and the nearby marker    |
//! | `serve`  | `[serve]`    | JSON HTTP API                          |
//! | `source` | `[source]`   | Dataset and geocoder endpoints         |

mod cache;
mod search;
mod serve;
mod source;

pub use cache::CacheConfig;
pub use search::SearchConfig;
pub use serve::ServeConfig;
pub use source::SourceConfig;
