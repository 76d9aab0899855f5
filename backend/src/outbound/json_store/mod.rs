//! File-backed adapters for the visited places and links collections, plus
//! the finance seed reader.
//!
//! Used when no database URL is configured. Each collection is a single JSON
//! array under the data directory (`instance/` by default).

mod collection;
mod json_finance_seed_source;
mod json_link_repository;
mod json_visited_repository;

pub use collection::{JsonCollection, JsonStoreError, MissingFile};
pub use json_finance_seed_source::JsonFinanceSeedSource;
pub use json_link_repository::{JsonLinkRepository, LINK_POSITIONS_FILE, LINKS_FILE};
pub use json_visited_repository::{JsonVisitedRepository, VISITED_FILE};
