//! Retrieval of article extracts for a query

pub mod search;

pub use search::{find_extracts, related_links};
