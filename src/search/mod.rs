//! Search tools: Google Custom Search, DuckDuckGo web search, and Wikipedia.
//!
//! Each tool returns plain text and degrades failures to diagnostic strings
//! at its boundary.

mod duckduckgo;
mod google;
mod wikipedia;

pub use duckduckgo::DuckDuckGoSearch;
pub use google::GoogleSearch;
pub use wikipedia::WikipediaClient;
