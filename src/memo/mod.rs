//! Memo Module
//!
//! A bounded, time-limited memoization layer over an expensive keyed
//! computation such as fetching a web page.

mod clock;
mod entry;
mod fetch;
mod order;
mod stats;
mod ttl;

// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::MemoEntry;
pub use fetch::{Fetch, HttpFetcher};
pub use order::InsertionOrder;
pub use stats::MemoStats;
pub use ttl::TtlMemo;

/// Memoized page fetcher shared by the HTTP layer.
pub type PageMemo = TtlMemo<std::sync::Arc<dyn Fetch<Output = String>>>;
