//! Infinite scroll over the post timeline.

pub mod pager;

pub use pager::{Applied, FeedPager, FeedSnapshot, PageOutcome, PageOutcomes, PageRequest, PagerConfig};
