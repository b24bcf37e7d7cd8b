pub mod adapter;
pub mod feed_loop;
pub mod frame;
pub mod synthetic;

pub use adapter::{FeedReading, FeedStats, VibeFeedAdapter, VIBE_UPDATE_EVENT};
pub use feed_loop::{FeedController, FeedEvent};
pub use frame::{VibeFrame, Zone};
pub use synthetic::SyntheticVibeSource;
