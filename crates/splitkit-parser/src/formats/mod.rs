//! One [`FormatParser`](crate::FormatParser) per supported timer program.

pub mod livesplit;
pub mod llanfair;
pub mod splitterz;
pub mod time_split_tracker;
pub mod urn;
pub mod wsplit;

pub use livesplit::LiveSplitParser;
pub use llanfair::LlanfairParser;
pub use splitterz::SplitterZParser;
pub use time_split_tracker::TimeSplitTrackerParser;
pub use urn::UrnParser;
pub use wsplit::WSplitParser;
