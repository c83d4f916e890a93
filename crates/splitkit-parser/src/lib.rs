//! # splitkit-parser
//!
//! Format detection and decoding for speedrun timer split files.
//!
//! Given the raw bytes of a split file, this crate works out which timer
//! program wrote it and decodes it into a normalized [`RunResult`]:
//!
//! - Llanfair (Java-serialized binary)
//! - Urn (JSON)
//! - LiveSplit (XML)
//! - SplitterZ, Time Split Tracker, WSplit (line-oriented text)
//!
//! Results are memoized per [`ParseMode`](splitkit_core::ParseMode) on the
//! [`SplitFile`] handle, so asking twice never decodes twice.
//!
//! ## Quick start
//!
//! ```no_run
//! use splitkit_core::ParseMode;
//! use splitkit_parser::{ParseCoordinator, SplitFile};
//! use std::path::Path;
//!
//! let coordinator = ParseCoordinator::standard();
//! let mut file = SplitFile::open(Path::new("run.lss"), 25 * 1024 * 1024).unwrap();
//! let run = coordinator.parse(&mut file, ParseMode::Full, None).unwrap();
//! if let Some(program) = run.program {
//!     println!("{program}: {} segments, {:?}", run.segments.len(), run.total_time);
//! }
//! ```

pub mod cache;
pub mod coordinator;
pub mod cursor;
pub mod error;
pub mod formats;
pub mod parser;
pub mod registry;
pub mod segment;
pub mod time;
pub mod types;

// Re-export key types at crate root for convenience.
pub use cache::{ParseCache, SplitFile};
pub use coordinator::{sum_of_best, total_time, ParseCoordinator};
pub use error::DecodeError;
pub use parser::{Depth, FormatParser};
pub use registry::FormatRegistry;
pub use segment::{SegmentDecoder, SegmentLayout, SegmentRecord, TextFields, TimeBasis, Timeline};
pub use types::{Offset, ParsedRun, RunResult, Segment};
