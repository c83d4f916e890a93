//! The ordered list of [`FormatParser`]s used for detection.

use std::sync::{Arc, OnceLock};

use splitkit_core::ProgramId;

use crate::formats::{
    LiveSplitParser, LlanfairParser, SplitterZParser, TimeSplitTrackerParser, UrnParser,
    WSplitParser,
};
use crate::parser::FormatParser;

/// Priority-ordered set of format parsers, fixed at construction.
///
/// Earlier entries win: when bytes satisfy more than one parser, the first
/// registered one that returns a run decides the program.
pub struct FormatRegistry {
    parsers: Vec<Box<dyn FormatParser>>,
}

impl FormatRegistry {
    /// Create a registry from an ordered list of parsers.
    pub fn new(parsers: Vec<Box<dyn FormatParser>>) -> Self {
        Self { parsers }
    }

    /// The built-in registry covering every [`ProgramId`], in priority order.
    pub fn standard() -> Arc<FormatRegistry> {
        static STANDARD: OnceLock<Arc<FormatRegistry>> = OnceLock::new();
        STANDARD
            .get_or_init(|| {
                Arc::new(Self::new(vec![
                    Box::new(LlanfairParser::new()),
                    Box::new(UrnParser::new()),
                    Box::new(LiveSplitParser::new()),
                    Box::new(SplitterZParser::new()),
                    Box::new(TimeSplitTrackerParser::new()),
                    Box::new(WSplitParser::new()),
                ]))
            })
            .clone()
    }

    /// Programs in the order they are tried.
    pub fn supported_programs(&self) -> Vec<ProgramId> {
        self.parsers.iter().map(|p| p.program()).collect()
    }

    /// The parser registered for `program`, if any.
    pub fn get(&self, program: ProgramId) -> Option<&dyn FormatParser> {
        self.parsers
            .iter()
            .find(|p| p.program() == program)
            .map(|p| p.as_ref())
    }

    /// Iterate parsers in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn FormatParser> {
        self.parsers.iter().map(|p| p.as_ref())
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("programs", &self.supported_programs())
            .finish()
    }
}
