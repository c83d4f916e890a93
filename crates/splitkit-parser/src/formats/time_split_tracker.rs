//! Time Split Tracker split files.
//!
//! Tab-separated text: line one is `attempts<TAB>offset`, line two starts
//! with the run title, and each later line is
//! `name<TAB>best_segment<TAB>cumulative[<TAB>...]` with decimal seconds.

use splitkit_core::ProgramId;

use crate::error::DecodeError;
use crate::parser::{settle, Depth, FormatParser};
use crate::segment::{line_at, SegmentDecoder, SegmentLayout, TextFields, TimeBasis, Timeline};
use crate::time;
use crate::types::ParsedRun;

const FIELDS: TextFields = TextFields {
    separator: '\t',
    count: 3,
    right_aligned: false,
    name: 0,
    time: 2,
    best: 1,
    name_escape: None,
};

/// [`FormatParser`] for Time Split Tracker's tab-separated layout.
#[derive(Debug, Default)]
pub struct TimeSplitTrackerParser;

impl TimeSplitTrackerParser {
    pub fn new() -> Self {
        Self
    }
}

impl FormatParser for TimeSplitTrackerParser {
    fn program(&self) -> ProgramId {
        ProgramId::TimeSplitTracker
    }

    fn parse(&self, bytes: &[u8], depth: Depth) -> splitkit_core::Result<Option<ParsedRun>> {
        settle(self.program(), decode(bytes, depth))
    }
}

fn decode(bytes: &[u8], depth: Depth) -> Result<ParsedRun, DecodeError> {
    let (first, offset) = line_at(bytes, 0)?;
    let (attempts, start_offset) = first
        .split_once('\t')
        .ok_or_else(|| DecodeError::mismatch("first line is not 'attempts<TAB>offset'"))?;
    let attempts = attempts
        .trim()
        .parse::<u32>()
        .map_err(|_| DecodeError::mismatch("attempt count is not a number"))?;
    let start_offset = start_offset.split('\t').next().unwrap_or_default();
    let start_offset = time::offset(start_offset).map_err(DecodeError::mismatch)?;

    if offset >= bytes.len() {
        return Err(DecodeError::mismatch("missing title line"));
    }
    let (title_line, mut offset) = line_at(bytes, offset)?;
    let title = title_line.split('\t').next().unwrap_or_default().trim();

    let decoder = SegmentDecoder::new(SegmentLayout::Delimited(FIELDS), depth);
    let mut timeline = Timeline::new(TimeBasis::Cumulative);
    while offset < bytes.len() {
        let (line, next) = line_at(bytes, offset)?;
        if !line.trim().is_empty() {
            let (record, _) = decoder.decode(bytes, offset)?;
            timeline.push(record, offset)?;
        }
        offset = next;
    }

    if timeline.is_empty() {
        return Err(DecodeError::mismatch("no segment lines"));
    }

    Ok(ParsedRun {
        name: Some(title.to_string()).filter(|t| !t.is_empty()),
        attempts: Some(attempts),
        offset: Some(start_offset),
        segments: timeline.into_segments(),
        ..ParsedRun::default()
    })
}
