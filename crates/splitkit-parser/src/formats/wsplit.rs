//! WSplit split files.
//!
//! ```text
//! Title=Super Mario 64 16 Star
//! Attempts=143
//! Offset=0
//! Size=152,25
//! Bob-omb Battlefield,0,65.3,62.1
//! Icons="",""
//! ```

use splitkit_core::ProgramId;

use crate::error::DecodeError;
use crate::parser::{settle, Depth, FormatParser};
use crate::segment::{line_at, SegmentDecoder, SegmentLayout, TextFields, TimeBasis, Timeline};
use crate::types::{Offset, ParsedRun};

const HEADER_KEYS: &[&str] = &["Title", "Attempts", "Offset", "Size", "Icons"];

/// `name,old_time,cumulative,best_segment`, split from the right.
const FIELDS: TextFields = TextFields {
    separator: ',',
    count: 4,
    right_aligned: true,
    name: 0,
    time: 2,
    best: 3,
    name_escape: None,
};

/// [`FormatParser`] for WSplit's key/value plus record layout.
#[derive(Debug, Default)]
pub struct WSplitParser;

impl WSplitParser {
    pub fn new() -> Self {
        Self
    }
}

impl FormatParser for WSplitParser {
    fn program(&self) -> ProgramId {
        ProgramId::WSplit
    }

    fn parse(&self, bytes: &[u8], depth: Depth) -> splitkit_core::Result<Option<ParsedRun>> {
        settle(self.program(), decode(bytes, depth))
    }
}

fn header_entry(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    HEADER_KEYS
        .contains(&key.trim())
        .then(|| (key.trim(), value.trim()))
}

fn decode(bytes: &[u8], depth: Depth) -> Result<ParsedRun, DecodeError> {
    let (first, mut offset) = line_at(bytes, 0)?;
    let title = match header_entry(first) {
        Some(("Title", title)) => title.to_string(),
        _ => return Err(DecodeError::mismatch("first line is not 'Title='")),
    };

    let mut attempts = None;
    let mut start_offset = None;
    let decoder = SegmentDecoder::new(SegmentLayout::Delimited(FIELDS), depth);
    let mut timeline = Timeline::new(TimeBasis::Cumulative);

    while offset < bytes.len() {
        let (line, next) = line_at(bytes, offset)?;
        match header_entry(line) {
            Some(("Attempts", value)) => {
                let count = value.parse::<u32>().map_err(|_| {
                    DecodeError::corrupt(offset, format!("bad Attempts '{value}'"))
                })?;
                attempts = Some(count);
            }
            Some(("Offset", value)) => {
                let millis = value
                    .parse::<i64>()
                    .ok()
                    .and_then(Offset::from_millis)
                    .ok_or_else(|| DecodeError::corrupt(offset, format!("bad Offset '{value}'")))?;
                start_offset = Some(millis);
            }
            Some(_) => {}
            None if line.trim().is_empty() => {}
            None => {
                let (record, _) = decoder.decode(bytes, offset)?;
                timeline.push(record, offset)?;
            }
        }
        offset = next;
    }

    Ok(ParsedRun {
        name: Some(title).filter(|t| !t.is_empty()),
        attempts,
        offset: start_offset,
        segments: timeline.into_segments(),
        ..ParsedRun::default()
    })
}
