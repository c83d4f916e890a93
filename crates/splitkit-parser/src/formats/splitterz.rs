//! SplitterZ split files.
//!
//! ```text
//! Super Mario 64 16 Star,143
//! Bob-omb Battlefield,0:01:05.30,0:01:02.10
//! Whomp's Fortress,0:02:40.00,0:01:30.00
//! ```
//!
//! The first line holds the title and attempt count; every later line is
//! `name,cumulative,best_segment`. SplitterZ writes `‡` for commas in names.

use splitkit_core::ProgramId;

use crate::error::DecodeError;
use crate::parser::{settle, Depth, FormatParser};
use crate::segment::{line_at, SegmentDecoder, SegmentLayout, TextFields, TimeBasis, Timeline};
use crate::types::ParsedRun;

const FIELDS: TextFields = TextFields {
    separator: ',',
    count: 3,
    right_aligned: false,
    name: 0,
    time: 1,
    best: 2,
    name_escape: Some("‡"),
};

/// [`FormatParser`] for SplitterZ's comma-separated layout.
#[derive(Debug, Default)]
pub struct SplitterZParser;

impl SplitterZParser {
    pub fn new() -> Self {
        Self
    }
}

impl FormatParser for SplitterZParser {
    fn program(&self) -> ProgramId {
        ProgramId::SplitterZ
    }

    fn parse(&self, bytes: &[u8], depth: Depth) -> splitkit_core::Result<Option<ParsedRun>> {
        settle(self.program(), decode(bytes, depth))
    }
}

fn decode(bytes: &[u8], depth: Depth) -> Result<ParsedRun, DecodeError> {
    let (header, mut offset) = line_at(bytes, 0)?;
    let mut header_fields = header.split(',');
    let title = header_fields.next().unwrap_or_default().replace('‡', ",");
    let attempts = header_fields
        .next()
        .and_then(|a| a.trim().parse::<u32>().ok())
        .ok_or_else(|| DecodeError::mismatch("header is not 'title,attempts'"))?;

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
        name: Some(title.trim().to_string()).filter(|t| !t.is_empty()),
        attempts: Some(attempts),
        segments: timeline.into_segments(),
        ..ParsedRun::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const SAMPLE: &str = "Super Mario 64 16 Star,143\r\n\
        Bob-omb Battlefield,0:01:05.30,0:01:02.10\r\n\
        Whomp's Fortress,0:02:40.00,0:01:30.00\r\n";

    #[test]
    fn decodes_sample() {
        let run = SplitterZParser.parse(SAMPLE.as_bytes(), Depth::Full).unwrap().unwrap();
        assert_eq!(run.name.as_deref(), Some("Super Mario 64 16 Star"));
        assert_eq!(run.attempts, Some(143));
        assert_eq!(run.segments.len(), 2);
        assert_eq!(run.segments[0].duration, Duration::from_millis(65_300));
        assert_eq!(run.segments[1].duration, Duration::from_millis(94_700));
        assert_eq!(run.segments[0].best, Some(Duration::from_millis(62_100)));
    }

    #[test]
    fn escaped_commas_in_names() {
        let text = "Hi‡ there,1\nOne‡ Two,10.0,9.0\n";
        let run = SplitterZParser.parse(text.as_bytes(), Depth::Full).unwrap().unwrap();
        assert_eq!(run.name.as_deref(), Some("Hi, there"));
        assert_eq!(run.segments[0].name, "One, Two");
    }

    #[test]
    fn header_only_is_no_match() {
        assert!(SplitterZParser.parse(b"Title,3\n", Depth::Full).unwrap().is_none());
    }

    #[test]
    fn non_numeric_attempts_is_no_match() {
        let text = b"Title,lots\nA,1.0,1.0\n";
        assert!(SplitterZParser.parse(text, Depth::Full).unwrap().is_none());
    }

    #[test]
    fn wsplit_file_is_no_match() {
        let text = b"Title=Game\nAttempts=3\nOffset=0\nSize=152,25\nA,0,10.5,9.0\n";
        assert!(SplitterZParser.parse(text, Depth::Full).unwrap().is_none());
    }
}
