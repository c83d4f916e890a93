//! Urn split files (JSON).

use serde::Deserialize;
use splitkit_core::ProgramId;

use crate::error::DecodeError;
use crate::parser::{settle, Depth, FormatParser};
use crate::segment::{SegmentRecord, TimeBasis, Timeline, UTF8_BOM};
use crate::time;
use crate::types::{Offset, ParsedRun};

/// [`FormatParser`] for Urn's JSON documents.
///
/// The whole document is deserialized either way, so fast and full depth
/// produce the same result.
#[derive(Debug, Default)]
pub struct UrnParser;

impl UrnParser {
    pub fn new() -> Self {
        Self
    }
}

impl FormatParser for UrnParser {
    fn program(&self) -> ProgramId {
        ProgramId::Urn
    }

    fn parse(&self, bytes: &[u8], _depth: Depth) -> splitkit_core::Result<Option<ParsedRun>> {
        settle(self.program(), decode(bytes))
    }
}

#[derive(Debug, Deserialize)]
struct UrnDocument {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    attempt_count: Option<u32>,
    #[serde(default)]
    start_delay: Option<String>,
    splits: Vec<UrnSplit>,
}

#[derive(Debug, Deserialize)]
struct UrnSplit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    best_segment: Option<String>,
}

fn decode(bytes: &[u8]) -> Result<ParsedRun, DecodeError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    // Cheap rejection before handing binary input to serde.
    let first = bytes.iter().find(|b| !b.is_ascii_whitespace());
    if first != Some(&b'{') {
        return Err(DecodeError::mismatch("not a JSON object"));
    }

    let doc: UrnDocument = serde_json::from_slice(bytes)
        .map_err(|e| DecodeError::mismatch(format!("not an Urn document: {e}")))?;

    let offset = doc
        .start_delay
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(time::offset)
        .transpose()
        .map_err(|reason| DecodeError::corrupt(0, reason))?
        .map(|delay| Offset::from_nanos(-delay.as_nanos()));

    let mut timeline = Timeline::new(TimeBasis::Cumulative);
    for (index, split) in doc.splits.into_iter().enumerate() {
        let time = recorded(split.time.as_deref(), index)?;
        let best = recorded(split.best_segment.as_deref(), index)?;
        timeline.push(
            SegmentRecord {
                name: split.title,
                time,
                best,
            },
            index,
        )?;
    }

    Ok(ParsedRun {
        name: doc.title.filter(|t| !t.is_empty()),
        attempts: doc.attempt_count,
        offset,
        segments: timeline.into_segments(),
        ..ParsedRun::default()
    })
}

fn recorded(
    text: Option<&str>,
    index: usize,
) -> Result<Option<std::time::Duration>, DecodeError> {
    text.map(time::recorded_time)
        .transpose()
        .map(Option::flatten)
        .map_err(|reason| DecodeError::corrupt(index, reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const SAMPLE: &str = r#"{
        "title": "Super Metroid Any%",
        "attempt_count": 12,
        "start_delay": "1.500000",
        "splits": [
            {"title": "Ceres", "time": "1:02.500000", "best_time": "1:01.000000", "best_segment": "1:01.000000"},
            {"title": "Brinstar", "time": "4:02.750000", "best_time": "3:50.000000", "best_segment": "2:49.000000"}
        ]
    }"#;

    #[test]
    fn decodes_cumulative_splits() {
        let run = UrnParser.parse(SAMPLE.as_bytes(), Depth::Full).unwrap().unwrap();
        assert_eq!(run.name.as_deref(), Some("Super Metroid Any%"));
        assert_eq!(run.attempts, Some(12));
        assert_eq!(run.offset.unwrap().as_nanos(), -1_500_000_000);
        assert_eq!(run.segments[0].duration, Duration::from_millis(62_500));
        assert_eq!(run.segments[1].duration, Duration::from_millis(180_250));
        assert_eq!(run.segments[1].best, Some(Duration::from_secs(169)));
    }

    #[test]
    fn fast_equals_full() {
        let fast = UrnParser.parse(SAMPLE.as_bytes(), Depth::Fast).unwrap();
        let full = UrnParser.parse(SAMPLE.as_bytes(), Depth::Full).unwrap();
        assert_eq!(fast, full);
    }

    #[test]
    fn missing_times_are_skipped_splits() {
        let json = r#"{"splits": [{"title": "A", "time": ""}, {"title": "B", "time": "10.0"}]}"#;
        let run = UrnParser.parse(json.as_bytes(), Depth::Full).unwrap().unwrap();
        assert_eq!(run.segments[0].duration, Duration::ZERO);
        assert_eq!(run.segments[1].duration, Duration::from_secs(10));
        assert_eq!(run.attempts, None);
    }

    #[test]
    fn other_json_is_no_match() {
        assert!(UrnParser
            .parse(br#"{"name": "not urn"}"#, Depth::Full)
            .unwrap()
            .is_none());
        assert!(UrnParser.parse(b"[1, 2, 3]", Depth::Full).unwrap().is_none());
    }

    #[test]
    fn garbage_time_is_no_match() {
        let json = r#"{"splits": [{"title": "A", "time": "tomorrow"}]}"#;
        assert!(UrnParser.parse(json.as_bytes(), Depth::Full).unwrap().is_none());
    }

    #[test]
    fn xml_is_no_match() {
        assert!(UrnParser
            .parse(b"<?xml version=\"1.0\"?><Run/>", Depth::Fast)
            .unwrap()
            .is_none());
    }
}
