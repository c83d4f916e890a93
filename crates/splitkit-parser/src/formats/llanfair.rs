//! Llanfair split files.
//!
//! Llanfair writes big-endian Java data-stream values behind the Java object
//! stream magic. The header sits at fixed offsets:
//!
//! | offset | type | field |
//! |--------|------|-------|
//! | 0      | u32  | magic `0xACED0005` |
//! | 4      | u16  | layout version (1) |
//! | 6      | u32  | attempt counter |
//! | 10     | i64  | start delay, ms |
//! | 18     | u32  | segment count |
//! | 22     | utf  | run title |
//!
//! followed by `segment count` [`SegmentLayout::JavaRecord`] entries whose
//! times are per-segment durations.

use splitkit_core::ProgramId;

use crate::cursor::ByteCursor;
use crate::error::DecodeError;
use crate::parser::{settle, Depth, FormatParser};
use crate::segment::{SegmentDecoder, SegmentLayout, TimeBasis, Timeline, JAVA_RECORD_MIN_LEN};
use crate::types::{Offset, ParsedRun};

pub(crate) const MAGIC: u32 = 0xACED_0005;
const SUPPORTED_VERSION: u16 = 1;
const HEADER_LEN: usize = 22;

/// [`FormatParser`] for Llanfair's binary layout.
#[derive(Debug, Default)]
pub struct LlanfairParser;

impl LlanfairParser {
    pub fn new() -> Self {
        Self
    }
}

impl FormatParser for LlanfairParser {
    fn program(&self) -> ProgramId {
        ProgramId::Llanfair
    }

    fn parse(&self, bytes: &[u8], depth: Depth) -> splitkit_core::Result<Option<ParsedRun>> {
        settle(self.program(), decode(bytes, depth))
    }
}

fn decode(bytes: &[u8], depth: Depth) -> Result<ParsedRun, DecodeError> {
    if bytes.len() < HEADER_LEN {
        return Err(DecodeError::mismatch("shorter than Llanfair header"));
    }

    let mut cursor = ByteCursor::new(bytes);
    if cursor.read_u32()? != MAGIC {
        return Err(DecodeError::mismatch("missing Java stream magic"));
    }
    let version = cursor.read_u16()?;
    if version != SUPPORTED_VERSION {
        return Err(DecodeError::mismatch(format!(
            "unsupported Llanfair layout version {version}"
        )));
    }

    let attempts = cursor.read_u32()?;
    let delay_at = cursor.position();
    let delay_ms = cursor.read_i64()?;
    let offset = delay_ms
        .checked_neg()
        .and_then(Offset::from_millis)
        .ok_or_else(|| DecodeError::corrupt(delay_at, "start delay out of range"))?;
    let count = cursor.read_u32()? as usize;
    let title = cursor.read_utf()?;

    // Bound the table by what the input can possibly hold before reserving.
    let needed = count.saturating_mul(JAVA_RECORD_MIN_LEN);
    cursor.require(needed)?;

    let decoder = SegmentDecoder::new(SegmentLayout::JavaRecord, depth);
    let mut timeline = Timeline::with_capacity(TimeBasis::Segment, count)?;
    let mut position = cursor.position();
    for _ in 0..count {
        let (record, next) = decoder.decode(bytes, position)?;
        timeline.push(record, position)?;
        position = next;
    }

    Ok(ParsedRun {
        name: Some(title).filter(|t| !t.is_empty()),
        attempts: Some(attempts),
        offset: Some(offset),
        segments: timeline.into_segments(),
        ..ParsedRun::default()
    })
}

/// Encode a run in Llanfair's layout, the inverse of the decoder.
///
/// Segments are `(name, time_ms, best_ms)`; `None` is written as `-1`.
pub fn encode(
    title: &str,
    attempts: u32,
    delay_ms: i64,
    segments: &[(&str, Option<u64>, Option<u64>)],
) -> Vec<u8> {
    fn put_utf(out: &mut Vec<u8>, s: &str) {
        let len = s.len().min(u16::MAX as usize);
        out.extend_from_slice(&(len as u16).to_be_bytes());
        out.extend_from_slice(&s.as_bytes()[..len]);
    }
    let millis = |v: Option<u64>| v.map(|ms| ms as i64).unwrap_or(-1);

    let mut out = Vec::new();
    out.extend_from_slice(&MAGIC.to_be_bytes());
    out.extend_from_slice(&SUPPORTED_VERSION.to_be_bytes());
    out.extend_from_slice(&attempts.to_be_bytes());
    out.extend_from_slice(&delay_ms.to_be_bytes());
    out.extend_from_slice(&(segments.len() as u32).to_be_bytes());
    put_utf(&mut out, title);
    for (name, time, best) in segments {
        put_utf(&mut out, name);
        out.extend_from_slice(&millis(*time).to_be_bytes());
        out.extend_from_slice(&millis(*best).to_be_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sample() -> Vec<u8> {
        encode(
            "Super Metroid Any%",
            42,
            1500,
            &[
                ("Ceres", Some(62_500), Some(61_000)),
                ("Brinstar", Some(180_250), None),
            ],
        )
    }

    #[test]
    fn full_decode() {
        let run = LlanfairParser.parse(&sample(), Depth::Full).unwrap().unwrap();
        assert_eq!(run.name.as_deref(), Some("Super Metroid Any%"));
        assert_eq!(run.attempts, Some(42));
        assert_eq!(run.offset.unwrap().as_nanos(), -1_500_000_000);
        assert_eq!(run.segments.len(), 2);
        assert_eq!(run.segments[0].name, "Ceres");
        assert_eq!(run.segments[0].duration, Duration::from_millis(62_500));
        assert_eq!(run.segments[0].best, Some(Duration::from_millis(61_000)));
        assert_eq!(run.segments[1].best, None);
    }

    #[test]
    fn fast_decode_keeps_durations_only() {
        let run = LlanfairParser.parse(&sample(), Depth::Fast).unwrap().unwrap();
        assert_eq!(run.segments.len(), 2);
        assert!(run.segments.iter().all(|s| s.name.is_empty() && s.best.is_none()));
        assert_eq!(run.segments[1].duration, Duration::from_millis(180_250));
    }

    #[test]
    fn wrong_magic_is_no_match() {
        let mut bytes = sample();
        bytes[0] = 0x00;
        assert!(LlanfairParser.parse(&bytes, Depth::Full).unwrap().is_none());
    }

    #[test]
    fn unknown_version_is_no_match() {
        let mut bytes = sample();
        bytes[5] = 9;
        assert!(LlanfairParser.parse(&bytes, Depth::Full).unwrap().is_none());
    }

    #[test]
    fn truncated_segment_table_is_no_match() {
        let bytes = sample();
        let cut = &bytes[..bytes.len() - 4];
        assert!(LlanfairParser.parse(cut, Depth::Full).unwrap().is_none());
    }

    #[test]
    fn absurd_segment_count_is_no_match_not_fault() {
        let mut bytes = sample();
        bytes[18..22].copy_from_slice(&u32::MAX.to_be_bytes());
        assert!(LlanfairParser.parse(&bytes, Depth::Full).unwrap().is_none());
    }

    #[test]
    fn text_input_is_no_match() {
        assert!(LlanfairParser
            .parse(b"Title=Not binary at all, really", Depth::Fast)
            .unwrap()
            .is_none());
    }

    #[test]
    fn trailing_bytes_ignored() {
        let mut bytes = sample();
        bytes.extend_from_slice(&[0x78, 0x70]);
        assert!(LlanfairParser.parse(&bytes, Depth::Full).unwrap().is_some());
    }
}
