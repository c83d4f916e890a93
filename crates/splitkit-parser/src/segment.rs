//! Per-segment record decoding shared by the format parsers.
//!
//! A [`SegmentDecoder`] reads one segment record at a byte offset according
//! to a [`SegmentLayout`] and returns the record plus the offset just past
//! it. Records carry times as the file stores them; a [`Timeline`] then turns
//! cumulative split times into per-segment durations.

use std::time::Duration;

use crate::cursor::ByteCursor;
use crate::error::DecodeError;
use crate::parser::Depth;
use crate::time;
use crate::types::Segment;

/// Marker for "no time recorded" in Java-encoded records.
const JAVA_NO_TIME: i64 = -1;

/// Byte order mark some Windows editors and timers put before text.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Smallest possible Java-encoded record: empty name, two longs.
pub const JAVA_RECORD_MIN_LEN: usize = 2 + 8 + 8;

/// A segment as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentRecord {
    pub name: String,
    /// Segment or cumulative time, depending on the format's [`TimeBasis`].
    pub time: Option<Duration>,
    pub best: Option<Duration>,
}

/// How a format stores the per-segment run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBasis {
    /// The time spent in the segment itself.
    Segment,
    /// The running total at the end of the segment.
    Cumulative,
}

/// Field positions of a delimited text record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextFields {
    pub separator: char,
    /// Fields making up a record. With `right_aligned`, the line is split
    /// from the right into exactly this many fields so the name may contain
    /// the separator; otherwise at least this many fields are required and
    /// extras are ignored.
    pub count: usize,
    pub right_aligned: bool,
    pub name: usize,
    pub time: usize,
    pub best: usize,
    /// Substring the timer writes in place of the separator inside names.
    pub name_escape: Option<&'static str>,
}

/// On-disk shape of one segment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentLayout {
    /// `writeUTF` name, then big-endian i64 time and best in milliseconds.
    JavaRecord,
    /// One line of separated fields holding decimal or clock-style times.
    Delimited(TextFields),
}

/// Decodes segment records of one layout at a chosen depth.
#[derive(Debug, Clone, Copy)]
pub struct SegmentDecoder {
    layout: SegmentLayout,
    depth: Depth,
}

impl SegmentDecoder {
    pub fn new(layout: SegmentLayout, depth: Depth) -> Self {
        Self { layout, depth }
    }

    /// Decode the record starting at `offset`, returning it with the offset
    /// of the next record.
    pub fn decode(
        &self,
        bytes: &[u8],
        offset: usize,
    ) -> Result<(SegmentRecord, usize), DecodeError> {
        match self.layout {
            SegmentLayout::JavaRecord => self.decode_java(bytes, offset),
            SegmentLayout::Delimited(fields) => {
                let (line, next) = line_at(bytes, offset)?;
                let record = decode_fields(line, offset, &fields)?;
                Ok((record, next))
            }
        }
    }

    fn decode_java(
        &self,
        bytes: &[u8],
        offset: usize,
    ) -> Result<(SegmentRecord, usize), DecodeError> {
        let mut cursor = ByteCursor::at(bytes, offset);
        let name = match self.depth {
            Depth::Full => cursor.read_utf()?,
            Depth::Fast => {
                cursor.skip_utf()?;
                String::new()
            }
        };

        let time_at = cursor.position();
        let time = java_millis(cursor.read_i64()?, time_at)?;
        let best_at = cursor.position();
        let best = java_millis(cursor.read_i64()?, best_at)?;
        let best = match self.depth {
            Depth::Full => best,
            Depth::Fast => None,
        };

        Ok((SegmentRecord { name, time, best }, cursor.position()))
    }
}

fn java_millis(raw: i64, offset: usize) -> Result<Option<Duration>, DecodeError> {
    match raw {
        JAVA_NO_TIME => Ok(None),
        ms if ms < 0 => Err(DecodeError::corrupt(offset, format!("negative time {ms}ms"))),
        ms => Ok(Some(Duration::from_millis(ms as u64))),
    }
}

fn decode_fields(
    line: &str,
    offset: usize,
    fields: &TextFields,
) -> Result<SegmentRecord, DecodeError> {
    let parts: Vec<&str> = if fields.right_aligned {
        let mut parts: Vec<&str> = line.rsplitn(fields.count, fields.separator).collect();
        parts.reverse();
        parts
    } else {
        line.split(fields.separator).collect()
    };

    if parts.len() < fields.count || (fields.right_aligned && parts.len() != fields.count) {
        return Err(DecodeError::mismatch(format!(
            "expected {} fields at offset {offset}, found {}",
            fields.count,
            parts.len()
        )));
    }

    let name = match fields.name_escape {
        Some(escape) => parts[fields.name].replace(escape, &fields.separator.to_string()),
        None => parts[fields.name].to_string(),
    };
    let time = time::recorded_time(parts[fields.time]).map_err(DecodeError::mismatch)?;
    let best = time::recorded_time(parts[fields.best]).map_err(DecodeError::mismatch)?;

    Ok(SegmentRecord {
        name: name.trim().to_string(),
        time,
        best,
    })
}

/// Return the text line starting at `offset` (without its line ending) and
/// the offset of the following line.
///
/// A byte order mark at the very start of the input is skipped.
pub fn line_at(bytes: &[u8], offset: usize) -> Result<(&str, usize), DecodeError> {
    let start = if offset == 0 && bytes.starts_with(UTF8_BOM) {
        UTF8_BOM.len()
    } else {
        offset
    };
    let rest = bytes.get(start..).unwrap_or_default();
    let (raw, next) = match rest.iter().position(|&b| b == b'\n') {
        Some(end) => (&rest[..end], start + end + 1),
        None => (rest, bytes.len()),
    };
    let line = std::str::from_utf8(raw)
        .map_err(|e| DecodeError::mismatch(format!("non-UTF-8 text at offset {offset}: {e}")))?;
    Ok((line.strip_suffix('\r').unwrap_or(line), next))
}

/// Converts stored segment records into segments with resolved durations.
#[derive(Debug)]
pub struct Timeline {
    basis: TimeBasis,
    reference: Duration,
    segments: Vec<Segment>,
}

impl Timeline {
    pub fn new(basis: TimeBasis) -> Self {
        Self {
            basis,
            reference: Duration::ZERO,
            segments: Vec::new(),
        }
    }

    /// Reserve room for `count` segments up front.
    ///
    /// Reservation failure is a fault, not a format mismatch.
    pub fn with_capacity(basis: TimeBasis, count: usize) -> Result<Self, DecodeError> {
        let mut timeline = Self::new(basis);
        timeline
            .segments
            .try_reserve_exact(count)
            .map_err(splitkit_core::Error::from)?;
        Ok(timeline)
    }

    /// Append a record. `position` locates it for error reporting.
    ///
    /// For cumulative times, a record without a time is a skipped split: it
    /// gets a zero duration and the next recorded split absorbs its time.
    pub fn push(&mut self, record: SegmentRecord, position: usize) -> Result<(), DecodeError> {
        let duration = match (self.basis, record.time) {
            (TimeBasis::Segment, time) => time.unwrap_or_default(),
            (TimeBasis::Cumulative, None) => Duration::ZERO,
            (TimeBasis::Cumulative, Some(total)) => {
                let duration = total.checked_sub(self.reference).ok_or_else(|| {
                    DecodeError::corrupt(position, "split time earlier than previous split")
                })?;
                self.reference = total;
                duration
            }
        };

        self.segments.push(Segment {
            name: record.name,
            duration,
            best: record.best,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn java_record(name: &str, time: i64, best: i64) -> Vec<u8> {
        let mut out = (name.len() as u16).to_be_bytes().to_vec();
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(&time.to_be_bytes());
        out.extend_from_slice(&best.to_be_bytes());
        out
    }

    const COMMA_FIELDS: TextFields = TextFields {
        separator: ',',
        count: 3,
        right_aligned: false,
        name: 0,
        time: 1,
        best: 2,
        name_escape: Some("‡"),
    };

    #[test]
    fn java_record_full_depth() {
        let bytes = java_record("Ceres", 62_500, 61_000);
        let decoder = SegmentDecoder::new(SegmentLayout::JavaRecord, Depth::Full);
        let (record, next) = decoder.decode(&bytes, 0).unwrap();
        assert_eq!(record.name, "Ceres");
        assert_eq!(record.time, Some(Duration::from_millis(62_500)));
        assert_eq!(record.best, Some(Duration::from_millis(61_000)));
        assert_eq!(next, bytes.len());
    }

    #[test]
    fn java_record_fast_depth_skips_detail() {
        let bytes = java_record("Ceres", 62_500, 61_000);
        let decoder = SegmentDecoder::new(SegmentLayout::JavaRecord, Depth::Fast);
        let (record, next) = decoder.decode(&bytes, 0).unwrap();
        assert_eq!(record.name, "");
        assert_eq!(record.time, Some(Duration::from_millis(62_500)));
        assert_eq!(record.best, None);
        assert_eq!(next, bytes.len());
    }

    #[test]
    fn java_record_corrupt_best_rejected_at_both_depths() {
        let bytes = java_record("Ceres", 62_500, -5);
        for depth in [Depth::Fast, Depth::Full] {
            let decoder = SegmentDecoder::new(SegmentLayout::JavaRecord, depth);
            let err = decoder.decode(&bytes, 0).unwrap_err();
            assert!(matches!(err, DecodeError::Corrupt { offset: 15, .. }), "{depth:?}");
        }
    }

    #[test]
    fn java_record_bad_name_rejected_at_both_depths() {
        let mut bytes = java_record("ab", 1000, 900);
        bytes[2] = 0xFF;
        for depth in [Depth::Fast, Depth::Full] {
            let decoder = SegmentDecoder::new(SegmentLayout::JavaRecord, depth);
            let err = decoder.decode(&bytes, 0).unwrap_err();
            assert!(matches!(err, DecodeError::Corrupt { offset: 0, .. }), "{depth:?}");
        }
    }

    #[test]
    fn java_record_no_time_marker() {
        let bytes = java_record("X", -1, -1);
        let decoder = SegmentDecoder::new(SegmentLayout::JavaRecord, Depth::Full);
        let (record, _) = decoder.decode(&bytes, 0).unwrap();
        assert_eq!(record.time, None);
        assert_eq!(record.best, None);
    }

    #[test]
    fn java_record_truncated_vs_corrupt() {
        let bytes = java_record("X", 1000, 900);
        let decoder = SegmentDecoder::new(SegmentLayout::JavaRecord, Depth::Full);
        let err = decoder.decode(&bytes[..bytes.len() - 3], 0).unwrap_err();
        assert!(err.is_truncation());

        let bytes = java_record("X", -5, 900);
        let err = decoder.decode(&bytes, 0).unwrap_err();
        assert!(matches!(err, DecodeError::Corrupt { offset: 3, .. }));
    }

    #[test]
    fn line_at_skips_leading_bom() {
        let bytes = b"\xEF\xBB\xBFTitle=X\nA,0,10,9\n";
        let (line, next) = line_at(bytes, 0).unwrap();
        assert_eq!(line, "Title=X");
        assert_eq!(next, 11);
        assert_eq!(line_at(bytes, next).unwrap().0, "A,0,10,9");
    }

    #[test]
    fn delimited_line_advances_offset() {
        let text = b"Ceres,1:02.50,1:01.00\nMaridia,2:00.00,0\n";
        let decoder = SegmentDecoder::new(SegmentLayout::Delimited(COMMA_FIELDS), Depth::Full);
        let (first, next) = decoder.decode(text, 0).unwrap();
        assert_eq!(first.name, "Ceres");
        assert_eq!(first.time, Some(Duration::from_millis(62_500)));
        let (second, end) = decoder.decode(text, next).unwrap();
        assert_eq!(second.name, "Maridia");
        assert_eq!(second.best, None);
        assert_eq!(end, text.len());
    }

    #[test]
    fn delimited_name_escape() {
        let text = "Wait‡ what,10,0".as_bytes();
        let decoder = SegmentDecoder::new(SegmentLayout::Delimited(COMMA_FIELDS), Depth::Full);
        let (record, _) = decoder.decode(text, 0).unwrap();
        assert_eq!(record.name, "Wait, what");
    }

    #[test]
    fn right_aligned_names_keep_separator() {
        let fields = TextFields {
            separator: ',',
            count: 4,
            right_aligned: true,
            name: 0,
            time: 2,
            best: 3,
            name_escape: None,
        };
        let decoder = SegmentDecoder::new(SegmentLayout::Delimited(fields), Depth::Full);
        let (record, _) = decoder.decode(b"Red, Blue,0,12.5,11\r\n", 0).unwrap();
        assert_eq!(record.name, "Red, Blue");
        assert_eq!(record.time, Some(Duration::from_millis(12_500)));
        assert_eq!(record.best, Some(Duration::from_secs(11)));
    }

    #[test]
    fn delimited_wrong_field_count_is_mismatch() {
        let decoder = SegmentDecoder::new(SegmentLayout::Delimited(COMMA_FIELDS), Depth::Full);
        let err = decoder.decode(b"just a name", 0).unwrap_err();
        assert!(matches!(err, DecodeError::Mismatch(_)));
    }

    #[test]
    fn cumulative_timeline_resolves_durations() {
        let mut timeline = Timeline::new(TimeBasis::Cumulative);
        let rec = |t: Option<u64>| SegmentRecord {
            name: String::new(),
            time: t.map(Duration::from_secs),
            best: None,
        };
        timeline.push(rec(Some(10)), 0).unwrap();
        timeline.push(rec(None), 1).unwrap();
        timeline.push(rec(Some(25)), 2).unwrap();
        let durations: Vec<u64> = timeline
            .into_segments()
            .iter()
            .map(|s| s.duration.as_secs())
            .collect();
        assert_eq!(durations, vec![10, 0, 15]);
    }

    #[test]
    fn cumulative_timeline_rejects_backwards_time() {
        let mut timeline = Timeline::new(TimeBasis::Cumulative);
        let rec = |t: u64| SegmentRecord {
            name: String::new(),
            time: Some(Duration::from_secs(t)),
            best: None,
        };
        timeline.push(rec(20), 0).unwrap();
        assert!(matches!(
            timeline.push(rec(5), 1),
            Err(DecodeError::Corrupt { offset: 1, .. })
        ));
    }

    #[test]
    fn segment_timeline_defaults_missing_to_zero() {
        let mut timeline = Timeline::new(TimeBasis::Segment);
        timeline
            .push(
                SegmentRecord {
                    name: "A".into(),
                    time: None,
                    best: None,
                },
                0,
            )
            .unwrap();
        assert_eq!(timeline.into_segments()[0].duration, Duration::ZERO);
    }

    #[test]
    fn line_at_handles_crlf_and_eof() {
        let text = b"one\r\ntwo";
        let (first, next) = line_at(text, 0).unwrap();
        assert_eq!(first, "one");
        let (second, end) = line_at(text, next).unwrap();
        assert_eq!(second, "two");
        assert_eq!(end, text.len());
    }
}
