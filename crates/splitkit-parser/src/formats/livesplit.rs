//! LiveSplit split files (`.lss` XML).
//!
//! Segments are read from tagged XML nodes rather than byte offsets, so this
//! module carries its own segment-node decoder. Split times are cumulative
//! .NET `TimeSpan` text with up to seven fractional digits.

use std::time::Duration;

use roxmltree::{Document, Node};
use splitkit_core::ProgramId;

use crate::error::DecodeError;
use crate::parser::{settle, Depth, FormatParser};
use crate::segment::{SegmentRecord, TimeBasis, Timeline};
use crate::time;
use crate::types::ParsedRun;

const PERSONAL_BEST: &str = "Personal Best";

/// [`FormatParser`] for LiveSplit's XML layout.
///
/// Fast depth skips segment names, best segment times, and the metadata
/// block; durations, attempts, and game/category are always decoded.
#[derive(Debug, Default)]
pub struct LiveSplitParser;

impl LiveSplitParser {
    pub fn new() -> Self {
        Self
    }
}

impl FormatParser for LiveSplitParser {
    fn program(&self) -> ProgramId {
        ProgramId::LiveSplit
    }

    fn parse(&self, bytes: &[u8], depth: Depth) -> splitkit_core::Result<Option<ParsedRun>> {
        settle(self.program(), decode(bytes, depth))
    }
}

fn decode(bytes: &[u8], depth: Depth) -> Result<ParsedRun, DecodeError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| DecodeError::mismatch(format!("not UTF-8 text: {e}")))?;
    let text = text.trim_start_matches('\u{feff}');
    if !text.trim_start().starts_with('<') {
        return Err(DecodeError::mismatch("not an XML document"));
    }

    let doc = Document::parse(text)
        .map_err(|e| DecodeError::mismatch(format!("malformed XML: {e}")))?;
    let root = doc.root_element();
    if !root.has_tag_name("Run") {
        return Err(DecodeError::mismatch(format!(
            "root element is <{}>, not <Run>",
            root.tag_name().name()
        )));
    }

    let game_name = child_text(root, "GameName");
    let category_name = child_text(root, "CategoryName");

    let attempts = child_text(root, "AttemptCount")
        .map(|count| {
            count.parse::<u32>().map_err(|_| {
                DecodeError::corrupt(node_pos(root), format!("bad AttemptCount '{count}'"))
            })
        })
        .transpose()?;

    let offset = child_text(root, "Offset")
        .map(|text| time::offset(&text))
        .transpose()
        .map_err(|reason| DecodeError::corrupt(node_pos(root), reason))?;

    let srdc_id = match depth {
        Depth::Full => child(root, "Metadata")
            .and_then(|meta| child(meta, "Run"))
            .and_then(|run| run.attribute("id"))
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_owned),
        Depth::Fast => None,
    };

    let segments_node = child(root, "Segments")
        .ok_or_else(|| DecodeError::mismatch("<Run> has no <Segments>"))?;

    let mut timeline = Timeline::new(TimeBasis::Cumulative);
    for node in segments_node
        .children()
        .filter(|n| n.has_tag_name("Segment"))
    {
        let position = node_pos(node);
        let record = decode_segment(node, depth).map_err(|reason| {
            DecodeError::corrupt(position, reason)
        })?;
        timeline.push(record, position)?;
    }

    let name = match (game_name.as_deref(), category_name.as_deref()) {
        (None, None) => None,
        (game, category) => Some(
            format!("{} {}", game.unwrap_or_default(), category.unwrap_or_default())
                .trim()
                .to_string(),
        ),
    };

    Ok(ParsedRun {
        name,
        game_name,
        category_name,
        attempts,
        srdc_id,
        offset,
        segments: timeline.into_segments(),
    })
}

/// Decode one `<Segment>` node.
fn decode_segment(node: Node<'_, '_>, depth: Depth) -> Result<SegmentRecord, String> {
    let pb_split = child(node, "SplitTimes").and_then(|times| {
        times
            .children()
            .find(|t| t.has_tag_name("SplitTime") && t.attribute("name") == Some(PERSONAL_BEST))
    });
    let time = pb_split.map(real_time).transpose()?.flatten();

    // Checked at both depths so a malformed best rejects the file either way.
    let best = child(node, "BestSegmentTime")
        .map(real_time)
        .transpose()?
        .flatten();
    let (name, best) = match depth {
        Depth::Full => (child_text(node, "Name").unwrap_or_default(), best),
        Depth::Fast => (String::new(), None),
    };

    Ok(SegmentRecord { name, time, best })
}

/// Read a time element in either shape LiveSplit has written: a
/// `<RealTime>` child (1.6 and later) or the time as direct text.
fn real_time(node: Node<'_, '_>) -> Result<Option<Duration>, String> {
    let text = match child(node, "RealTime") {
        Some(real) => real.text().unwrap_or_default(),
        None if node.children().any(|c| c.is_element()) => "",
        None => node.text().unwrap_or_default(),
    };
    time::recorded_time(text)
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    child(node, name)
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
}

fn node_pos(node: Node<'_, '_>) -> usize {
    node.range().start
}
