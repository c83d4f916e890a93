//! Time text grammar shared by the text and XML formats.
//!
//! Accepts `[-][[[D.]H:]M:]S[.F]` with 1-9 fractional digits. Values are
//! decoded digit by digit into whole nanoseconds, so `65.3` becomes exactly
//! 65 300 000 000 ns with no floating-point step in between.

use std::time::Duration;

use crate::types::Offset;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 3600;
const HOURS_PER_DAY: u64 = 24;
const MAX_FRACTION_DIGITS: usize = 9;

/// A parsed time value with its sign kept apart from the magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeText {
    pub negative: bool,
    pub magnitude: Duration,
}

/// Parse time text, returning `None` when it does not match the grammar.
pub fn parse_time(text: &str) -> Option<TimeText> {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    if body.is_empty() {
        return None;
    }

    let parts: Vec<&str> = body.split(':').collect();
    if parts.len() > 3 {
        return None;
    }
    let (secs_part, larger) = parts.split_last()?;

    let (whole, fraction) = match secs_part.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (*secs_part, None),
    };

    let mut total_secs = digits(whole)?;
    for (part, unit) in larger.iter().rev().zip([SECS_PER_MINUTE, SECS_PER_HOUR]) {
        let value = if unit == SECS_PER_HOUR {
            hours_with_days(part)?
        } else {
            digits(part)?
        };
        total_secs = total_secs.checked_add(value.checked_mul(unit)?)?;
    }

    let nanos = match fraction {
        Some(fraction) => fraction_nanos(fraction)?,
        None => 0,
    };

    Some(TimeText {
        negative,
        magnitude: Duration::new(total_secs, nanos),
    })
}

/// Parse a recorded split or segment time.
///
/// Blank text and an all-zero value both mean "nothing recorded". Malformed
/// or negative text is an error carrying a short reason.
pub fn recorded_time(text: &str) -> Result<Option<Duration>, String> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let parsed = parse_time(text).ok_or_else(|| format!("malformed time '{}'", text.trim()))?;
    if parsed.negative && !parsed.magnitude.is_zero() {
        return Err(format!("negative time '{}'", text.trim()));
    }
    Ok(Some(parsed.magnitude).filter(|d| !d.is_zero()))
}

/// Parse a signed start offset.
pub fn offset(text: &str) -> Result<Offset, String> {
    let parsed = parse_time(text).ok_or_else(|| format!("malformed offset '{}'", text.trim()))?;
    Offset::from_parts(parsed.negative, parsed.magnitude)
        .ok_or_else(|| format!("offset '{}' out of range", text.trim()))
}

fn digits(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Hours, optionally carrying a `D.` day prefix as in .NET `TimeSpan` text.
fn hours_with_days(text: &str) -> Option<u64> {
    match text.split_once('.') {
        Some((days, hours)) => digits(days)?
            .checked_mul(HOURS_PER_DAY)?
            .checked_add(digits(hours)?),
        None => digits(text),
    }
}

fn fraction_nanos(text: &str) -> Option<u32> {
    if text.len() > MAX_FRACTION_DIGITS {
        return None;
    }
    let value = digits(text)?;
    let scale = 10u64.pow((MAX_FRACTION_DIGITS - text.len()) as u32);
    u32::try_from(value * scale).ok()
}
