//! Canonical run representation produced by every format parser.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use splitkit_core::ProgramId;

/// Category names that timers commonly spell differently from the
/// canonical name used for category resolution.
const CATEGORY_ALIASES: &[(&str, &str)] = &[("Any% (NG+)", "Any% NG+")];

/// One timed portion of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment name. Empty when a fast parse skipped it.
    pub name: String,
    /// Time spent in this segment during the recorded run.
    #[serde(with = "secs")]
    pub duration: Duration,
    /// Best-ever time for this segment, if the timer recorded one.
    #[serde(with = "opt_secs", default)]
    pub best: Option<Duration>,
}

impl Segment {
    pub fn new(name: impl Into<String>, duration: Duration, best: Option<Duration>) -> Self {
        Self {
            name: name.into(),
            duration,
            best,
        }
    }
}

/// Signed start offset of a run, in nanoseconds.
///
/// Timers let a run begin before zero (a countdown) or after it; the sign
/// matters, so this cannot be a [`Duration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Offset(i64);

impl Offset {
    pub fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    pub fn from_millis(millis: i64) -> Option<Self> {
        millis.checked_mul(1_000_000).map(Self)
    }

    /// Build from a sign and magnitude; `None` if it does not fit in i64 nanoseconds.
    pub fn from_parts(negative: bool, magnitude: Duration) -> Option<Self> {
        let nanos = i64::try_from(magnitude.as_nanos()).ok()?;
        Some(Self(if negative { -nanos } else { nanos }))
    }

    pub fn as_nanos(&self) -> i64 {
        self.0
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1e9
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.as_secs_f64())
    }
}

impl Serialize for Offset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_secs_f64())
    }
}

impl<'de> Deserialize<'de> for Offset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Ok(Self((secs * 1e9).round() as i64))
    }
}

/// What a single format parser recovers from a file.
///
/// Carries no program tag and no aggregates: the coordinator stamps the
/// program of the parser that matched and derives totals itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRun {
    pub name: Option<String>,
    pub game_name: Option<String>,
    pub category_name: Option<String>,
    pub attempts: Option<u32>,
    pub srdc_id: Option<String>,
    pub offset: Option<Offset>,
    pub segments: Vec<Segment>,
}

/// Normalized parse output.
///
/// An empty result (no program, no segments) means no format matched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub program: Option<ProgramId>,
    pub name: Option<String>,
    pub game_name: Option<String>,
    pub category_name: Option<String>,
    pub attempts: Option<u32>,
    pub srdc_id: Option<String>,
    pub offset: Option<Offset>,
    pub segments: Vec<Segment>,
    /// Sum of every segment duration.
    #[serde(with = "secs")]
    pub total_time: Duration,
    /// Sum of every segment best, present only if every segment has one.
    #[serde(with = "opt_secs", default)]
    pub sum_of_best: Option<Duration>,
}

impl RunResult {
    /// The canonical "no format matched" result.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether this result represents a failed detection.
    pub fn is_empty(&self) -> bool {
        self.program.is_none() && self.segments.is_empty()
    }

    /// `"<game> <category>"` when both are known, else the run's own name.
    pub fn display_name(&self) -> Option<String> {
        match (self.game_name.as_deref(), self.category_name.as_deref()) {
            (Some(game), Some(category)) if !game.is_empty() && !category.is_empty() => {
                Some(format!("{game} {category}"))
            }
            _ => self.name.clone(),
        }
    }

    /// Category name with known timer spellings mapped to their canonical form.
    pub fn canonical_category(&self) -> Option<&str> {
        let category = self.category_name.as_deref()?;
        Some(
            CATEGORY_ALIASES
                .iter()
                .find(|(alias, _)| *alias == category)
                .map(|(_, canonical)| *canonical)
                .unwrap_or(category),
        )
    }
}

/// Serialize a [`Duration`] as floating-point seconds.
mod secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

mod opt_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&d.as_secs_f64()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<f64>::deserialize(deserializer)?
            .map(|secs| Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom))
            .transpose()
    }
}
