//! Format detection, aggregate derivation, and memoization.

use std::sync::Arc;
use std::time::Duration;

use splitkit_core::{ParseMode, ProgramId};

use crate::cache::SplitFile;
use crate::parser::{Depth, FormatParser};
use crate::registry::FormatRegistry;
use crate::types::{ParsedRun, RunResult, Segment};

/// Runs a [`SplitFile`] through the registry and memoizes the outcome.
#[derive(Debug, Clone)]
pub struct ParseCoordinator {
    registry: Arc<FormatRegistry>,
}

impl ParseCoordinator {
    pub fn new(registry: Arc<FormatRegistry>) -> Self {
        Self { registry }
    }

    /// Coordinator over [`FormatRegistry::standard`].
    pub fn standard() -> Self {
        Self::new(FormatRegistry::standard())
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    /// Parse `file` in `mode`.
    ///
    /// A cached result for `mode` is returned as-is. Otherwise, when
    /// `known_program` names a registered parser only that parser is tried;
    /// any other value (including `None`) scans the whole registry in
    /// priority order. The first parser to return a run wins.
    ///
    /// No match yields [`RunResult::empty`], which is not cached. Only faults
    /// are returned as errors.
    pub fn parse(
        &self,
        file: &mut SplitFile,
        mode: ParseMode,
        known_program: Option<ProgramId>,
    ) -> splitkit_core::Result<Arc<RunResult>> {
        if let Some(cached) = file.cache().get(mode) {
            tracing::trace!(%mode, digest = file.digest(), "parse cache hit");
            return Ok(cached);
        }

        let depth = Depth::from(mode);
        for parser in self.candidates(known_program) {
            let Some(parsed) = parser.parse(file.bytes(), depth)? else {
                continue;
            };

            let result = Arc::new(finish(parser.program(), parsed));
            tracing::debug!(
                program = %parser.program(),
                %mode,
                digest = file.digest(),
                segments = result.segments.len(),
                "split file parsed"
            );
            file.cache_mut().store(mode, result.clone());
            return Ok(result);
        }

        tracing::debug!(
            %mode,
            digest = file.digest(),
            bytes = file.len(),
            "no format matched"
        );
        Ok(Arc::new(RunResult::empty()))
    }

    /// Whether `file` parses as any candidate format in `mode`.
    pub fn parses(&self, file: &mut SplitFile, mode: ParseMode) -> splitkit_core::Result<bool> {
        Ok(!self.parse(file, mode, None)?.is_empty())
    }

    fn candidates(&self, known_program: Option<ProgramId>) -> Vec<&dyn FormatParser> {
        match known_program.and_then(|p| self.registry.get(p)) {
            Some(parser) => vec![parser],
            None => self.registry.iter().collect(),
        }
    }
}

/// Stamp the matching program on a parsed run and derive its aggregates.
fn finish(program: ProgramId, parsed: ParsedRun) -> RunResult {
    let total_time = total_time(&parsed.segments);
    let sum_of_best = sum_of_best(&parsed.segments);
    RunResult {
        program: Some(program),
        name: parsed.name,
        game_name: parsed.game_name,
        category_name: parsed.category_name,
        attempts: parsed.attempts,
        srdc_id: parsed.srdc_id,
        offset: parsed.offset,
        segments: parsed.segments,
        total_time,
        sum_of_best,
    }
}

/// Sum of every segment duration.
pub fn total_time(segments: &[Segment]) -> Duration {
    segments
        .iter()
        .fold(Duration::ZERO, |acc, s| acc.saturating_add(s.duration))
}

/// Sum of every segment best, or `None` if any segment lacks one.
///
/// An empty segment list sums to zero.
pub fn sum_of_best(segments: &[Segment]) -> Option<Duration> {
    segments
        .iter()
        .try_fold(Duration::ZERO, |acc, s| Some(acc.saturating_add(s.best?)))
}
