//! Human-readable and JSON renderings of a [`RunResult`].

use std::time::Duration;

use splitkit_parser::RunResult;

/// Format a duration as `H:MM:SS.mmm`, or `M:SS.mmm` under an hour.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();
    let (hours, mins, secs) = (secs / 3600, (secs / 60) % 60, secs % 60);
    if hours > 0 {
        format!("{hours}:{mins:02}:{secs:02}.{millis:03}")
    } else {
        format!("{mins}:{secs:02}.{millis:03}")
    }
}

/// Multi-line summary of a matched run.
pub fn summary(run: &RunResult) -> String {
    let program = run.program.map(|p| p.display_name()).unwrap_or("unknown");
    let mut lines = vec![format!("Program: {program}")];
    if let Some(name) = run.display_name() {
        lines.push(format!("Run: {name}"));
    }
    if let Some(ref game) = run.game_name {
        lines.push(format!("Game: {game}"));
    }
    if let Some(category) = run.canonical_category() {
        lines.push(format!("Category: {category}"));
    }
    if let Some(attempts) = run.attempts {
        lines.push(format!("Attempts: {attempts}"));
    }
    if let Some(offset) = run.offset {
        lines.push(format!("Offset: {offset}"));
    }
    lines.push(format!("Total: {}", format_duration(run.total_time)));
    let sum_of_best = run.sum_of_best.map(format_duration);
    lines.push(format!(
        "Sum of best: {}",
        sum_of_best.as_deref().unwrap_or("-")
    ));

    lines.push(String::new());
    lines.push(format!("Segments: {}", run.segments.len()));
    for (i, segment) in run.segments.iter().enumerate() {
        let name = if segment.name.is_empty() {
            "-"
        } else {
            segment.name.as_str()
        };
        let mut line = format!("  [{i}] {name} {}", format_duration(segment.duration));
        if let Some(best) = segment.best {
            line += &format!(" (best {})", format_duration(best));
        }
        lines.push(line);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Serialize a run as JSON.
pub fn to_json(run: &RunResult, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(run)
    } else {
        serde_json::to_string(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitkit_core::ProgramId;
    use splitkit_parser::Segment;

    fn sample_run() -> RunResult {
        RunResult {
            program: Some(ProgramId::LiveSplit),
            game_name: Some("Super Mario 64".into()),
            category_name: Some("Any% (NG+)".into()),
            attempts: Some(7),
            segments: vec![
                Segment::new("Castle", Duration::from_millis(12_500), None),
                Segment::new("", Duration::from_millis(7_250), None),
            ],
            total_time: Duration::from_millis(19_750),
            ..RunResult::default()
        }
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(Duration::from_millis(19_750)), "0:19.750");
        assert_eq!(format_duration(Duration::from_millis(242_750)), "4:02.750");
        assert_eq!(format_duration(Duration::from_secs(3_723)), "1:02:03.000");
    }

    #[test]
    fn summary_lists_segments() {
        let text = summary(&sample_run());
        assert!(text.contains("Program: LiveSplit"));
        assert!(text.contains("Run: Super Mario 64 Any% (NG+)"));
        assert!(text.contains("Category: Any% NG+"));
        assert!(text.contains("Total: 0:19.750"));
        assert!(text.contains("Sum of best: -"));
        assert!(text.contains("[0] Castle 0:12.500"));
        assert!(text.contains("[1] - 0:07.250"));
    }

    #[test]
    fn summary_with_bests_ends_each_line() {
        let mut run = sample_run();
        run.segments[0].best = Some(Duration::from_millis(11_000));
        run.sum_of_best = Some(Duration::from_millis(18_000));
        let text = summary(&run);
        assert!(text.contains("Sum of best: 0:18.000\n"));
        assert!(text.contains("[0] Castle 0:12.500 (best 0:11.000)\n"));
        assert!(text.ends_with("[1] - 0:07.250\n"));
    }

    #[test]
    fn json_is_compact_or_pretty() {
        let run = sample_run();
        let compact = to_json(&run, false).unwrap();
        assert!(!compact.contains('\n'));
        assert!(compact.contains("\"program\":\"livesplit\""));
        assert!(to_json(&run, true).unwrap().contains('\n'));
    }
}
