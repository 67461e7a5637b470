use crate::survey::config::SurveyConfig;
use crate::survey::types::{AnswerRecord, BeliefState, SurveyResult, TerminationReason};

/// Convert a terminal belief plus the answer history into the reported
/// metrics.
///
/// Reach is the final boundary estimate. Volume is a pure function of Reach:
/// `reach * lexicon_coverage`, identity with the default coverage of 1.0.
/// Density measures how sharply answers separate at the boundary.
pub fn compute_result(
    belief: &BeliefState,
    history: &[AnswerRecord],
    reason: TerminationReason,
    config: &SurveyConfig,
) -> SurveyResult {
    let reach = belief.estimate;
    let volume = (reach as f64 * config.lexicon_coverage).round() as u32;

    SurveyResult {
        volume,
        reach,
        density: density(reach, history),
        question_count: history.len(),
        termination_reason: reason,
    }
}

/// Proportion of probes at or below `reach` answered correctly, minus the
/// proportion of probes above it answered correctly, clamped to `[0, 1]`.
/// A side with no probes contributes zero. High density means a clean
/// boundary; low density means guessing or erratic answering.
pub fn density(reach: u32, history: &[AnswerRecord]) -> f64 {
    let mut below_total = 0usize;
    let mut below_correct = 0usize;
    let mut above_total = 0usize;
    let mut above_correct = 0usize;

    for record in history {
        if record.rank <= reach {
            below_total += 1;
            if record.is_correct {
                below_correct += 1;
            }
        } else {
            above_total += 1;
            if record.is_correct {
                above_correct += 1;
            }
        }
    }

    let p_below = proportion(below_correct, below_total);
    let p_above = proportion(above_correct, above_total);
    (p_below - p_above).clamp(0.0, 1.0)
}

fn proportion(correct: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    }
}
