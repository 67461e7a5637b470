use crate::survey::config::StoppingParams;
use crate::survey::types::{AnswerRecord, BeliefState, TerminationReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopDecision {
    Continue,
    Stop(TerminationReason),
}

/// Pure stopping rule; conditions are checked in order, first true wins.
pub fn evaluate(
    belief: &BeliefState,
    history: &[AnswerRecord],
    params: &StoppingParams,
) -> StopDecision {
    let question_count = history.len();

    // Hard safety ceiling, independent of everything else.
    if question_count >= params.max_questions {
        return StopDecision::Stop(TerminationReason::MaxQuestions);
    }

    if question_count < params.min_questions {
        return StopDecision::Continue;
    }

    if belief.confidence_width() <= params.width_tolerance {
        return StopDecision::Stop(TerminationReason::Converged);
    }

    if belief.bands_covered.len() >= params.min_bands_covered
        && boundary_is_stable(belief, history, params.stable_window)
    {
        return StopDecision::Stop(TerminationReason::StableBoundary);
    }

    StopDecision::Continue
}

/// The trailing window shows a clean split around the estimate: probes at or
/// below it answered correctly, probes above it missed, with both sides of
/// the boundary actually represented in the window.
fn boundary_is_stable(belief: &BeliefState, history: &[AnswerRecord], window: usize) -> bool {
    if window == 0 || history.len() < window {
        return false;
    }
    let tail = &history[history.len() - window..];
    let mut below = 0usize;
    let mut above = 0usize;
    for record in tail {
        let is_below = record.rank <= belief.estimate;
        if is_below {
            below += 1;
        } else {
            above += 1;
        }
        if record.is_correct != is_below {
            return false;
        }
    }
    below > 0 && above > 0
}
