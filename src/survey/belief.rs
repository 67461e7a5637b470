use crate::survey::config::BeliefParams;
use crate::survey::types::{AnswerRecord, BeliefState};

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Item difficulty is monotonic in log frequency rank: rarer words are
/// harder in proportion to how far down the list they sit.
pub fn rank_difficulty(rank: u32) -> f64 {
    (rank.max(1) as f64).ln()
}

/// Model probability that a learner with ability `estimate_logit` answers a
/// probe at `rank` correctly.
pub fn predicted_correct(estimate_logit: f64, rank: u32, discrimination: f64) -> f64 {
    sigmoid(discrimination * (estimate_logit - rank_difficulty(rank)))
}

/// Learning rate for the `step_index`-th answer (0-based). The decay is what
/// produces convergence: early answers reposition the estimate, late answers
/// only refine it.
fn learning_rate(step_index: usize, params: &BeliefParams) -> f64 {
    params.base_learning_rate / (1.0 + params.learning_rate_decay * step_index as f64)
}

/// Pure belief update: never mutates in place, always returns a new state.
///
/// The ability logit takes a decayed step proportional to the prediction
/// error, the bracketing interval tightens toward the probed rank on the
/// informative side, and the point estimate is re-derived from the logit and
/// clamped into the interval. Bounds only ever narrow.
pub fn apply_answer(
    belief: &BeliefState,
    answer: &AnswerRecord,
    step_index: usize,
    params: &BeliefParams,
    max_rank: u32,
) -> BeliefState {
    let mut next = belief.clone();

    let predicted = predicted_correct(belief.estimate_logit, answer.rank, params.discrimination);
    let actual = if answer.is_correct { 1.0 } else { 0.0 };
    let lr = learning_rate(step_index, params);

    let mut logit = belief.estimate_logit + lr * (actual - predicted);
    // Divergence guard: the logit stays inside [ln 1, ln max_rank] instead
    // of ever becoming an error.
    logit = logit.clamp(0.0, (max_rank as f64).ln());
    next.estimate_logit = logit;

    if answer.is_correct {
        let target = answer.rank.min(belief.high_bound);
        if target > belief.low_bound {
            let gap = (target - belief.low_bound) as f64;
            next.low_bound = belief.low_bound + (params.bound_shrink * gap).round() as u32;
        }
    } else {
        let target = answer.rank.max(belief.low_bound);
        if target < belief.high_bound {
            let gap = (belief.high_bound - target) as f64;
            next.high_bound = belief.high_bound - (params.bound_shrink * gap).round() as u32;
        }
    }
    debug_assert!(next.low_bound >= belief.low_bound);
    debug_assert!(next.high_bound <= belief.high_bound);
    debug_assert!(next.low_bound <= next.high_bound);

    let implied = logit.exp().round() as u32;
    next.estimate = implied.clamp(next.low_bound, next.high_bound);

    next.bands_covered.insert(answer.band_id);

    next
}
