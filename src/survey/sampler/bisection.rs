use std::collections::BTreeSet;

use rand::RngCore;

use crate::survey::bands::BandPartition;
use crate::survey::error::SurveyError;
use crate::survey::sampler::{nearest_unprobed, RankSampler};
use crate::survey::types::BeliefState;

/// Interval-halving baseline: always splits `[low_bound, high_bound]` at
/// its midpoint regardless of how informative that probe is. Kept as the
/// reference strategy the band-adaptive sampler is compared against.
#[derive(Default)]
pub struct BisectionSampler;

impl BisectionSampler {
    pub fn new() -> Self {
        Self
    }
}

impl RankSampler for BisectionSampler {
    fn next_rank(
        &self,
        belief: &BeliefState,
        probed: &BTreeSet<u32>,
        bands: &BandPartition,
        rng: &mut dyn RngCore,
    ) -> Result<u32, SurveyError> {
        let mid = belief.low_bound + belief.confidence_width() / 2;

        // Prefer the active interval; fall back to the full lexicon once
        // the interval itself has no unprobed rank left.
        nearest_unprobed(mid, belief.low_bound, belief.high_bound, probed, rng)
            .or_else(|| nearest_unprobed(mid, 1, bands.max_rank(), probed, rng))
            .ok_or(SurveyError::ExhaustedBands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_probes_interval_midpoint() {
        let belief = BeliefState::seeded(2000, 8000);
        let bands = BandPartition::new(8000, 10);
        let mut rng = StdRng::seed_from_u64(5);
        let rank = BisectionSampler::new()
            .next_rank(&belief, &BTreeSet::new(), &bands, &mut rng)
            .unwrap();
        assert_eq!(rank, 1 + (8000 - 1) / 2);
    }

    #[test]
    fn test_skips_probed_midpoint() {
        let belief = BeliefState::seeded(2000, 8000);
        let bands = BandPartition::new(8000, 10);
        let mid = 1 + (8000 - 1) / 2;
        let probed: BTreeSet<u32> = [mid].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(5);
        let rank = BisectionSampler::new()
            .next_rank(&belief, &probed, &bands, &mut rng)
            .unwrap();
        assert!(rank == mid - 1 || rank == mid + 1);
    }

    #[test]
    fn test_exhausted_lexicon_errors() {
        let belief = BeliefState::seeded(4, 8);
        let bands = BandPartition::new(8, 4);
        let probed: BTreeSet<u32> = (1..=8).collect();
        let mut rng = StdRng::seed_from_u64(5);
        let err = BisectionSampler::new().next_rank(&belief, &probed, &bands, &mut rng);
        assert!(matches!(err, Err(SurveyError::ExhaustedBands)));
    }
}
