use std::collections::BTreeSet;

use rand::{Rng, RngCore};

use crate::survey::bands::BandPartition;
use crate::survey::config::SamplerParams;
use crate::survey::error::SurveyError;
use crate::survey::sampler::{nearest_unprobed, RankSampler};
use crate::survey::types::BeliefState;

/// Band-adaptive sampler: probes the band containing the current estimate
/// first (the rank nearest the estimate is the `P(correct) ~= 0.5` item and
/// carries the most information), then walks outward through uncovered
/// bands to validate that the boundary is not a local artifact. The
/// cross-band probes are what give the Density metric its signal.
pub struct AdaptiveBandSampler {
    params: SamplerParams,
}

impl AdaptiveBandSampler {
    pub fn new(params: SamplerParams) -> Self {
        Self { params }
    }

    fn probes_in_band(&self, band: usize, probed: &BTreeSet<u32>, bands: &BandPartition) -> usize {
        let (lo, hi) = bands.band_range(band);
        probed.range(lo..=hi).count()
    }

    /// Band indices ordered by distance from `origin`; at equal distance the
    /// side is chosen with the injected RNG.
    fn bands_by_distance(
        &self,
        origin: usize,
        band_count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<usize> {
        let mut order = Vec::with_capacity(band_count);
        order.push(origin);
        for delta in 1..band_count {
            let below = origin.checked_sub(delta);
            let above = origin + delta;
            let above = (above < band_count).then_some(above);
            match (below, above) {
                (Some(b), Some(a)) => {
                    if rng.random_bool(0.5) {
                        order.push(b);
                        order.push(a);
                    } else {
                        order.push(a);
                        order.push(b);
                    }
                }
                (Some(b), None) => order.push(b),
                (None, Some(a)) => order.push(a),
                (None, None) => {}
            }
        }
        order
    }
}

impl RankSampler for AdaptiveBandSampler {
    fn next_rank(
        &self,
        belief: &BeliefState,
        probed: &BTreeSet<u32>,
        bands: &BandPartition,
        rng: &mut dyn RngCore,
    ) -> Result<u32, SurveyError> {
        let target_band = bands.band_of(belief.estimate);
        let local_probes = self.probes_in_band(target_band, probed, bands);
        let band_width = bands.band_width(target_band);
        let interval_resolved = belief.confidence_width() < band_width;

        // Stay local while the estimate's band is under-sampled and the
        // interval is still wider than the band itself.
        if local_probes < self.params.local_probe_target && !interval_resolved {
            let (lo, hi) = bands.band_range(target_band);
            if let Some(rank) = nearest_unprobed(belief.estimate, lo, hi, probed, rng) {
                return Ok(rank);
            }
        }

        let order = self.bands_by_distance(target_band, bands.band_count(), rng);

        // First pass: uncovered bands, probed at their geometric mid.
        for &band in &order {
            if band == target_band || belief.bands_covered.contains(&band) {
                continue;
            }
            let (lo, hi) = bands.band_range(band);
            if let Some(rank) = nearest_unprobed(bands.mid_rank(band), lo, hi, probed, rng) {
                return Ok(rank);
            }
        }

        // Second pass: any band with an unprobed rank, nearest band first.
        for &band in &order {
            let (lo, hi) = bands.band_range(band);
            let target = if band == target_band {
                belief.estimate
            } else {
                bands.mid_rank(band)
            };
            if let Some(rank) = nearest_unprobed(target, lo, hi, probed, rng) {
                return Ok(rank);
            }
        }

        Err(SurveyError::ExhaustedBands)
    }
}
