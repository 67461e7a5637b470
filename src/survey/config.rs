use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum SamplerKind {
    #[default]
    Adaptive,
    Bisection,
}

impl SamplerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adaptive => "adaptive",
            Self::Bisection => "bisection",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "bisection" => Self::Bisection,
            _ => Self::Adaptive,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeliefParams {
    /// Slope of the logistic response model in log-rank space.
    pub discrimination: f64,
    /// Step size applied to the ability logit on the first answer.
    pub base_learning_rate: f64,
    /// Per-answer decay of the learning rate; later answers nudge less.
    pub learning_rate_decay: f64,
    /// Fraction of the gap a bound moves toward a probed rank. Bounds
    /// narrow monotonically but never jump onto a single noisy answer.
    pub bound_shrink: f64,
}

impl Default for BeliefParams {
    fn default() -> Self {
        Self {
            discrimination: 1.6,
            base_learning_rate: 0.9,
            learning_rate_decay: 0.25,
            bound_shrink: 0.7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoppingParams {
    pub min_questions: usize,
    pub max_questions: usize,
    /// Convergence threshold for `high_bound - low_bound`, in ranks.
    pub width_tolerance: u32,
    pub min_bands_covered: usize,
    /// Length of the trailing answer window inspected for a stable split.
    pub stable_window: usize,
}

impl Default for StoppingParams {
    fn default() -> Self {
        Self {
            min_questions: 8,
            max_questions: 20,
            width_tolerance: 600,
            min_bands_covered: 4,
            stable_window: 6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerParams {
    /// Number of log-spaced bands partitioning `[1, max_rank]`.
    pub band_count: usize,
    /// Probes wanted in the band around the estimate before exploring.
    pub local_probe_target: usize,
    /// Nearest-rank window for question bank retries.
    pub rank_tolerance: u32,
}

impl Default for SamplerParams {
    fn default() -> Self {
        Self {
            band_count: 10,
            local_probe_target: 2,
            rank_tolerance: 25,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    pub max_rank: u32,
    /// Boundary guess for a learner with no placement signal.
    pub initial_rank_hint: u32,
    /// Reach -> Volume scale; 1.0 keeps the identity mapping.
    pub lexicon_coverage: f64,
    pub sampler: SamplerKind,
    pub belief: BeliefParams,
    pub stopping: StoppingParams,
    pub sampling: SamplerParams,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            max_rank: 8000,
            initial_rank_hint: 2000,
            lexicon_coverage: 1.0,
            sampler: SamplerKind::Adaptive,
            belief: BeliefParams::default(),
            stopping: StoppingParams::default(),
            sampling: SamplerParams::default(),
        }
    }
}

impl SurveyConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("SURVEY_MAX_RANK") {
            if let Ok(parsed) = val.parse::<u32>() {
                config.max_rank = parsed.max(2);
            }
        }
        if let Ok(val) = std::env::var("SURVEY_INITIAL_RANK_HINT") {
            if let Ok(parsed) = val.parse::<u32>() {
                config.initial_rank_hint = parsed;
            }
        }
        if let Ok(val) = std::env::var("SURVEY_SAMPLER") {
            config.sampler = SamplerKind::parse(&val);
        }
        if let Ok(val) = std::env::var("SURVEY_MIN_QUESTIONS") {
            if let Ok(parsed) = val.parse::<usize>() {
                config.stopping.min_questions = parsed;
            }
        }
        if let Ok(val) = std::env::var("SURVEY_MAX_QUESTIONS") {
            if let Ok(parsed) = val.parse::<usize>() {
                config.stopping.max_questions = parsed.max(1);
            }
        }
        if let Ok(val) = std::env::var("SURVEY_WIDTH_TOLERANCE") {
            if let Ok(parsed) = val.parse::<u32>() {
                config.stopping.width_tolerance = parsed;
            }
        }
        if let Ok(val) = std::env::var("SURVEY_BAND_COUNT") {
            if let Ok(parsed) = val.parse::<usize>() {
                config.sampling.band_count = parsed.clamp(2, 64);
            }
        }
        if let Ok(val) = std::env::var("SURVEY_LEXICON_COVERAGE") {
            if let Ok(parsed) = val.parse::<f64>() {
                if parsed.is_finite() && parsed > 0.0 {
                    config.lexicon_coverage = parsed;
                }
            }
        }

        config.initial_rank_hint = config.initial_rank_hint.clamp(1, config.max_rank);
        config
    }
}
