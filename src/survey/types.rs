use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum SessionStatus {
    #[default]
    Active,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    MaxQuestions,
    Converged,
    StableBoundary,
    BandsExhausted,
}

impl TerminationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MaxQuestions => "max_questions",
            Self::Converged => "converged",
            Self::StableBoundary => "stable_boundary",
            Self::BandsExhausted => "bands_exhausted",
        }
    }
}

/// Interval-plus-point belief about the learner's vocabulary boundary.
///
/// Invariant: `1 <= low_bound <= estimate <= high_bound <= max_rank`, and
/// across a session `low_bound` never decreases while `high_bound` never
/// increases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeliefState {
    pub low_bound: u32,
    pub high_bound: u32,
    pub estimate: u32,
    /// Ability parameter in log-rank space; `estimate` is its rank form.
    pub estimate_logit: f64,
    pub bands_covered: BTreeSet<usize>,
}

impl BeliefState {
    pub fn seeded(initial_rank_hint: u32, max_rank: u32) -> Self {
        let estimate = initial_rank_hint.clamp(1, max_rank);
        Self {
            low_bound: 1,
            high_bound: max_rank,
            estimate,
            estimate_logit: (estimate as f64).ln(),
            bands_covered: BTreeSet::new(),
        }
    }

    pub fn confidence_width(&self) -> u32 {
        self.high_bound.saturating_sub(self.low_bound)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub rank: u32,
    pub is_correct: bool,
    pub response_time_ms: i64,
    pub band_id: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResult {
    pub volume: u32,
    pub reach: u32,
    pub density: f64,
    pub question_count: usize,
    pub termination_reason: TerminationReason,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    pub option_id: String,
    pub text: String,
}

/// Question as sent to the client; the correct option is never marked here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPayload {
    pub question_id: Uuid,
    pub rank: u32,
    pub prompt: String,
    pub options: Vec<QuestionOption>,
}

/// Outstanding question awaiting an answer, kept server-side only because
/// it records which option is correct.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingQuestion {
    pub question_id: Uuid,
    pub rank: u32,
    pub band_id: usize,
    pub correct_option_id: String,
    pub issued_at: i64,
}

/// The persisted unit of work. Mutated only through the engine; immutable
/// once `status` is `Completed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveySession {
    pub session_id: Uuid,
    pub status: SessionStatus,
    pub locale: String,
    pub belief: BeliefState,
    pub history: Vec<AnswerRecord>,
    pub probed_ranks: BTreeSet<u32>,
    pub pending: Option<PendingQuestion>,
    /// Root of all per-step RNG derivation; fixes the whole question
    /// sequence for replay.
    pub seed: u64,
    pub result: Option<SurveyResult>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl SurveySession {
    pub fn new(locale: String, initial_rank_hint: u32, max_rank: u32, seed: u64) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            session_id: Uuid::new_v4(),
            status: SessionStatus::Active,
            locale,
            belief: BeliefState::seeded(initial_rank_hint, max_rank),
            history: Vec::new(),
            probed_ranks: BTreeSet::new(),
            pending: None,
            seed,
            result: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn question_count(&self) -> usize {
        self.history.len()
    }
}

/// Read-only projection returned over the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: Uuid,
    pub status: SessionStatus,
    pub locale: String,
    pub question_count: usize,
    pub bands_covered: usize,
    pub low_bound: u32,
    pub high_bound: u32,
    pub estimate: u32,
    pub confidence_width: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<SurveyResult>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&SurveySession> for SessionView {
    fn from(session: &SurveySession) -> Self {
        Self {
            session_id: session.session_id,
            status: session.status,
            locale: session.locale.clone(),
            question_count: session.question_count(),
            bands_covered: session.belief.bands_covered.len(),
            low_bound: session.belief.low_bound,
            high_bound: session.belief.high_bound,
            estimate: session.belief.estimate,
            confidence_width: session.belief.confidence_width(),
            result: session.result.clone(),
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

/// What one answered step produces: the next question or the terminal result.
#[derive(Debug, Clone)]
pub enum StepOutcome {
    Continue { question: QuestionPayload },
    Complete { result: SurveyResult },
}
