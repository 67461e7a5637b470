use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::bank::QuestionBank;
use crate::store::SessionStore;
use crate::survey::bands::BandPartition;
use crate::survey::belief;
use crate::survey::config::SurveyConfig;
use crate::survey::error::SurveyError;
use crate::survey::metrics;
use crate::survey::sampler::{self, RankSampler};
use crate::survey::stopping::{self, StopDecision};
use crate::survey::types::{
    AnswerRecord, PendingQuestion, QuestionOption, QuestionPayload, SessionStatus, SessionView,
    StepOutcome, SurveyResult, SurveySession, TerminationReason,
};

const OPTION_IDS: [&str; 8] = ["a", "b", "c", "d", "e", "f", "g", "h"];
const STEP_RNG_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone, Default)]
pub struct StartOptions {
    pub locale: String,
    pub initial_rank_hint: Option<u32>,
    /// Fixes the probe sequence; omitted in production, supplied for replay.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct StartOutcome {
    pub session: SessionView,
    pub question: QuestionPayload,
}

#[derive(Debug, Clone)]
pub struct AnswerSubmission {
    pub session_id: Uuid,
    pub question_id: Uuid,
    pub selected_option_id: String,
    pub response_time_ms: i64,
}

/// Orchestrates one survey session per step: applies the answer to the
/// belief, consults the stopping rule, and either issues the next question
/// or finalizes the result. Exclusively owns session mutation; a per-session
/// lock serializes concurrent steps so each session is single-writer.
pub struct SurveyEngine {
    config: SurveyConfig,
    bands: BandPartition,
    sampler: Box<dyn RankSampler>,
    bank: Arc<dyn QuestionBank>,
    store: Arc<dyn SessionStore>,
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl SurveyEngine {
    pub fn new(
        config: SurveyConfig,
        bank: Arc<dyn QuestionBank>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        let bands = BandPartition::new(config.max_rank, config.sampling.band_count);
        let sampler = sampler::sampler_for(config.sampler, config.sampling.clone());
        Self {
            config,
            bands,
            sampler,
            bank,
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &SurveyConfig {
        &self.config
    }

    /// Create a session and issue its first question.
    pub fn start(&self, options: StartOptions) -> Result<StartOutcome, SurveyError> {
        let hint = options
            .initial_rank_hint
            .unwrap_or(self.config.initial_rank_hint)
            .clamp(1, self.config.max_rank);
        // The one entropy tap in the engine: it mints the root seed only.
        // Every later draw is derived from that seed via `step_rng`.
        let seed = options.seed.unwrap_or_else(|| rand::rng().random());
        let locale = if options.locale.is_empty() {
            "en".to_string()
        } else {
            options.locale
        };

        let mut session = SurveySession::new(locale, hint, self.config.max_rank, seed);
        let mut rng = self.step_rng(&session);
        let question = self.issue_question(&mut session, &mut rng)?;

        self.store.save(&session);
        tracing::info!(
            session_id = %session.session_id,
            hint,
            sampler = self.config.sampler.as_str(),
            "survey session started"
        );

        Ok(StartOutcome {
            session: SessionView::from(&session),
            question,
        })
    }

    /// Apply one answer to its session. Returns the next question while the
    /// stopping rule says continue, or the terminal result once it stops.
    pub fn submit_answer(&self, submission: AnswerSubmission) -> Result<StepOutcome, SurveyError> {
        let lock = self.session_lock(submission.session_id);
        let _guard = lock.lock();

        let mut session = match self.store.load(&submission.session_id) {
            Some(session) => session,
            None => {
                // Unknown ids must not accumulate lock entries.
                self.locks.lock().remove(&submission.session_id);
                return Err(SurveyError::NotFound);
            }
        };

        if session.status == SessionStatus::Completed {
            return Err(SurveyError::InvalidState);
        }

        let pending = session
            .pending
            .clone()
            .ok_or_else(|| SurveyError::Validation("no outstanding question".to_string()))?;
        if pending.question_id != submission.question_id {
            return Err(SurveyError::Validation(
                "answer does not reference the outstanding question".to_string(),
            ));
        }
        if !OPTION_IDS.contains(&submission.selected_option_id.as_str()) {
            return Err(SurveyError::Validation(format!(
                "unknown option id {:?}",
                submission.selected_option_id
            )));
        }

        let record = AnswerRecord {
            rank: pending.rank,
            is_correct: submission.selected_option_id == pending.correct_option_id,
            response_time_ms: submission.response_time_ms.max(0),
            band_id: pending.band_id,
        };

        let step_index = session.history.len();
        session.belief = belief::apply_answer(
            &session.belief,
            &record,
            step_index,
            &self.config.belief,
            self.config.max_rank,
        );
        session.history.push(record);
        session.pending = None;

        let outcome = match stopping::evaluate(&session.belief, &session.history, &self.config.stopping)
        {
            StopDecision::Stop(reason) => StepOutcome::Complete {
                result: self.complete(&mut session, reason),
            },
            StopDecision::Continue => {
                let mut rng = self.step_rng(&session);
                match self.issue_question(&mut session, &mut rng) {
                    Ok(question) => StepOutcome::Continue { question },
                    // Sampler exhaustion degrades into an early stop rather
                    // than failing the caller.
                    Err(SurveyError::ExhaustedBands) => StepOutcome::Complete {
                        result: self.complete(&mut session, TerminationReason::BandsExhausted),
                    },
                    Err(err) => return Err(err),
                }
            }
        };

        session.updated_at = chrono::Utc::now().timestamp_millis();
        self.store.save(&session);

        if session.status == SessionStatus::Completed {
            self.locks.lock().remove(&session.session_id);
        }

        Ok(outcome)
    }

    pub fn session_view(&self, session_id: &Uuid) -> Result<SessionView, SurveyError> {
        let session = self.store.load(session_id).ok_or(SurveyError::NotFound)?;
        Ok(SessionView::from(&session))
    }

    fn complete(
        &self,
        session: &mut SurveySession,
        reason: TerminationReason,
    ) -> SurveyResult {
        let result =
            metrics::compute_result(&session.belief, &session.history, reason, &self.config);
        session.status = SessionStatus::Completed;
        session.pending = None;
        session.result = Some(result.clone());
        tracing::info!(
            session_id = %session.session_id,
            reach = result.reach,
            volume = result.volume,
            density = result.density,
            questions = result.question_count,
            reason = reason.as_str(),
            "survey session completed"
        );
        result
    }

    /// Sample the next rank and turn it into a question. If the bank cannot
    /// serve the exact rank, retry outward within the tolerance window
    /// before giving up.
    fn issue_question(
        &self,
        session: &mut SurveySession,
        rng: &mut StdRng,
    ) -> Result<QuestionPayload, SurveyError> {
        let rank = self
            .sampler
            .next_rank(&session.belief, &session.probed_ranks, &self.bands, rng)?;

        let (served_rank, entry) = self
            .nearest_served_rank(rank, session)
            .ok_or(SurveyError::QuestionBankUnavailable { rank })?;
        if served_rank != rank {
            tracing::debug!(rank, served_rank, "question bank served a nearby rank");
        }

        let mut options: Vec<(String, bool)> = Vec::with_capacity(entry.distractors.len() + 1);
        options.push((entry.correct_meaning, true));
        for distractor in entry.distractors {
            options.push((distractor, false));
        }
        options.truncate(OPTION_IDS.len());
        options.shuffle(rng);

        let mut correct_option_id = OPTION_IDS[0].to_string();
        let options: Vec<QuestionOption> = options
            .into_iter()
            .enumerate()
            .map(|(i, (text, is_correct))| {
                let option_id = OPTION_IDS[i].to_string();
                if is_correct {
                    correct_option_id = option_id.clone();
                }
                QuestionOption { option_id, text }
            })
            .collect();

        let band_id = self.bands.band_of(served_rank);
        let question_id = Uuid::new_v4();
        session.probed_ranks.insert(served_rank);
        session.pending = Some(PendingQuestion {
            question_id,
            rank: served_rank,
            band_id,
            correct_option_id,
            issued_at: chrono::Utc::now().timestamp_millis(),
        });

        Ok(QuestionPayload {
            question_id,
            rank: served_rank,
            prompt: format!("What does \"{}\" mean?", entry.word),
            options,
        })
    }

    /// Walk outward from the sampled rank until the bank serves an entry,
    /// skipping ranks this session has already probed.
    fn nearest_served_rank(
        &self,
        rank: u32,
        session: &SurveySession,
    ) -> Option<(u32, crate::bank::BankEntry)> {
        let tolerance = self.config.sampling.rank_tolerance;
        for delta in 0..=tolerance {
            let below = rank.checked_sub(delta).filter(|r| *r >= 1);
            let above = Some(rank + delta).filter(|r| *r <= self.config.max_rank);
            for candidate in [below, above].into_iter().flatten() {
                if delta > 0 && session.probed_ranks.contains(&candidate) {
                    continue;
                }
                if let Some(entry) = self.bank.question_for_rank(candidate) {
                    return Some((candidate, entry));
                }
            }
        }
        None
    }

    /// Per-step RNG, derived from the session seed and the step index so a
    /// reloaded session replays identically.
    fn step_rng(&self, session: &SurveySession) -> StdRng {
        let step = session.history.len() as u64;
        StdRng::seed_from_u64(session.seed ^ (step.wrapping_add(1).wrapping_mul(STEP_RNG_STRIDE)))
    }

    fn session_lock(&self, session_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        Arc::clone(locks.entry(session_id).or_default())
    }

    /// Drop lock entries whose session no longer exists in the store.
    /// Runs alongside the idle-session sweep; entries held by an in-flight
    /// step are kept.
    pub fn prune_locks(&self) -> usize {
        let mut locks = self.locks.lock();
        let before = locks.len();
        locks.retain(|session_id, entry| {
            Arc::strong_count(entry) > 1 || self.store.load(session_id).is_some()
        });
        before - locks.len()
    }
}
