#![allow(dead_code)]

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use vocab_survey_backend::seed;
use vocab_survey_backend::store::InMemorySessionStore;
use vocab_survey_backend::survey::{
    AnswerSubmission, QuestionPayload, StartOptions, StepOutcome, SurveyConfig, SurveyEngine,
    SurveyResult,
};

/// Deterministic stand-in for a human test taker. Knows every word up to
/// `boundary` with probability `consistency`, and guesses unknown words
/// right with probability `lucky_guess`.
pub struct SimulatedLearner {
    pub boundary: u32,
    pub consistency: f64,
    pub lucky_guess: f64,
}

impl SimulatedLearner {
    pub fn consistent(boundary: u32) -> Self {
        Self {
            boundary,
            consistency: 0.95,
            lucky_guess: 0.05,
        }
    }

    pub fn noisy(boundary: u32) -> Self {
        Self {
            boundary,
            consistency: 0.70,
            lucky_guess: 0.30,
        }
    }

    pub fn answer(&self, rank: u32, rng: &mut StdRng) -> bool {
        if rank <= self.boundary {
            rng.random_bool(self.consistency)
        } else {
            rng.random_bool(self.lucky_guess)
        }
    }
}

/// Engine over the dense demo bank, plus the store backing it so tests can
/// inspect persisted sessions.
pub fn demo_engine(config: SurveyConfig) -> (SurveyEngine, Arc<InMemorySessionStore>) {
    let bank = Arc::new(seed::demo_bank(config.max_rank));
    let store = Arc::new(InMemorySessionStore::new());
    let store_handle: Arc<InMemorySessionStore> = Arc::clone(&store);
    let engine = SurveyEngine::new(config, bank, store_handle);
    (engine, store)
}

/// The demo bank's correct meaning is recoverable from the rank, which lets
/// tests grade questions without access to server-side state.
pub fn correct_option_id(question: &QuestionPayload) -> String {
    let synthetic = format!("definition of lexeme {}", question.rank);
    question
        .options
        .iter()
        .find(|o| o.text == synthetic)
        .or_else(|| {
            question
                .options
                .iter()
                .find(|o| !o.text.starts_with("definition of lexeme"))
        })
        .map(|o| o.option_id.clone())
        .expect("question has a correct option")
}

pub fn wrong_option_id(question: &QuestionPayload) -> String {
    let correct = correct_option_id(question);
    question
        .options
        .iter()
        .find(|o| o.option_id != correct)
        .map(|o| o.option_id.clone())
        .expect("question has a distractor")
}

/// Drive one full session against the engine, answering as `learner` would.
/// Both the engine and the learner draw from `seed`, so two runs with equal
/// inputs take identical paths.
pub fn run_session(
    engine: &SurveyEngine,
    learner: &SimulatedLearner,
    seed: u64,
) -> SurveyResult {
    let mut rng = StdRng::seed_from_u64(seed.rotate_left(17));
    let start = engine
        .start(StartOptions {
            locale: "en".to_string(),
            initial_rank_hint: None,
            seed: Some(seed),
        })
        .expect("session start");
    let session_id = start.session.session_id;
    let mut question = start.question;

    loop {
        let knows = learner.answer(question.rank, &mut rng);
        let selected_option_id = if knows {
            correct_option_id(&question)
        } else {
            wrong_option_id(&question)
        };

        let outcome = engine
            .submit_answer(AnswerSubmission {
                session_id,
                question_id: question.question_id,
                selected_option_id,
                response_time_ms: 1200,
            })
            .expect("answer step");

        match outcome {
            StepOutcome::Continue { question: next } => question = next,
            StepOutcome::Complete { result } => return result,
        }
    }
}
