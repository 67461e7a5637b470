use thiserror::Error;

/// Engine error taxonomy. Everything except `QuestionBankUnavailable` is
/// deterministic given the inputs; `ExhaustedBands` is recovered inside the
/// engine by stopping the session early.
#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("survey session not found")]
    NotFound,
    #[error("survey session already completed")]
    InvalidState,
    #[error("answer validation failed: {0}")]
    Validation(String),
    #[error("no unprobed rank remains within the active range")]
    ExhaustedBands,
    #[error("question bank has no entry within tolerance of rank {rank}")]
    QuestionBankUnavailable { rank: u32 },
}
