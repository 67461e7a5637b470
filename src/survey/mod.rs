pub mod bands;
pub mod belief;
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod sampler;
pub mod stopping;
pub mod types;

pub use config::SurveyConfig;
pub use engine::{AnswerSubmission, StartOptions, StartOutcome, SurveyEngine};
pub use error::SurveyError;
pub use types::*;
