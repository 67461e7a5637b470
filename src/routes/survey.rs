use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::response::{json_error, AppError};
use crate::state::AppState;
use crate::survey::{
    AnswerSubmission, QuestionPayload, SessionView, StartOptions, StepOutcome, SurveyError,
    SurveyResult,
};

#[derive(Serialize)]
struct SuccessResponse<T> {
    success: bool,
    data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    fn wrap(data: T) -> Response {
        Json(Self {
            success: true,
            data,
        })
        .into_response()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    #[serde(default)]
    locale: Option<String>,
    #[serde(default)]
    initial_rank_hint: Option<u32>,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StartData {
    session: SessionView,
    question: QuestionPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    session_id: Uuid,
    question_id: Uuid,
    selected_option_id: String,
    response_time_ms: i64,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum AnswerData {
    Active { question: QuestionPayload },
    Completed { result: SurveyResult },
}

pub async fn start(State(state): State<AppState>, Json(req): Json<StartRequest>) -> Response {
    let options = StartOptions {
        locale: req.locale.unwrap_or_default(),
        initial_rank_hint: req.initial_rank_hint,
        seed: req.seed,
    };

    match state.engine().start(options) {
        Ok(outcome) => SuccessResponse::wrap(StartData {
            session: outcome.session,
            question: outcome.question,
        }),
        Err(err) => map_error(err).into_response(),
    }
}

pub async fn answer(State(state): State<AppState>, Json(req): Json<AnswerRequest>) -> Response {
    let submission = AnswerSubmission {
        session_id: req.session_id,
        question_id: req.question_id,
        selected_option_id: req.selected_option_id,
        response_time_ms: req.response_time_ms,
    };

    match state.engine().submit_answer(submission) {
        Ok(StepOutcome::Continue { question }) => {
            SuccessResponse::wrap(AnswerData::Active { question })
        }
        Ok(StepOutcome::Complete { result }) => {
            SuccessResponse::wrap(AnswerData::Completed { result })
        }
        Err(err) => map_error(err).into_response(),
    }
}

pub async fn snapshot(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Response {
    match state.engine().session_view(&session_id) {
        Ok(view) => SuccessResponse::wrap(view),
        Err(err) => map_error(err).into_response(),
    }
}

fn map_error(err: SurveyError) -> AppError {
    match err {
        SurveyError::NotFound => AppError::not_found("survey session not found"),
        SurveyError::InvalidState => json_error(
            StatusCode::CONFLICT,
            "INVALID_STATE",
            "survey session already completed",
        ),
        SurveyError::Validation(message) => AppError::validation(message),
        SurveyError::QuestionBankUnavailable { rank } => json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "QUESTION_BANK_UNAVAILABLE",
            format!("question bank has no entry within tolerance of rank {rank}"),
        ),
        // Only reachable from `start` against a degenerate bank; answered
        // steps degrade into a stop before this can surface.
        SurveyError::ExhaustedBands => AppError::internal(err.to_string()),
    }
}
