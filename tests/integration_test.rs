use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use uuid::Uuid;

use vocab_survey_backend::create_app;

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .expect("request build")
}

fn post_json(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request build")
}

/// Pick the answer a learner who knows every word up to `boundary` would
/// give. The demo bank makes the correct meaning recoverable from the rank.
fn choose_option(question: &Value, boundary: u64) -> String {
    let rank = question["rank"].as_u64().expect("rank");
    let options = question["options"].as_array().expect("options");
    let synthetic = format!("definition of lexeme {rank}");

    let correct = options
        .iter()
        .find(|o| o["text"] == Value::String(synthetic.clone()))
        .or_else(|| {
            options.iter().find(|o| {
                !o["text"]
                    .as_str()
                    .is_some_and(|t| t.starts_with("definition of lexeme"))
            })
        })
        .expect("correct option");

    let chosen = if rank <= boundary {
        correct
    } else {
        options
            .iter()
            .find(|o| o["optionId"] != correct["optionId"])
            .expect("distractor option")
    };
    chosen["optionId"].as_str().expect("option id").to_string()
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = create_app();

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, get("/health/live")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, get("/health/info")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "vocab-survey-backend");
    assert!(body["activeSessions"].is_u64());
}

#[tokio::test]
async fn test_full_survey_flow() {
    let app = create_app();
    let boundary = 2000u64;

    let (status, body) = send(
        &app,
        post_json("/api/survey/start", json!({"locale": "en", "seed": 7})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let session_id = body["data"]["session"]["sessionId"]
        .as_str()
        .expect("session id")
        .to_string();
    assert_eq!(body["data"]["session"]["status"], "active");
    let mut question = body["data"]["question"].clone();
    assert!(question["prompt"].as_str().is_some_and(|p| p.contains("mean")));
    assert_eq!(question["options"].as_array().map(Vec::len), Some(4));

    let mut answered = 0usize;
    let result = loop {
        let selected = choose_option(&question, boundary);
        let (status, body) = send(
            &app,
            post_json(
                "/api/survey/answer",
                json!({
                    "sessionId": session_id,
                    "questionId": question["questionId"],
                    "selectedOptionId": selected,
                    "responseTimeMs": 1500,
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        answered += 1;
        assert!(answered <= 20, "session did not terminate");

        match body["data"]["status"].as_str() {
            Some("active") => question = body["data"]["question"].clone(),
            Some("completed") => break body["data"]["result"].clone(),
            other => panic!("unexpected step status {other:?}"),
        }
    };

    assert_eq!(result["questionCount"].as_u64(), Some(answered as u64));
    let reach = result["reach"].as_u64().expect("reach");
    assert!(reach >= 1 && reach <= 8000);
    assert_eq!(result["volume"], result["reach"]);
    assert!(result["terminationReason"].as_str().is_some());

    // Snapshot reflects the terminal state.
    let (status, body) = send(&app, get(&format!("/api/survey/{session_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(body["data"]["result"]["reach"].as_u64(), Some(reach));

    // A completed session refuses further answers.
    let (status, body) = send(
        &app,
        post_json(
            "/api/survey/answer",
            json!({
                "sessionId": session_id,
                "questionId": Uuid::new_v4(),
                "selectedOptionId": "a",
                "responseTimeMs": 100,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE");
}

#[tokio::test]
async fn test_unknown_session_is_404() {
    let app = create_app();

    let (status, body) = send(&app, get(&format!("/api/survey/{}", Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, body) = send(
        &app,
        post_json(
            "/api/survey/answer",
            json!({
                "sessionId": Uuid::new_v4(),
                "questionId": Uuid::new_v4(),
                "selectedOptionId": "a",
                "responseTimeMs": 100,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_invalid_option_id_is_rejected() {
    let app = create_app();

    let (status, body) = send(
        &app,
        post_json("/api/survey/start", json!({"seed": 11})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let session_id = body["data"]["session"]["sessionId"].clone();
    let question_id = body["data"]["question"]["questionId"].clone();

    let (status, body) = send(
        &app,
        post_json(
            "/api/survey/answer",
            json!({
                "sessionId": session_id,
                "questionId": question_id,
                "selectedOptionId": "zz",
                "responseTimeMs": 100,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_route_falls_back_to_json_404() {
    let app = create_app();

    let (status, body) = send(&app, get("/api/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");
}
