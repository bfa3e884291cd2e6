// POST /predict: score one comment.
//
// Returns 200 with {"is_toxic", "confidence"} on success.
// Returns 400 {"error": "No content provided"} when `content` is missing,
// null or empty, and 400 for bodies that aren't JSON at all.
// The Content-Type header is not checked.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::scoring::{score, ScoreError};
use crate::web::{api_error, AppState};

pub async fn predict(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(_) => return api_error(StatusCode::BAD_REQUEST, "Invalid JSON body"),
    };

    let text = match payload.get("content") {
        None | Some(Value::Null) => "",
        Some(Value::String(s)) => s.as_str(),
        Some(_) => return api_error(StatusCode::BAD_REQUEST, "content must be a string"),
    };

    match score(state.scorer.as_ref(), text, state.threshold) {
        Ok(prediction) => Json(prediction).into_response(),
        Err(e @ ScoreError::MissingInput) => api_error(StatusCode::BAD_REQUEST, &e.to_string()),
    }
}
