use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::{ErrorResponse, SuccessResponse, TasksPayload};

use super::AppState;
use crate::store::run_blocking;

pub async fn get_tasks(State(state): State<AppState>) -> Json<TasksPayload> {
    let store = state.tasks.clone();
    let tasks = match run_blocking(move || store.load()).await {
        Ok(tasks) => tasks,
        Err(e) => {
            log::warn!("Failed to load tasks, serving an empty board: {:#}", e);
            Vec::new()
        }
    };
    Json(TasksPayload { tasks })
}

pub async fn replace_tasks(
    State(state): State<AppState>,
    payload: Result<Json<TasksPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(e) => {
            log::warn!("Rejected task payload: {}", e.body_text());
            return error(StatusCode::BAD_REQUEST, "Invalid task payload");
        }
    };

    let count = payload.tasks.len();
    let store = state.tasks.clone();
    match run_blocking(move || store.replace(&payload.tasks)).await {
        Ok(()) => {
            log::info!("Saved {} tasks", count);
            Json(SuccessResponse { success: true }).into_response()
        }
        Err(e) => {
            log::error!("Failed to save tasks: {:#}", e);
            error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save tasks")
        }
    }
}

pub(super) fn error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}
