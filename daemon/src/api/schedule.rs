use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::ScheduleResponse;

use super::AppState;

/// Lists the external scheduler's jobs as calendar events. Upstream failures
/// come back as an empty list with an error marker; nothing is retried.
pub async fn get_schedule(State(state): State<AppState>) -> Response {
    match state.jobs.list_jobs().await {
        Ok(jobs) => {
            let events = common::to_calendar_events(&jobs);
            log::info!("Serving {} calendar events", events.len());
            Json(ScheduleResponse { error: None, events }).into_response()
        }
        Err(e) => {
            log::error!("Failed to fetch cron jobs: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ScheduleResponse {
                    error: Some("Failed to fetch cron jobs".to_string()),
                    events: Vec::new(),
                }),
            )
                .into_response()
        }
    }
}
