use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::team::{self, RosterSummary};
use common::{SuccessResponse, TeamPayload, TeamResponse};

use super::tasks::error;
use super::AppState;
use crate::store::{load_or_seed, run_blocking};

pub async fn get_team(State(state): State<AppState>) -> Response {
    let store = state.team.clone();
    match run_blocking(move || load_or_seed(store.as_ref(), team::default_roster)).await {
        Ok(members) => {
            let summary = RosterSummary::from_members(&members, team::LEAD_ID);
            Json(TeamResponse { team: members, summary }).into_response()
        }
        Err(e) => {
            log::error!("Failed to load team: {:#}", e);
            error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load team")
        }
    }
}

pub async fn replace_team(
    State(state): State<AppState>,
    payload: Result<Json<TeamPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(e) => {
            log::warn!("Rejected team payload: {}", e.body_text());
            return error(StatusCode::BAD_REQUEST, "Invalid team payload");
        }
    };

    let count = payload.team.len();
    let store = state.team.clone();
    match run_blocking(move || store.replace(&payload.team)).await {
        Ok(()) => {
            log::info!("Saved {} team members", count);
            Json(SuccessResponse { success: true }).into_response()
        }
        Err(e) => {
            log::error!("Failed to save team: {:#}", e);
            error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save team")
        }
    }
}
