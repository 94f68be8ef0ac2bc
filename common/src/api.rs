use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::calendar::CalendarEvent;
use crate::team::{RosterSummary, TeamMember};

pub const CRON_PATH: &str = "/api/cron";
pub const TASKS_PATH: &str = "/api/tasks";
pub const TEAM_PATH: &str = "/api/team";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub events: Vec<CalendarEvent>,
}

/// The daemon keeps task records as raw JSON so they persist verbatim;
/// clients that work on the board use `TasksPayload<Task>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksPayload<T = Value> {
    pub tasks: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamPayload {
    pub team: Vec<TeamMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamResponse {
    pub team: Vec<TeamMember>,
    pub summary: RosterSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
