pub mod api;
pub mod calendar;
pub mod job;
pub mod schedule;
pub mod task;
pub mod team;

pub use api::{ErrorResponse, ScheduleResponse, SuccessResponse, TasksPayload, TeamPayload, TeamResponse};
pub use calendar::{CalendarEvent, DayAgenda, EventStatus, Frequency};
pub use job::{JobId, JobListing, JobRecord, JobState, ScheduleConfig};
pub use schedule::{to_calendar_event, to_calendar_events};
pub use task::{NewTask, Priority, Task, TaskStatus};
pub use team::{RosterSummary, TeamMember};

// Production paths (follow FHS - Filesystem Hierarchy Standard)
pub const DEFAULT_CONFIG_PATH: &str = "/etc/mission-control/config.yaml";

// Fallback paths for non-root users
pub const USER_CONFIG_PATH: &str = "mission-control.yaml";
pub const USER_SCHEDULE_CACHE: &str = "mission-control-schedule.json";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_TASKS_FILE: &str = "tasks.json";
pub const DEFAULT_TEAM_FILE: &str = "team.json";

pub const DEFAULT_JOBS_PROGRAM: &str = "openclaw";
pub const DEFAULT_JOBS_ARGS: [&str; 3] = ["cron", "list", "--json"];
pub const DEFAULT_JOBS_TIMEOUT_SECS: u64 = 10;
