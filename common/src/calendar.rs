use serde::{Deserialize, Serialize};

pub const DEFAULT_EVENT_TIME: &str = "09:00";
pub const DEFAULT_ASSIGNEE: &str = "terminator";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Once,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Active,
    Paused,
}

impl EventStatus {
    pub fn toggled(self) -> Self {
        match self {
            EventStatus::Active => EventStatus::Paused,
            EventStatus::Paused => EventStatus::Active,
        }
    }
}

/// Display projection of a scheduled job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub time: String,
    pub frequency: Frequency,
    /// 0 = Sunday. Only meaningful for weekly events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u32>,
    pub assignee: String,
    pub status: EventStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_run: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayAgenda<'a> {
    pub weekday: u32,
    pub events: Vec<&'a CalendarEvent>,
}

pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// All events ordered by display time. Ties keep their input order.
pub fn today_view(events: &[CalendarEvent]) -> Vec<&CalendarEvent> {
    let mut sorted: Vec<&CalendarEvent> = events.iter().collect();
    sorted.sort_by(|a, b| a.time.cmp(&b.time));
    sorted
}

/// Seven days of active events starting at `start_weekday` (0 = Sunday).
pub fn week_view(events: &[CalendarEvent], start_weekday: u32) -> Vec<DayAgenda<'_>> {
    (0..7)
        .map(|offset| {
            let weekday = (start_weekday + offset) % 7;
            let events = events
                .iter()
                .filter(|e| e.status == EventStatus::Active)
                .filter(|e| e.frequency == Frequency::Daily || e.day_of_week == Some(weekday))
                .collect();
            DayAgenda { weekday, events }
        })
        .collect()
}

pub fn active_count(events: &[CalendarEvent]) -> usize {
    events.iter().filter(|e| e.status == EventStatus::Active).count()
}

/// Flips every event with this id between active and paused. Returns false
/// when none matched.
pub fn toggle_status(events: &mut [CalendarEvent], id: &str) -> bool {
    let mut found = false;
    for event in events.iter_mut().filter(|e| e.id == id) {
        event.status = event.status.toggled();
        found = true;
    }
    found
}

fn daily(id: &str, title: &str, description: &str, time: &str) -> CalendarEvent {
    CalendarEvent {
        id: id.to_string(),
        title: title.to_string(),
        description: Some(description.to_string()),
        time: time.to_string(),
        frequency: Frequency::Daily,
        day_of_week: None,
        assignee: DEFAULT_ASSIGNEE.to_string(),
        status: EventStatus::Active,
        last_status: None,
        next_run: None,
    }
}

/// Shown when the job listing is unreachable and nothing is cached.
pub fn default_schedule() -> Vec<CalendarEvent> {
    let mut events = vec![daily("1", "Morning News Debrief", "AI/Tech news at 8:30 AM", "08:30")];

    let trading_hours = [9, 10, 11, 13, 14, 15, 16, 17, 18, 19];
    for (i, hour) in trading_hours.iter().enumerate() {
        let id = if i < 3 { i + 2 } else { i + 3 };
        events.push(daily(
            &id.to_string(),
            "Hourly Trading Check",
            "Every hour, log to file",
            &format!("{:02}:00", hour),
        ));
    }

    events.push(daily(
        "5",
        "Noon News Summary",
        "Read AI_News_Summary from Downloads, send via iMessage",
        "12:00",
    ));
    events.push(daily("13", "Evening News Debrief", "AI/Tech news at 8 PM", "20:00"));
    events.push(daily("14", "8PM Trading Update", "Send trading update via iMessage", "20:00"));
    events.push(CalendarEvent {
        frequency: Frequency::Weekly,
        day_of_week: Some(1),
        assignee: "ammar".to_string(),
        ..daily("15", "Weekly Content Review", "Review Value Shift", "10:00")
    });
    events
}
