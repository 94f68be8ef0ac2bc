use crate::calendar::{CalendarEvent, EventStatus, Frequency, DEFAULT_ASSIGNEE, DEFAULT_EVENT_TIME};
use crate::job::{JobRecord, ScheduleConfig};

const MS_PER_HOUR: f64 = 3_600_000.0;

/// "HH:MM" marker for the calendar. This is not a next-fire computation:
/// cron jobs show their hour and minute fields, everything else sits at 09:00.
pub fn display_time(schedule: &ScheduleConfig) -> String {
    match schedule {
        ScheduleConfig::Cron(expr) => {
            let fields: Vec<&str> = expr.split_whitespace().collect();
            if fields.len() >= 2 {
                format!("{:0>2}:{:0>2}", fields[1], fields[0])
            } else {
                DEFAULT_EVENT_TIME.to_string()
            }
        }
        ScheduleConfig::Every(_) | ScheduleConfig::Custom => DEFAULT_EVENT_TIME.to_string(),
    }
}

pub fn describe(schedule: &ScheduleConfig, last_status: Option<&str>) -> String {
    let when = match schedule {
        ScheduleConfig::Cron(expr) => expr.clone(),
        ScheduleConfig::Every(ms) => format!("every {}h", ms / MS_PER_HOUR),
        ScheduleConfig::Custom => "custom".to_string(),
    };
    format!("{} | Last: {}", when, last_status.unwrap_or("never"))
}

/// Anything but a successful last run counts as paused, including never run.
pub fn event_status(last_status: Option<&str>) -> EventStatus {
    if last_status == Some("ok") {
        EventStatus::Active
    } else {
        EventStatus::Paused
    }
}

pub fn to_calendar_event(job: &JobRecord) -> CalendarEvent {
    let last_status = job.state.last_status.as_deref();
    CalendarEvent {
        id: job.id.0.clone(),
        title: job.title().to_string(),
        description: Some(describe(&job.schedule, last_status)),
        time: display_time(&job.schedule),
        frequency: Frequency::Daily,
        day_of_week: None,
        assignee: DEFAULT_ASSIGNEE.to_string(),
        status: event_status(last_status),
        last_status: job.state.last_status.clone(),
        next_run: job.state.next_run_at_ms,
    }
}

/// One event per job, in input order.
pub fn to_calendar_events(jobs: &[JobRecord]) -> Vec<CalendarEvent> {
    jobs.iter().map(to_calendar_event).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{JobId, JobState};

    fn cron(expr: &str) -> ScheduleConfig {
        ScheduleConfig::Cron(expr.to_string())
    }

    fn job(id: &str, schedule: ScheduleConfig, last_status: Option<&str>) -> JobRecord {
        JobRecord {
            id: JobId(id.to_string()),
            name: None,
            schedule,
            state: JobState {
                last_status: last_status.map(str::to_string),
                next_run_at_ms: None,
            },
        }
    }

    #[test]
    fn test_cron_time_uses_hour_and_minute_fields() {
        assert_eq!(display_time(&cron("30 8 * * *")), "08:30");
        assert_eq!(display_time(&cron("0 20 * * 1-5")), "20:00");
        assert_eq!(display_time(&cron("5 14 * * *")), "14:05");
        assert_eq!(display_time(&cron("15   7")), "07:15");
    }

    #[test]
    fn test_cron_time_pads_non_numeric_fields() {
        assert_eq!(display_time(&cron("0 * * * *")), "0*:00");
        assert_eq!(display_time(&cron("*/15 9 * * *")), "09:*/15");
    }

    #[test]
    fn test_short_cron_falls_back() {
        assert_eq!(display_time(&cron("")), "09:00");
        assert_eq!(display_time(&cron("30")), "09:00");
        assert_eq!(display_time(&cron("   ")), "09:00");
    }

    #[test]
    fn test_interval_and_custom_time_is_fixed() {
        for ms in [60_000.0, 3_600_000.0, 5_400_000.0, 86_400_000.0] {
            assert_eq!(display_time(&ScheduleConfig::Every(ms)), "09:00");
        }
        assert_eq!(display_time(&ScheduleConfig::Custom), "09:00");
    }

    #[test]
    fn test_description() {
        assert_eq!(describe(&cron("30 8 * * *"), Some("ok")), "30 8 * * * | Last: ok");
        assert_eq!(describe(&ScheduleConfig::Every(3_600_000.0), None), "every 1h | Last: never");
        assert_eq!(describe(&ScheduleConfig::Every(1_800_000.0), Some("error")), "every 0.5h | Last: error");
        assert_eq!(describe(&ScheduleConfig::Every(5_400_000.0), None), "every 1.5h | Last: never");
        assert_eq!(describe(&ScheduleConfig::Custom, None), "custom | Last: never");
    }

    #[test]
    fn test_status_is_active_only_for_ok() {
        assert_eq!(event_status(Some("ok")), EventStatus::Active);
        assert_eq!(event_status(Some("error")), EventStatus::Paused);
        assert_eq!(event_status(Some("OK")), EventStatus::Paused);
        assert_eq!(event_status(Some("")), EventStatus::Paused);
        assert_eq!(event_status(None), EventStatus::Paused);
    }

    #[test]
    fn test_event_fields() {
        let mut record = job("news", cron("30 8 * * *"), Some("ok"));
        record.name = Some("Morning News".to_string());
        record.state.next_run_at_ms = Some(1_700_000_000_000);

        let event = to_calendar_event(&record);
        assert_eq!(event.id, "news");
        assert_eq!(event.title, "Morning News");
        assert_eq!(event.description.as_deref(), Some("30 8 * * * | Last: ok"));
        assert_eq!(event.time, "08:30");
        assert_eq!(event.frequency, Frequency::Daily);
        assert_eq!(event.assignee, "terminator");
        assert_eq!(event.status, EventStatus::Active);
        assert_eq!(event.last_status.as_deref(), Some("ok"));
        assert_eq!(event.next_run, Some(1_700_000_000_000));

        let untitled = to_calendar_event(&job("backup", ScheduleConfig::Custom, None));
        assert_eq!(untitled.title, "backup");
        assert_eq!(untitled.status, EventStatus::Paused);
        assert_eq!(untitled.last_status, None);
    }

    #[test]
    fn test_one_event_per_job_in_order() {
        assert!(to_calendar_events(&[]).is_empty());

        let jobs = vec![
            job("c", cron("0 20 * * *"), Some("ok")),
            job("a", ScheduleConfig::Every(3_600_000.0), None),
            job("a", ScheduleConfig::Every(3_600_000.0), None),
            job("b", ScheduleConfig::Custom, Some("error")),
        ];
        let events = to_calendar_events(&jobs);
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "a", "b"]);
    }
}
