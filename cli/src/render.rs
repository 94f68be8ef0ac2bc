use anyhow::Result;
use comfy_table::Table;
use common::calendar::{self, WEEKDAY_NAMES};
use common::team::{self, TeamMember};
use common::{CalendarEvent, RosterSummary, Task, TaskStatus};
use serde::Serialize;
use std::io::Write;

pub fn format_ms(ms: i64) -> String {
    match chrono::DateTime::from_timestamp_millis(ms) {
        Some(dt) => dt.with_timezone(&chrono::Local).format("%b %d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

pub fn task_board(tasks: &[Task]) -> String {
    let mut out = String::new();
    for status in TaskStatus::ALL {
        let column = common::task::by_status(tasks, status);
        out.push_str(&format!("{} ({})\n", status.label(), column.len()));
        if column.is_empty() {
            out.push_str("  -\n\n");
            continue;
        }
        let mut table = Table::new();
        table.set_header(vec!["ID", "Title", "Assignee", "Priority", "Updated"]);
        for task in column {
            table.add_row(vec![
                task.id.clone(),
                task.title.clone(),
                task.assignee.clone(),
                task.priority.map(|p| p.to_string()).unwrap_or_default(),
                format_ms(task.updated_at),
            ]);
        }
        out.push_str(&format!("{}\n\n", table));
    }
    let open: Vec<String> = common::task::open_counts(tasks)
        .into_iter()
        .map(|(assignee, n)| format!("{} {}", assignee, n))
        .collect();
    if !open.is_empty() {
        out.push_str(&format!("Open: {}\n", open.join(", ")));
    }
    out
}

pub fn schedule_today(events: &[CalendarEvent]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Time", "Title", "Status", "Assignee", "Details"]);
    for event in calendar::today_view(events) {
        table.add_row(vec![
            event.time.clone(),
            event.title.clone(),
            format!("{:?}", event.status).to_lowercase(),
            event.assignee.clone(),
            event.description.clone().unwrap_or_default(),
        ]);
    }
    format!(
        "{}\n{} active of {} scheduled",
        table,
        calendar::active_count(events),
        events.len()
    )
}

pub fn schedule_week(events: &[CalendarEvent], start_weekday: u32) -> String {
    let mut out = String::new();
    for day in calendar::week_view(events, start_weekday) {
        out.push_str(&format!("{}\n", WEEKDAY_NAMES[day.weekday as usize]));
        if day.events.is_empty() {
            out.push_str("  -\n");
        }
        for event in day.events {
            out.push_str(&format!("  {} {}\n", event.time, event.title));
        }
    }
    out
}

pub fn team_table(members: &[TeamMember], summary: &RosterSummary) -> String {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Title", "Level", "Completed", "Failed", "Success"]);
    for member in members {
        table.add_row(vec![
            member.id.clone(),
            member.name.clone(),
            member.title.clone(),
            format!("{:?}", member.level).to_lowercase(),
            member.tasks_completed.to_string(),
            member.tasks_failed.to_string(),
            format!("{}%", team::success_rate(member)),
        ]);
    }
    format!(
        "{}\n{} members, {} tasks completed, {} failed, {}% success, {} direct reports",
        table,
        summary.members,
        summary.total_completed,
        summary.total_failed,
        summary.overall_success_rate,
        summary.direct_reports.len()
    )
}

#[derive(Serialize)]
struct TaskRow<'a> {
    id: &'a str,
    title: &'a str,
    description: &'a str,
    status: &'a str,
    assignee: &'a str,
    priority: String,
    created_at: i64,
    updated_at: i64,
}

pub fn export_csv<W: Write>(tasks: &[Task], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for task in tasks {
        wtr.serialize(TaskRow {
            id: &task.id,
            title: &task.title,
            description: task.description.as_deref().unwrap_or(""),
            status: task.status.as_str(),
            assignee: &task.assignee,
            priority: task.priority.map(|p| p.to_string()).unwrap_or_default(),
            created_at: task.created_at,
            updated_at: task.updated_at,
        })?;
    }
    wtr.flush()?;
    Ok(())
}
