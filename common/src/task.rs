use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" | "doing" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            _ => bail!("Invalid task status: {} (use todo, in_progress or done)", s),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl FromStr for Priority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => bail!("Invalid priority: {} (use low, medium or high)", s),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub assignee: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    pub created_at: i64,
    pub updated_at: i64,
    /// Fields written by other clients, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub assignee: String,
    pub priority: Option<Priority>,
}

impl Task {
    pub fn new(new: NewTask, now_ms: i64) -> Self {
        Self {
            id: now_ms.to_string(),
            title: new.title,
            description: new.description.filter(|d| !d.trim().is_empty()),
            status: TaskStatus::Todo,
            assignee: new.assignee,
            priority: Some(new.priority.unwrap_or_default()),
            created_at: now_ms,
            updated_at: now_ms,
            extra: Map::new(),
        }
    }
}

/// Prepends a task so the newest sits at the top of its column.
pub fn create(tasks: &mut Vec<Task>, task: Task) -> Result<()> {
    if task.title.trim().is_empty() {
        bail!("Task title must not be empty");
    }
    tasks.insert(0, task);
    Ok(())
}

pub fn set_status(tasks: &mut [Task], id: &str, status: TaskStatus, now_ms: i64) -> bool {
    match tasks.iter_mut().find(|t| t.id == id) {
        Some(task) => {
            task.status = status;
            task.updated_at = now_ms;
            true
        }
        None => false,
    }
}

pub fn set_assignee(tasks: &mut [Task], id: &str, assignee: &str, now_ms: i64) -> bool {
    match tasks.iter_mut().find(|t| t.id == id) {
        Some(task) => {
            task.assignee = assignee.to_string();
            task.updated_at = now_ms;
            true
        }
        None => false,
    }
}

pub fn remove(tasks: &mut Vec<Task>, id: &str) -> bool {
    let before = tasks.len();
    tasks.retain(|t| t.id != id);
    tasks.len() != before
}

pub fn by_status(tasks: &[Task], status: TaskStatus) -> Vec<&Task> {
    tasks.iter().filter(|t| t.status == status).collect()
}

/// Tasks not yet done, counted per assignee in order of first appearance.
pub fn open_counts(tasks: &[Task]) -> Vec<(&str, usize)> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for task in tasks.iter().filter(|t| t.status != TaskStatus::Done) {
        match counts.iter_mut().find(|(name, _)| *name == task.assignee) {
            Some((_, n)) => *n += 1,
            None => counts.push((task.assignee.as_str(), 1)),
        }
    }
    counts
}

/// The starter board. Ids are spaced one millisecond apart so they stay unique.
pub fn starter_tasks(now_ms: i64) -> Vec<Task> {
    let starters = [
        (
            "Set up Convex database",
            "Migrate from localStorage to Convex for real-time sync",
            "terminator",
            Priority::High,
        ),
        (
            "Research AI disruption in staffing",
            "Deep dive on how AI is affecting the staffing/recruitment industry",
            "terminator",
            Priority::Medium,
        ),
        (
            "Value Shift Framework content",
            "Build content series on how AI transforms jobs across industries",
            "ammar",
            Priority::High,
        ),
        (
            "Morning news debrief",
            "Daily 8:30 AM news summary via iMessage",
            "terminator",
            Priority::Medium,
        ),
    ];

    let mut tasks = Vec::new();
    for (offset, (title, description, assignee, priority)) in starters.into_iter().enumerate() {
        let task = Task::new(
            NewTask {
                title: title.to_string(),
                description: Some(description.to_string()),
                assignee: assignee.to_string(),
                priority: Some(priority),
            },
            now_ms + offset as i64,
        );
        tasks.insert(0, task);
    }
    tasks
}
