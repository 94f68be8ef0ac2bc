mod client;
mod render;
mod schedule;

use anyhow::{bail, Context};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use client::Client;
use common::task::{self, NewTask, Priority, Task, TaskStatus};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Daemon base URL
    #[arg(long, global = true, default_value = common::DEFAULT_SERVER_URL)]
    url: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task board
    Tasks {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Scheduled jobs as a calendar
    Schedule {
        /// Show the next seven days instead of today
        #[arg(long)]
        week: bool,
        /// Where the last good listing is kept
        #[arg(long, global = true, default_value = common::USER_SCHEDULE_CACHE)]
        cache: PathBuf,
        #[command(subcommand)]
        command: Option<ScheduleCommands>,
    },
    /// Team roster
    Team {
        #[command(subcommand)]
        command: TeamCommands,
    },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// List tasks by column
    List {
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        assignee: Option<String>,
    },
    /// Add a task to the To Do column
    Add {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long, default_value = "ammar")]
        assignee: String,
        #[arg(short, long)]
        priority: Option<Priority>,
    },
    /// Move a task to another column
    Move {
        id: String,
        status: TaskStatus,
    },
    /// Hand a task to someone else
    Assign {
        id: String,
        assignee: String,
    },
    /// Delete a task
    Remove {
        id: String,
    },
    /// Add the starter tasks
    Seed,
    /// Write all tasks to a CSV file
    Export {
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum ScheduleCommands {
    /// Pause or resume an event in the local schedule
    Toggle {
        id: String,
    },
}

#[derive(Subcommand)]
enum TeamCommands {
    /// Show the roster with success rates
    List,
    /// Remove a member from the roster
    Fire {
        id: String,
    },
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = Client::new(&cli.url);

    match cli.command {
        Commands::Tasks { command } => run_tasks(&client, command).await,
        Commands::Schedule { week, cache, command } => match command {
            Some(ScheduleCommands::Toggle { id }) => toggle_event(&client, &id, &cache).await,
            None => run_schedule(&client, week, &cache).await,
        },
        Commands::Team { command } => run_team(&client, command).await,
    }
}

async fn run_tasks(client: &Client, command: TaskCommands) -> anyhow::Result<()> {
    let mut tasks = client.tasks().await?;

    match command {
        TaskCommands::List { status, assignee } => {
            let shown: Vec<Task> = tasks
                .into_iter()
                .filter(|t| status.map_or(true, |s| t.status == s))
                .filter(|t| assignee.as_deref().map_or(true, |a| t.assignee == a))
                .collect();
            print!("{}", render::task_board(&shown));
            return Ok(());
        }
        TaskCommands::Add { title, description, assignee, priority } => {
            let new = Task::new(NewTask { title, description, assignee, priority }, now_ms());
            let id = new.id.clone();
            task::create(&mut tasks, new)?;
            client.replace_tasks(&tasks).await?;
            println!("Created task {}", id);
        }
        TaskCommands::Move { id, status } => {
            if !task::set_status(&mut tasks, &id, status, now_ms()) {
                bail!("Task not found: {}", id);
            }
            client.replace_tasks(&tasks).await?;
            println!("Moved {} to {}", id, status.label());
        }
        TaskCommands::Assign { id, assignee } => {
            if !task::set_assignee(&mut tasks, &id, &assignee, now_ms()) {
                bail!("Task not found: {}", id);
            }
            client.replace_tasks(&tasks).await?;
            println!("Assigned {} to {}", id, assignee);
        }
        TaskCommands::Remove { id } => {
            if !task::remove(&mut tasks, &id) {
                bail!("Task not found: {}", id);
            }
            client.replace_tasks(&tasks).await?;
            println!("Removed {}", id);
        }
        TaskCommands::Seed => {
            let starters = task::starter_tasks(now_ms());
            let added = starters.len();
            tasks.splice(0..0, starters);
            client.replace_tasks(&tasks).await?;
            println!("Starter tasks added ({})", added);
        }
        TaskCommands::Export { path } => {
            let file = std::fs::File::create(&path)
                .with_context(|| format!("Failed to create {:?}", path))?;
            render::export_csv(&tasks, file)?;
            println!("Exported {} tasks to {:?}", tasks.len(), path);
        }
    }
    Ok(())
}

async fn run_schedule(client: &Client, week: bool, cache: &Path) -> anyhow::Result<()> {
    let (events, source) = schedule::resolve(client.schedule().await, cache);
    println!("Source: {}", source.describe());
    if week {
        let today = chrono::Local::now().weekday().num_days_from_sunday();
        print!("{}", render::schedule_week(&events, today));
    } else {
        println!("{}", render::schedule_today(&events));
    }
    Ok(())
}

async fn toggle_event(client: &Client, id: &str, cache: &Path) -> anyhow::Result<()> {
    let (events, _) = schedule::resolve(client.schedule().await, cache);
    let event = schedule::toggle(events, id, cache)?;
    println!(
        "{} is now {}",
        event.title,
        format!("{:?}", event.status).to_lowercase()
    );
    Ok(())
}

async fn run_team(client: &Client, command: TeamCommands) -> anyhow::Result<()> {
    let roster = client.team().await?;

    match command {
        TeamCommands::List => {
            println!("{}", render::team_table(&roster.team, &roster.summary));
        }
        TeamCommands::Fire { id } => {
            if id == common::team::LEAD_ID {
                bail!("The team lead cannot be fired");
            }
            let mut members = roster.team;
            if !common::team::fire(&mut members, &id) {
                bail!("Team member not found: {}", id);
            }
            client.replace_team(&members).await?;
            println!("Removed {} from the roster", id);
        }
    }
    Ok(())
}
