use anyhow::{bail, Context, Result};
use common::api::{CRON_PATH, TASKS_PATH, TEAM_PATH};
use common::{
    CalendarEvent, ErrorResponse, ScheduleResponse, Task, TasksPayload, TeamMember, TeamResponse,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// JSON client for the daemon's loopback API.
pub struct Client {
    base: String,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self
            .http
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.url(path)))?;
        decode(resp).await
    }

    async fn replace<T: Serialize>(&self, path: &str, key: &str, items: &[T]) -> Result<()> {
        let mut body = serde_json::Map::new();
        body.insert(key.to_string(), serde_json::to_value(items)?);
        let resp = self
            .http
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.url(path)))?;
        let _: serde_json::Value = decode(resp).await?;
        Ok(())
    }

    pub async fn tasks(&self) -> Result<Vec<Task>> {
        let payload: TasksPayload<Task> = self.get(TASKS_PATH).await?;
        Ok(payload.tasks)
    }

    pub async fn replace_tasks(&self, tasks: &[Task]) -> Result<()> {
        self.replace(TASKS_PATH, "tasks", tasks).await
    }

    pub async fn schedule(&self) -> Result<Vec<CalendarEvent>> {
        let resp: ScheduleResponse = self.get(CRON_PATH).await?;
        Ok(resp.events)
    }

    pub async fn team(&self) -> Result<TeamResponse> {
        self.get(TEAM_PATH).await
    }

    pub async fn replace_team(&self, team: &[TeamMember]) -> Result<()> {
        self.replace(TEAM_PATH, "team", team).await
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    let bytes = resp.bytes().await?;
    if !status.is_success() {
        match serde_json::from_slice::<ErrorResponse>(&bytes) {
            Ok(err) => bail!("Server returned {}: {}", status, err.error),
            Err(_) => bail!("Server returned {}", status),
        }
    }
    serde_json::from_slice(&bytes).context("Unexpected response body")
}
