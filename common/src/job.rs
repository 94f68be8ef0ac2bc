use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct JobId(pub String);

/// How an external job is scheduled. Built from the loosely shaped
/// `{kind, expr, everyMs}` object the job-listing command emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSchedule", into = "RawSchedule")]
pub enum ScheduleConfig {
    Cron(String),
    Every(f64),
    Custom,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig::Custom
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSchedule {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    expr: Option<String>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    every_ms: Option<f64>,
}

impl From<RawSchedule> for ScheduleConfig {
    fn from(raw: RawSchedule) -> Self {
        match (raw.kind.as_deref(), raw.expr, raw.every_ms) {
            (Some("cron"), expr, _) => ScheduleConfig::Cron(expr.unwrap_or_default()),
            (Some("every"), _, Some(ms)) => ScheduleConfig::Every(ms),
            _ => ScheduleConfig::Custom,
        }
    }
}

impl From<ScheduleConfig> for RawSchedule {
    fn from(schedule: ScheduleConfig) -> Self {
        match schedule {
            ScheduleConfig::Cron(expr) => RawSchedule {
                kind: Some("cron".to_string()),
                expr: Some(expr),
                every_ms: None,
            },
            ScheduleConfig::Every(ms) => RawSchedule {
                kind: Some("every".to_string()),
                expr: None,
                every_ms: Some(ms),
            },
            ScheduleConfig::Custom => RawSchedule {
                kind: Some("custom".to_string()),
                ..RawSchedule::default()
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobState {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub last_status: Option<String>,
    #[serde(default, deserialize_with = "lenient_millis", skip_serializing_if = "Option::is_none")]
    pub next_run_at_ms: Option<i64>,
}

/// One scheduled job as reported by the external scheduler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(default, deserialize_with = "scalar_id")]
    pub id: JobId,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub schedule: ScheduleConfig,
    #[serde(default, deserialize_with = "lenient")]
    pub state: JobState,
}

// The listing comes from another program. A field of the wrong shape falls
// back to its default instead of failing the whole listing.

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Numbers, or strings holding one.
fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(&Value::deserialize(deserializer)?))
}

fn lenient_millis<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if let Some(ms) = value.as_i64() {
        return Ok(Some(ms));
    }
    Ok(number(&value).map(|ms| ms.trunc() as i64))
}

fn scalar_id<'de, D>(deserializer: D) -> Result<JobId, D::Error>
where
    D: Deserializer<'de>,
{
    let id = match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    };
    Ok(JobId(id))
}

impl JobRecord {
    pub fn title(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.id.0,
        }
    }
}

/// The document printed by `openclaw cron list --json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListing {
    pub jobs: Vec<JobRecord>,
}
