use anyhow::{bail, Context, Result};
use common::CalendarEvent;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleSource {
    Live,
    Cached,
    Defaults,
}

impl ScheduleSource {
    pub fn describe(&self) -> &'static str {
        match self {
            ScheduleSource::Live => "live job listing",
            ScheduleSource::Cached => "cached schedule (job listing unavailable)",
            ScheduleSource::Defaults => "default schedule (job listing unavailable, no cache)",
        }
    }
}

pub fn read_cache(path: &Path) -> Option<Vec<CalendarEvent>> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

pub fn write_cache(path: &Path, events: &[CalendarEvent]) -> Result<()> {
    let json = serde_json::to_string_pretty(events)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write schedule cache {:?}", path))
}

/// Picks what to show: a non-empty live listing (which refreshes the cache),
/// else the cache, else the built-in defaults.
pub fn resolve(live: Result<Vec<CalendarEvent>>, cache: &Path) -> (Vec<CalendarEvent>, ScheduleSource) {
    match live {
        Ok(events) if !events.is_empty() => {
            if let Err(e) = write_cache(cache, &events) {
                eprintln!("Warning: {:#}", e);
            }
            return (events, ScheduleSource::Live);
        }
        Ok(_) => {}
        Err(e) => eprintln!("Warning: {:#}", e),
    }

    match read_cache(cache) {
        Some(events) if !events.is_empty() => (events, ScheduleSource::Cached),
        _ => (common::calendar::default_schedule(), ScheduleSource::Defaults),
    }
}

/// Pauses or resumes an event and saves the result as the local schedule.
/// A later live listing replaces it.
pub fn toggle(mut events: Vec<CalendarEvent>, id: &str, cache: &Path) -> Result<CalendarEvent> {
    if !common::calendar::toggle_status(&mut events, id) {
        bail!("Scheduled event not found: {}", id);
    }
    write_cache(cache, &events)?;
    events
        .into_iter()
        .find(|e| e.id == id)
        .context("Toggled event disappeared")
}
