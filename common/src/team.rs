use serde::{Deserialize, Serialize};

pub const LEAD_ID: &str = "terminator";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Developer,
    Writer,
    Designer,
    Researcher,
    Analyst,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Lead,
    Senior,
    Mid,
    Junior,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Available,
    Busy,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub title: String,
    pub role: Role,
    pub level: Level,
    pub department: String,
    pub reports_to: Option<String>,
    pub description: String,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    pub status: MemberStatus,
    pub tasks_completed: u64,
    pub tasks_failed: u64,
    #[serde(default)]
    pub color: String,
}

/// Whole percent of finished tasks that succeeded. A member with no history
/// reports 100.
pub fn success_rate(member: &TeamMember) -> u32 {
    rate(member.tasks_completed, member.tasks_failed)
}

fn rate(completed: u64, failed: u64) -> u32 {
    let total = completed + failed;
    if total == 0 {
        return 100;
    }
    (completed as f64 / total as f64 * 100.0).round() as u32
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RosterSummary {
    pub members: usize,
    pub total_completed: u64,
    pub total_failed: u64,
    /// Same rule as `success_rate`, over the whole roster.
    pub overall_success_rate: u32,
    pub direct_reports: Vec<String>,
}

impl RosterSummary {
    pub fn from_members(members: &[TeamMember], lead_id: &str) -> Self {
        let total_completed: u64 = members.iter().map(|m| m.tasks_completed).sum();
        let total_failed: u64 = members.iter().map(|m| m.tasks_failed).sum();
        Self {
            members: members.len(),
            total_completed,
            total_failed,
            overall_success_rate: rate(total_completed, total_failed),
            direct_reports: members
                .iter()
                .filter(|m| m.reports_to.as_deref() == Some(lead_id))
                .map(|m| m.id.clone())
                .collect(),
        }
    }
}

pub fn fire(members: &mut Vec<TeamMember>, id: &str) -> bool {
    let before = members.len();
    members.retain(|m| m.id != id);
    members.len() != before
}

#[allow(clippy::too_many_arguments)]
fn member(
    id: &str,
    name: &str,
    title: &str,
    role: Role,
    level: Level,
    department: &str,
    description: &str,
    responsibilities: [&str; 5],
    completed: u64,
    failed: u64,
    color: &str,
) -> TeamMember {
    TeamMember {
        id: id.to_string(),
        name: name.to_string(),
        title: title.to_string(),
        role,
        level,
        department: department.to_string(),
        reports_to: if id == LEAD_ID { None } else { Some(LEAD_ID.to_string()) },
        description: description.to_string(),
        responsibilities: responsibilities.iter().map(|r| r.to_string()).collect(),
        status: if id == LEAD_ID { MemberStatus::Active } else { MemberStatus::Available },
        tasks_completed: completed,
        tasks_failed: failed,
        color: color.to_string(),
    }
}

/// Roster written on first read of an empty team document.
pub fn default_roster() -> Vec<TeamMember> {
    vec![
        member(
            LEAD_ID,
            "Terminator",
            "AI Assistant Lead",
            Role::Developer,
            Level::Lead,
            "Executive",
            "Main AI assistant. Oversees all operations, makes high-level decisions, and manages sub-agents.",
            ["Strategic decisions", "Task orchestration", "Communication with Ammar", "Quality assurance", "Agent management"],
            150,
            2,
            "bg-purple-600",
        ),
        member(
            "dev-agent",
            "Developer Agent",
            "Head of Engineering",
            Role::Developer,
            Level::Lead,
            "Engineering",
            "Leads all development work. Responsible for code quality, architecture decisions, and technical direction.",
            ["System architecture", "Code reviews", "Technical strategy", "Development mentorship", "Bug resolution"],
            45,
            1,
            "bg-blue-600",
        ),
        member(
            "research-agent",
            "Research Agent",
            "Head of Research",
            Role::Researcher,
            Level::Lead,
            "Research",
            "Leads research initiatives. Responsible for deep dives, competitive analysis, and information synthesis.",
            ["Research strategy", "Data analysis", "Report generation", "Trend identification", "Fact-checking"],
            32,
            0,
            "bg-green-600",
        ),
        member(
            "writer-agent",
            "Content Writer",
            "Head of Content",
            Role::Writer,
            Level::Lead,
            "Content",
            "Leads all content creation. Responsible for written materials, newsletters, and communications.",
            ["Content strategy", "Writing & editing", "Brand voice", "Newsletter production", "Social media"],
            28,
            0,
            "bg-yellow-600",
        ),
        member(
            "trading-agent",
            "Trading Analyst",
            "Senior Trading Analyst",
            Role::Analyst,
            Level::Senior,
            "Finance",
            "Monitors markets and provides trading insights. Directly responsible for portfolio performance.",
            ["Price monitoring", "Market analysis", "Portfolio tracking", "Signal generation", "Risk assessment"],
            85,
            3,
            "bg-red-600",
        ),
        member(
            "designer-agent",
            "UI Designer",
            "Senior Designer",
            Role::Designer,
            Level::Senior,
            "Design",
            "Creates user interfaces and visual designs. Responsible for all visual output quality.",
            ["UI/UX design", "Prototyping", "Design systems", "Brand identity", "Frontend implementation"],
            15,
            1,
            "bg-pink-600",
        ),
    ]
}
