mod guard;
mod schedule;
mod tasks;
mod team;

use axum::{middleware, routing::get, Router};
use common::TeamMember;
use serde_json::Value;
use std::sync::Arc;

use crate::jobs::JobSource;
use crate::store::DocumentStore;

#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<dyn JobSource>,
    pub tasks: Arc<dyn DocumentStore<Value>>,
    pub team: Arc<dyn DocumentStore<TeamMember>>,
}

/// Every route sits behind the loopback guard, so a rejected request never
/// reaches a handler.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(common::api::CRON_PATH, get(schedule::get_schedule))
        .route(common::api::TASKS_PATH, get(tasks::get_tasks).post(tasks::replace_tasks))
        .route(common::api::TEAM_PATH, get(team::get_team).post(team::replace_team))
        .layer(middleware::from_fn(guard::require_loopback))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use axum::{
        body::Body,
        extract::ConnectInfo,
        http::{Method, Request, StatusCode},
    };
    use common::JobRecord;
    use serde_json::json;
    use std::net::SocketAddr;
    use std::sync::atomic::Ordering;
    use tower::util::ServiceExt;

    struct FixedJobs(Vec<JobRecord>);

    #[async_trait]
    impl JobSource for FixedJobs {
        async fn list_jobs(&self) -> Result<Vec<JobRecord>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenJobs;

    #[async_trait]
    impl JobSource for BrokenJobs {
        async fn list_jobs(&self) -> Result<Vec<JobRecord>> {
            bail!("`openclaw cron list --json` exited with exit status: 1")
        }
    }

    struct Harness {
        tasks: Arc<MemoryStore<Value>>,
        team: Arc<MemoryStore<TeamMember>>,
        router: Router,
    }

    fn harness(jobs: Arc<dyn JobSource>) -> Harness {
        let tasks: Arc<MemoryStore<Value>> = Arc::new(MemoryStore::new());
        let team: Arc<MemoryStore<TeamMember>> = Arc::new(MemoryStore::new());
        let router = build_router(AppState {
            jobs,
            tasks: tasks.clone(),
            team: team.clone(),
        });
        Harness { tasks, team, router }
    }

    fn sample_jobs() -> Vec<JobRecord> {
        serde_json::from_value(json!([
            {"id": "news", "name": "Morning News", "schedule": {"kind": "cron", "expr": "30 8 * * *"},
             "state": {"lastStatus": "ok", "nextRunAtMs": 1700000000000_i64}},
            {"id": "trading", "schedule": {"kind": "every", "everyMs": 3600000}, "state": {"lastStatus": "error"}},
            {"id": "adhoc", "schedule": {"kind": "at"}}
        ]))
        .unwrap()
    }

    async fn send(
        router: &Router,
        method: Method,
        path: &str,
        peer: &str,
        headers: &[(&str, &str)],
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_string(&json).unwrap())
            }
            None => Body::empty(),
        };
        let mut req = builder.body(body).unwrap();
        let addr: SocketAddr = peer.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));

        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(json!({}));
        (status, json)
    }

    const LOCAL: &str = "127.0.0.1:50000";
    const REMOTE: &str = "203.0.113.9:50000";

    #[tokio::test]
    async fn test_schedule_lists_events() {
        let h = harness(Arc::new(FixedJobs(sample_jobs())));
        let (status, body) = send(&h.router, Method::GET, "/api/cron", LOCAL, &[], None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.get("error").is_none());
        let events = body["events"].as_array().unwrap();
        assert_eq!(events.len(), 3);

        assert_eq!(events[0]["id"], "news");
        assert_eq!(events[0]["title"], "Morning News");
        assert_eq!(events[0]["time"], "08:30");
        assert_eq!(events[0]["status"], "active");
        assert_eq!(events[0]["description"], "30 8 * * * | Last: ok");
        assert_eq!(events[0]["nextRun"], 1700000000000_i64);

        assert_eq!(events[1]["title"], "trading");
        assert_eq!(events[1]["time"], "09:00");
        assert_eq!(events[1]["status"], "paused");
        assert_eq!(events[1]["description"], "every 1h | Last: error");

        assert_eq!(events[2]["description"], "custom | Last: never");
        assert_eq!(events[2]["frequency"], "daily");
        assert_eq!(events[2]["assignee"], "terminator");
    }

    #[tokio::test]
    async fn test_schedule_ignores_query_string() {
        let h = harness(Arc::new(FixedJobs(Vec::new())));
        let (status, body) = send(
            &h.router,
            Method::GET,
            "/api/cron?key=mission-control-cron-sync",
            LOCAL,
            &[],
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"events": []}));
    }

    #[tokio::test]
    async fn test_schedule_upstream_failure_degrades() {
        let h = harness(Arc::new(BrokenJobs));
        let (status, body) = send(&h.router, Method::GET, "/api/cron", LOCAL, &[], None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to fetch cron jobs", "events": []}));
    }

    #[tokio::test]
    async fn test_tasks_fresh_store_is_empty() {
        let h = harness(Arc::new(FixedJobs(Vec::new())));
        let (status, body) = send(&h.router, Method::GET, "/api/tasks", LOCAL, &[], None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"tasks": []}));
    }

    #[tokio::test]
    async fn test_tasks_replace_then_fetch() {
        let h = harness(Arc::new(FixedJobs(Vec::new())));
        let tasks = json!([
            {"id": "2", "title": "Review", "status": "done", "assignee": "ammar",
             "priority": "high", "createdAt": 2, "updatedAt": 3},
            {"id": "1", "title": "Draft", "description": "first pass", "status": "todo",
             "assignee": "terminator", "createdAt": 1, "updatedAt": 1, "pinned": true}
        ]);

        let (status, body) =
            send(&h.router, Method::POST, "/api/tasks", LOCAL, &[], Some(json!({"tasks": tasks.clone()}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));

        let (_, body) = send(&h.router, Method::GET, "/api/tasks", LOCAL, &[], None).await;
        assert_eq!(body["tasks"], tasks);

        send(&h.router, Method::POST, "/api/tasks", LOCAL, &[], Some(json!({"tasks": []}))).await;
        let (_, body) = send(&h.router, Method::GET, "/api/tasks", LOCAL, &[], None).await;
        assert_eq!(body, json!({"tasks": []}));
    }

    #[tokio::test]
    async fn test_tasks_persist_verbatim() {
        let h = harness(Arc::new(FixedJobs(Vec::new())));
        let tasks = json!([
            {"id": "9", "title": "Triage", "description": null, "status": "blocked",
             "assignee": "ops-bot", "priority": null, "createdAt": 1.5, "updatedAt": "later"},
            {"id": 10, "title": "Escalate", "priority": "urgent", "tags": {"team": ["a", "b"]}},
            "free text",
            null
        ]);

        let (status, _) =
            send(&h.router, Method::POST, "/api/tasks", LOCAL, &[], Some(json!({"tasks": tasks.clone()}))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&h.router, Method::GET, "/api/tasks", LOCAL, &[], None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"tasks": tasks}));
    }

    #[tokio::test]
    async fn test_tasks_write_failure() {
        let h = harness(Arc::new(FixedJobs(Vec::new())));
        h.tasks.fail_writes.store(true, Ordering::SeqCst);
        let (status, body) =
            send(&h.router, Method::POST, "/api/tasks", LOCAL, &[], Some(json!({"tasks": []}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to save tasks"}));

        // Still serving afterwards.
        let (status, _) = send(&h.router, Method::GET, "/api/tasks", LOCAL, &[], None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_tasks_invalid_payload() {
        let h = harness(Arc::new(FixedJobs(Vec::new())));
        let (status, body) =
            send(&h.router, Method::POST, "/api/tasks", LOCAL, &[], Some(json!({"items": []}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid task payload"}));
        assert!(!h.tasks.written());
    }

    #[tokio::test]
    async fn test_remote_callers_are_rejected_everywhere() {
        let h = harness(Arc::new(FixedJobs(sample_jobs())));
        let replace = Some(json!({"tasks": []}));

        let cases = [
            (Method::GET, "/api/cron", REMOTE, vec![], None),
            (Method::GET, "/api/tasks", REMOTE, vec![], None),
            (Method::POST, "/api/tasks", REMOTE, vec![], replace.clone()),
            (Method::POST, "/api/tasks", LOCAL, vec![("x-forwarded-for", "198.51.100.7")], replace.clone()),
            (Method::POST, "/api/tasks", LOCAL, vec![("x-real-ip", "10.0.0.3")], replace.clone()),
            (Method::GET, "/api/team", REMOTE, vec![], None),
            (Method::POST, "/api/team", REMOTE, vec![], Some(json!({"team": []}))),
        ];

        for (method, path, peer, headers, body) in cases {
            let (status, json) = send(&h.router, method, path, peer, &headers, body).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{} from {}", path, peer);
            assert_eq!(json, json!({"error": "Unauthorized"}));
        }

        assert!(!h.tasks.written());
        assert!(!h.team.written());
    }

    #[tokio::test]
    async fn test_proxied_local_caller_is_allowed() {
        let h = harness(Arc::new(FixedJobs(Vec::new())));
        let (status, _) = send(
            &h.router,
            Method::GET,
            "/api/tasks",
            "[::1]:50000",
            &[("x-forwarded-for", "127.0.0.1, 10.0.0.1")],
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_team_seeds_default_roster() {
        let h = harness(Arc::new(FixedJobs(Vec::new())));
        let (status, body) = send(&h.router, Method::GET, "/api/team", LOCAL, &[], None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["team"].as_array().unwrap().len(), 6);
        assert_eq!(body["summary"]["totalCompleted"], 355);
        assert_eq!(body["summary"]["directReports"].as_array().unwrap().len(), 5);
        assert!(h.team.written());
    }

    #[tokio::test]
    async fn test_team_replace() {
        let h = harness(Arc::new(FixedJobs(Vec::new())));
        let mut roster = common::team::default_roster();
        common::team::fire(&mut roster, "trading-agent");

        let (status, _) = send(
            &h.router,
            Method::POST,
            "/api/team",
            LOCAL,
            &[],
            Some(json!({"team": roster})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&h.router, Method::GET, "/api/team", LOCAL, &[], None).await;
        assert_eq!(body["team"].as_array().unwrap().len(), 5);
        assert_eq!(body["summary"]["totalFailed"], 4);
    }

    #[tokio::test]
    async fn test_team_invalid_payload() {
        let h = harness(Arc::new(FixedJobs(Vec::new())));
        let (status, body) = send(
            &h.router,
            Method::POST,
            "/api/team",
            LOCAL,
            &[],
            Some(json!({"team": [{"id": "x"}]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid team payload"}));
    }
}
