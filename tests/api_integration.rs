//! End-to-end API integration tests
//!
//! These tests drive the complete HTTP router with a scripted agent invoker:
//! - Roster listing and editing
//! - Starting a workflow run and polling its state
//! - Dashboard view and JSON export
//! - Conflict while a run is in progress

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use pulse_api::agents::wait::FixedDelay;
use pulse_api::agents::{
    AgentIds, AgentInvoker, AgentReply, AgentResult, WorkflowController, WorkflowOrchestrator,
};
use pulse_api::api;
use pulse_api::domain::team::Roster;
use pulse_api::infrastructure::repositories::InMemoryRosterRepository;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt; // for oneshot

/// Replies with canned JSON per agent id
struct ScriptedAgents {
    aggregation: String,
}

#[async_trait]
impl AgentInvoker for ScriptedAgents {
    async fn invoke(&self, _message: &str, agent_id: &str) -> AgentResult<AgentReply> {
        let ids = AgentIds::default();
        let response = if agent_id == ids.coordinator {
            r#"{"status": "queued", "message": "Workflow validated"}"#.to_string()
        } else if agent_id == ids.communication {
            "Sent messages.\n```json\n{\"status\": \"sent\", \"deliveryCount\": 3}\n```".to_string()
        } else {
            self.aggregation.clone()
        };

        Ok(AgentReply { response })
    }
}

/// Setup test application with a scripted invoker
fn setup_app(aggregation: &str, reply_wait: Duration) -> Router {
    let invoker = Arc::new(ScriptedAgents {
        aggregation: aggregation.to_string(),
    });
    let orchestrator = WorkflowOrchestrator::new(
        invoker,
        Arc::new(FixedDelay::new(reply_wait)),
        AgentIds::default(),
    );
    let roster = Arc::new(InMemoryRosterRepository::new(Roster::with_defaults("company.com")));

    api::router(Arc::new(WorkflowController::new(roster, orchestrator)))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Polls the workflow endpoint until the run leaves the running states
async fn wait_for_finish(app: &Router) -> Value {
    for _ in 0..200 {
        let (_, state) = send(app, get("/api/workflow")).await;
        if state["status"] == "complete" || state["status"] == "error" {
            return state;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("Workflow did not finish in time");
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_app("{}", Duration::ZERO);

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_roster_add_and_remove() {
    let app = setup_app("{}", Duration::ZERO);

    let (status, members) = send(&app, get("/api/roster")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(members.as_array().unwrap().len(), 3);
    assert_eq!(members[0]["slackId"], "@alice");

    let (status, member) = send(&app, post_json("/api/roster", json!({"name": "Dave Brown"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(member["slackId"], "@davebrown");
    assert_eq!(member["email"], "davebrown@company.com");
    assert_eq!(member["event"]["type"], "member_added");
    assert_eq!(member["event"]["index"], 3);
    assert_eq!(member["event"]["name"], "Dave Brown");

    let (status, body) = send(&app, post_json("/api/roster", json!({"name": "   "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let delete = Request::builder()
        .method("DELETE")
        .uri("/api/roster/1")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, delete).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, members) = send(&app, get("/api/roster")).await;
    let names: Vec<&str> = members
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alice Johnson", "Carol White", "Dave Brown"]);

    let out_of_range = Request::builder()
        .method("DELETE")
        .uri("/api/roster/9")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, out_of_range).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dashboard_missing_before_first_run() {
    let app = setup_app("{}", Duration::ZERO);

    let (status, body) = send(&app, get("/api/dashboard")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Run the workflow to generate dashboard data");

    let (status, state) = send(&app, get("/api/workflow")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state["status"], "idle");
    assert_eq!(state["progress"], 0);

    let (_, logs) = send(&app, get("/api/workflow/logs")).await;
    assert_eq!(logs["coordinator"], "No coordinator response yet");
}

#[tokio::test]
async fn test_workflow_run_with_unparseable_aggregation() {
    let app = setup_app("Here are the numbers, roughly.", Duration::ZERO);

    let (status, body) = send(&app, post_json("/api/workflow/run", json!({}))).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(body["runId"].is_string());

    let state = wait_for_finish(&app).await;
    assert_eq!(state["status"], "complete");
    assert_eq!(state["progress"], 100);
    assert_eq!(state["aggregationResponse"]["totalMQLs"], 180.0);

    let (status, view) = send(&app, get("/api/dashboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["source"], "simulated");
    assert_eq!(view["kpis"][0]["value"], "145");
    assert_eq!(view["kpis"][3]["value"], "3");
    assert_eq!(view["memberChart"][0]["name"], "Alice");
    assert_eq!(view["rankings"][0]["name"], "Bob Smith");
    assert_eq!(view["trendChart"][3]["week"], "This Week");
    assert_eq!(view["trendChart"][0]["mqls"], 100);

    let (_, logs) = send(&app, get("/api/workflow/logs")).await;
    assert!(logs["communication"].as_str().unwrap().contains("deliveryCount"));
}

#[tokio::test]
async fn test_workflow_run_with_reported_members() {
    let aggregation = json!({
        "members": [
            {"name": "Alice Johnson", "mqls": 50, "campaigns": 6, "engagementRate": 80, "qualityScore": 0.9},
            {"name": "Bob Smith", "mqls": 20}
        ]
    })
    .to_string();
    let app = setup_app(&aggregation, Duration::ZERO);

    let (status, _) = send(
        &app,
        post_json("/api/workflow/run", json!({"periodStart": "2026-10-14"})),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    wait_for_finish(&app).await;

    let response = app.clone().oneshot(get("/api/dashboard/export")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"marketing-dashboard-"));
    assert!(disposition.ends_with(".json\""));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let metrics: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(metrics["source"], "reported");
    assert_eq!(metrics["totalMQLs"], 70);
    assert_eq!(metrics["teamSize"], 3);
    assert_eq!(metrics["reportPeriod"]["start"], "2026-10-12");
    assert_eq!(metrics["members"][0]["engagementRate"], 0.8);
    assert_eq!(metrics["members"][1]["campaigns"], 6);
}

#[tokio::test]
async fn test_run_conflicts_while_in_progress() {
    let app = setup_app("{}", Duration::from_millis(300));

    let (status, _) = send(&app, post_json("/api/workflow/run", json!({}))).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, body) = send(&app, post_json("/api/workflow/run", json!({}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "A workflow run is already in progress");

    let state = wait_for_finish(&app).await;
    assert_eq!(state["status"], "complete");

    // The lock is released just after the final state is published
    let mut accepted = false;
    for _ in 0..50 {
        let (status, _) = send(&app, post_json("/api/workflow/run", json!({}))).await;
        if status == StatusCode::ACCEPTED {
            accepted = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(accepted);
}

#[tokio::test]
async fn test_run_accepts_empty_body() {
    let app = setup_app("{}", Duration::ZERO);

    let request = Request::builder()
        .method("POST")
        .uri("/api/workflow/run")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(body["reportPeriod"]["start"].is_string());
    wait_for_finish(&app).await;
}

#[tokio::test]
async fn test_export_stubs_not_implemented() {
    let app = setup_app("{}", Duration::ZERO);

    let (status, _) = send(&app, get("/api/dashboard/export/pdf")).await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);

    let (status, _) = send(&app, get("/api/dashboard/export/html")).await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
}
