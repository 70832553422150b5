use super::*;
use fulcrum_core::{AgentId, AgentTypeId, ProviderId};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_agent() -> Agent {
    let now = chrono::Utc::now();
    Agent {
        id: AgentId::new(),
        name: "agent-1".into(),
        status: AgentStatus::Connected,
        last_status_update: now,
        tags: vec![],
        configuration: serde_json::json!({}),
        provider_id: ProviderId::new(),
        agent_type_id: AgentTypeId::new(),
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn get_agent_info_sends_bearer_token_and_decodes_body() {
    let server = MockServer::start().await;
    let agent = sample_agent();

    Mock::given(method("GET"))
        .and(path("/api/v1/agents/me"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&agent))
        .mount(&server)
        .await;

    let client = FulcrumClient::new(server.uri(), "test-token").unwrap();
    let fetched = client.get_agent_info().await.unwrap();
    assert_eq!(fetched.id, agent.id);
}

#[tokio::test]
async fn update_status_puts_state_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/agents/me/status"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = FulcrumClient::new(server.uri(), "test-token").unwrap();
    client.update_status(AgentStatus::Connected).await.unwrap();
}

#[tokio::test]
async fn non_success_status_surfaces_as_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/agents/me"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthenticated"))
        .mount(&server)
        .await;

    let client = FulcrumClient::new(server.uri(), "bad-token").unwrap();
    let err = client.get_agent_info().await.unwrap_err();
    assert!(matches!(err, AgentError::Status { status: 401, .. }));
}

#[tokio::test]
async fn claim_job_posts_to_claim_path() {
    let server = MockServer::start().await;
    let job_id = JobId::new();
    Mock::given(method("POST"))
        .and(path(format!("/api/v1/jobs/{job_id}/claim")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = FulcrumClient::new(server.uri(), "test-token").unwrap();
    client.claim_job(&job_id).await.unwrap();
}

#[tokio::test]
async fn fail_job_sends_error_message_body() {
    let server = MockServer::start().await;
    let job_id = JobId::new();
    Mock::given(method("POST"))
        .and(path(format!("/api/v1/jobs/{job_id}/fail")))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = FulcrumClient::new(server.uri(), "test-token").unwrap();
    client.fail_job(&job_id, "boom").await.unwrap();
}
