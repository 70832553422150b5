use super::*;
use crate::client::FulcrumClient;
use fulcrum_core::AgentId;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn entries_are_dropped_until_agent_id_is_set() {
    let buffer = MetricBuffer::new(16);
    buffer.record_vm_count(3, chrono::Utc::now());
    assert!(buffer.is_empty());

    buffer.set_agent_id(AgentId::new());
    buffer.record_vm_count(3, chrono::Utc::now());
    assert_eq!(buffer.len(), 1);
}

#[test]
fn unregistered_metric_names_are_dropped() {
    let buffer = MetricBuffer::new(16);
    buffer.set_agent_id(AgentId::new());
    buffer.record_agent_metric("not.a.known.metric", 1.0, chrono::Utc::now());
    assert!(buffer.is_empty());

    buffer.record_agent_metric(METRIC_VM_COUNT, 1.0, chrono::Utc::now());
    assert_eq!(buffer.len(), 1);
}

#[test]
fn buffer_drops_oldest_once_at_capacity() {
    let buffer = MetricBuffer::new(2);
    buffer.set_agent_id(AgentId::new());
    for i in 0..3 {
        buffer.record_vm_count(i, chrono::Utc::now());
    }
    assert_eq!(buffer.len(), 2);
}

#[tokio::test]
async fn report_once_drains_and_submits_each_entry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/metric-entries"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let buffer = MetricBuffer::new(16);
    buffer.set_agent_id(AgentId::new());
    buffer.record_vm_count(1, chrono::Utc::now());
    buffer.record_vm_count(2, chrono::Utc::now());

    let client = FulcrumClient::new(server.uri(), "test-token").unwrap();
    let reported = report_once(&buffer, &client).await.unwrap();

    assert_eq!(reported, 2);
    assert!(buffer.is_empty());
}

#[tokio::test]
async fn report_once_aborts_on_first_submission_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/metric-entries"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let buffer = MetricBuffer::new(16);
    buffer.set_agent_id(AgentId::new());
    buffer.record_vm_count(1, chrono::Utc::now());

    let client = FulcrumClient::new(server.uri(), "test-token").unwrap();
    let err = report_once(&buffer, &client).await.unwrap_err();
    assert!(matches!(err, crate::error::AgentError::Status { status: 500, .. }));

    // The entry was already drained — lost, by design, even though the
    // submission failed.
    assert!(buffer.is_empty());
}
