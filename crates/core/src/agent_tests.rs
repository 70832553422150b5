// SPDX-License-Identifier: MIT

use super::*;

fn agent(last_status_update: DateTime<Utc>) -> Agent {
    Agent {
        id: AgentId::new(),
        name: "agent-1".into(),
        status: AgentStatus::Connected,
        last_status_update,
        tags: vec![],
        configuration: serde_json::json!({}),
        provider_id: ProviderId::new(),
        agent_type_id: AgentTypeId::new(),
        created_at: last_status_update,
        updated_at: last_status_update,
    }
}

#[test]
fn set_status_always_bumps_last_status_update() {
    let t0 = Utc::now();
    let mut a = agent(t0);
    let t1 = t0 + chrono::Duration::seconds(5);
    a.set_status(AgentStatus::Error, t1);
    assert_eq!(a.status, AgentStatus::Error);
    assert_eq!(a.last_status_update, t1);
}

#[test]
fn liveness_within_timeout() {
    let t0 = Utc::now();
    let a = agent(t0);
    assert!(a.is_live(t0 + chrono::Duration::seconds(100), DEFAULT_LIVENESS_TIMEOUT));
    assert!(!a.is_live(t0 + chrono::Duration::seconds(200), DEFAULT_LIVENESS_TIMEOUT));
}
